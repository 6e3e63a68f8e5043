use crate::node::{Node, PredicateKey, PredicateMap};
use crate::select::{Context, Engine, FilterSemantics, NotComparison, SelectError};
use fancy_regex::Regex;
use paste::paste;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use tracing::debug;

pub type FilterResult<'n> = Result<Vec<&'n Node>, SelectError>;

/// A pseudo-filter, as in `li:first` or `:contains(foo)`.
///
/// A filter gets the current [`Context`] and the (optional) argument, and returns the nodes that become the next
/// context, each in its own group. It also gets the [`Engine`] that's running it, so that it can evaluate selectors
/// of its own.
///
/// Any `Fn` with the right signature is a `Filter`.
pub trait Filter: Send + Sync {
    fn apply<'n>(&self, engine: &Engine, context: Context<'n>, arg: Option<&str>) -> FilterResult<'n>;
}

impl<F> Filter for F
where
    F: for<'n> Fn(&Engine, Context<'n>, Option<&str>) -> FilterResult<'n> + Send + Sync,
{
    fn apply<'n>(&self, engine: &Engine, context: Context<'n>, arg: Option<&str>) -> FilterResult<'n> {
        self(engine, context, arg)
    }
}

/// Filters by name.
#[derive(Default)]
pub struct FilterRegistry {
    filters: BTreeMap<String, Box<dyn Filter>>,
}

macro_rules! builtin_filters {
    { $($name:ident),+ $(,)? } => {
        /// The names of the filters in [`FilterRegistry::with_builtins`].
        pub const BUILTIN_FILTERS: &[&str] = &[$(stringify!($name)),+];

        impl FilterRegistry {
            /// A registry with all of the built-in filters.
            pub fn with_builtins() -> Self {
                let mut registry = Self::empty();
                $(
                registry.register(stringify!($name), paste!{ [<filter_ $name>] });
                )+
                registry
            }
        }
    };
}

builtin_filters! {
    contains,
    header,
    not,
    empty,
    eq,
    gt,
    lt,
    even,
    odd,
    first,
    last,
}

impl FilterRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a filter, replacing any existing one with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: for<'n> Fn(&Engine, Context<'n>, Option<&str>) -> FilterResult<'n> + Send + Sync + 'static,
    {
        self.register_boxed(name, Box::new(filter));
    }

    /// Like [`FilterRegistry::register`], but for a [`Filter`] that isn't a closure.
    pub fn register_boxed(&mut self, name: impl Into<String>, filter: Box<dyn Filter>) {
        self.filters.insert(name.into(), filter);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Filter> {
        self.filters.get(name).map(Box::as_ref)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Filter>> {
        self.filters.remove(name)
    }

    /// The registered names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }
}

impl Debug for FilterRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Nodes that have a text descendant matching the argument, as an unanchored regex. A node appears once for each
/// such descendant.
///
/// Under [`FilterSemantics::Legacy`] the node is the matching text's parent, which for nested markup is somewhere
/// below the context node. Under [`FilterSemantics::Conventional`] it's the context node itself.
///
/// Only descendants without a children field are tested; nodes that have one are searched in turn. A missing
/// argument is an empty pattern, which matches any non-empty text.
fn filter_contains<'n>(engine: &Engine, context: Context<'n>, arg: Option<&str>) -> FilterResult<'n> {
    let pattern = arg.unwrap_or_default();
    let re = Regex::new(pattern).map_err(|err| SelectError::regex(pattern, err))?;
    let mut found = Vec::new();
    for node in context.nodes() {
        let mut stack: Vec<(&Node, &Node)> = node.children().iter().rev().map(|child| (node, child)).collect();
        while let Some((parent, child)) = stack.pop() {
            if let Some(grandchildren) = &child.children {
                stack.extend(grandchildren.iter().rev().map(|grandchild| (child, grandchild)));
                continue;
            }
            let Some(text) = child.data().filter(|text| !text.is_empty()) else {
                continue;
            };
            if re.is_match(text).map_err(|err| SelectError::regex(pattern, err))? {
                found.push(match engine.options().filter_semantics {
                    FilterSemantics::Legacy => parent,
                    FilterSemantics::Conventional => node,
                });
            }
        }
    }
    Ok(found)
}

/// `h1` through `h9`, and also multi-digit names like `h22`, anywhere within each group.
fn filter_header<'n>(engine: &Engine, context: Context<'n>, _: Option<&str>) -> FilterResult<'n> {
    let predicates = PredicateMap::new().with(PredicateKey::TagName, |name| name.is_some_and(is_header_name));
    let mut found = Vec::new();
    for group in context.groups() {
        found.extend(engine.walker().find_matching(&predicates, group, true));
    }
    Ok(found)
}

fn is_header_name(name: &str) -> bool {
    match name.strip_prefix('h') {
        Some(digits) => !digits.is_empty() && digits.bytes().all(|b| (b'1'..=b'9').contains(&b)),
        None => false,
    }
}

/// The context nodes and their descendants, minus the ones that the argument selects from the context.
///
/// Text descendants are skipped, as is everything below them.
fn filter_not<'n>(engine: &Engine, context: Context<'n>, arg: Option<&str>) -> FilterResult<'n> {
    let roots: Vec<&'n Node> = context.nodes().collect();
    let excluded = match arg {
        Some(selector) => engine.select(roots.clone(), selector)?,
        None => Vec::new(),
    };
    let comparison = engine.options().not_comparison;

    let mut found = Vec::new();
    let mut stack: Vec<&'n Node> = roots.into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        if !excluded.iter().any(|member| same_node(comparison, member, node)) {
            found.push(node);
        }
        let not_text = |child: &&'n Node| child.data().map_or(true, str::is_empty);
        stack.extend(node.children().iter().rev().filter(not_text));
    }
    Ok(found)
}

fn same_node(comparison: NotComparison, member: &Node, node: &Node) -> bool {
    match comparison {
        NotComparison::Identity => std::ptr::eq(member, node),
        NotComparison::FieldWise => {
            member.kind == node.kind
                && member.name.as_ref().map_or(true, |name| node.name.as_ref() == Some(name))
                && member.data.as_ref().map_or(true, |data| node.data.as_ref() == Some(data))
                && member
                    .attribs
                    .as_ref()
                    .map_or(true, |attribs| node.attribs.as_ref().is_some_and(|other| std::ptr::eq(attribs, other)))
                && member
                    .children
                    .as_ref()
                    .map_or(true, |children| node.children.as_ref().is_some_and(|other| std::ptr::eq(children, other)))
        }
    }
}

/// Tags with no children field at all. A tag whose children are an empty list doesn't count.
fn filter_empty<'n>(_: &Engine, context: Context<'n>, _: Option<&str>) -> FilterResult<'n> {
    Ok(context.nodes().filter(|node| node.is_tag() && node.children.is_none()).collect())
}

fn filter_eq<'n>(_: &Engine, context: Context<'n>, arg: Option<&str>) -> FilterResult<'n> {
    let Some(index) = index_arg("eq", arg) else {
        return Ok(Vec::new());
    };
    Ok(context.nodes().nth(index).into_iter().collect())
}

fn filter_gt<'n>(engine: &Engine, context: Context<'n>, arg: Option<&str>) -> FilterResult<'n> {
    let Some(n) = index_arg("gt", arg) else {
        return Ok(Vec::new());
    };
    let skip = match engine.options().filter_semantics {
        FilterSemantics::Legacy => n.saturating_sub(1),
        FilterSemantics::Conventional => n.saturating_add(1),
    };
    Ok(context.nodes().skip(skip).collect())
}

fn filter_lt<'n>(_: &Engine, context: Context<'n>, arg: Option<&str>) -> FilterResult<'n> {
    let Some(n) = index_arg("lt", arg) else {
        return Ok(Vec::new());
    };
    Ok(context.nodes().take(n).collect())
}

fn filter_even<'n>(engine: &Engine, context: Context<'n>, _: Option<&str>) -> FilterResult<'n> {
    let remainder = match engine.options().filter_semantics {
        FilterSemantics::Legacy => 1,
        FilterSemantics::Conventional => 0,
    };
    Ok(every_other(context, remainder))
}

fn filter_odd<'n>(engine: &Engine, context: Context<'n>, _: Option<&str>) -> FilterResult<'n> {
    let remainder = match engine.options().filter_semantics {
        FilterSemantics::Legacy => 0,
        FilterSemantics::Conventional => 1,
    };
    Ok(every_other(context, remainder))
}

/// Within each group, the nodes whose 0-based position has the given remainder mod 2.
fn every_other(context: Context<'_>, remainder: usize) -> Vec<&Node> {
    let mut found = Vec::new();
    for group in context.into_groups() {
        found.extend(group.into_iter().enumerate().filter(|(i, _)| i % 2 == remainder).map(|(_, node)| node));
    }
    found
}

fn filter_first<'n>(engine: &Engine, context: Context<'n>, _: Option<&str>) -> FilterResult<'n> {
    filter_eq(engine, context, Some("0"))
}

/// The last node of the last group. Note that this is not the last node overall, if the last group is empty.
fn filter_last<'n>(_: &Engine, context: Context<'n>, _: Option<&str>) -> FilterResult<'n> {
    let last = context.into_groups().pop().and_then(|mut group| group.pop());
    Ok(last.into_iter().collect())
}

fn index_arg(filter_name: &str, arg: Option<&str>) -> Option<usize> {
    let parsed = arg.and_then(|arg| arg.trim().parse().ok());
    if parsed.is_none() {
        debug!(filter = filter_name, ?arg, "argument isn't a non-negative integer; selecting nothing");
    }
    parsed
}
