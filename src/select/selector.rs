use crate::select::AttrMatcher;

/// The in-memory form of a selector string: its comma-separated subselectors, in order.
///
/// Parse one with [`SelectorGroup::parse`] (or `TryFrom<&str>`) to reuse it across several selections.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SelectorGroup {
    pub subselectors: Vec<Subselector>,
}

/// One comma-separated part of a selector: whitespace-separated tokens, each narrowing the previous one's results.
///
/// A subselector with no tokens selects its roots unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Subselector {
    pub tokens: Vec<Token>,
}

/// A single selector token.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Token {
    /// `*`
    Universal,
    /// `tag`, `tag[attr]`, `[attr=value]`, ...
    Compound(CompoundSelector),
    /// `#id` (anything before the `#` is ignored)
    Id(String),
    /// `tag.class1.class2` or `.class`
    Class(ClassSelector),
    /// `preselector:name(arg)`
    Filter(FilterExpr),
    /// Anything else. Evaluating one of these selects nothing.
    Unrecognized(String),
}

/// matcher for [`Token::Compound`]
///
/// Either part may be absent, but not both (that's the empty token, which the tokenizer never produces).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CompoundSelector {
    pub tag: Option<String>,
    pub attrs: Vec<AttrClause>,
}

/// `[name op value]`
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttrClause {
    pub name: String,
    pub matcher: AttrMatcher,
}

/// matcher for [`Token::Class`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ClassSelector {
    pub tag: Option<String>,
    pub classes: Vec<String>,
}

impl ClassSelector {
    /// Whether a `class` attribute value has every one of this selector's classes among its whitespace-separated
    /// tokens. An absent or empty attribute never matches.
    pub fn matches(&self, class_attr: Option<&str>) -> bool {
        match class_attr {
            None | Some("") => false,
            Some(value) => {
                let actual: Vec<&str> = value.split_whitespace().collect();
                self.classes.iter().all(|class| actual.contains(&class.as_str()))
            }
        }
    }
}

/// A pseudo-filter invocation: `[preselector]:name[(arg)]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FilterExpr {
    /// Evaluated against each context group separately, before the filter runs.
    pub preselector: Option<Subselector>,
    pub name: String,
    /// The argument, with at most one surrounding quote stripped from each side.
    pub arg: Option<String>,
    /// The argument re-read as a filter expression, if it is one (as in `:not(:first)`). It runs against this
    /// filter's results.
    pub chained: Option<Box<FilterExpr>>,
}

impl FilterExpr {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            preselector: None,
            name: name.into(),
            arg: None,
            chained: None,
        }
    }

    pub fn arg(&self) -> Option<&str> {
        self.arg.as_deref()
    }
}
