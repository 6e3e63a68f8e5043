use std::fmt::{Display, Formatter};

/// The comparison in an attribute clause like `[lang|=en]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttrOp {
    /// `[attr=value]`: exactly equal.
    Equals,
    /// `[attr~=value]`: one of the value's whitespace-separated tokens.
    Includes,
    /// `[attr^=value]`
    Prefix,
    /// `[attr$=value]`
    Suffix,
    /// `[attr*=value]`
    Substring,
    /// `[attr|=value]`: exactly `value`, or `value-` followed by a single subtag.
    DashMatch,
}

impl AttrOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "=" => Self::Equals,
            "~" => Self::Includes,
            "^" => Self::Prefix,
            "$" => Self::Suffix,
            "*" => Self::Substring,
            "|" => Self::DashMatch,
            _ => return None,
        })
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Equals => '=',
            Self::Includes => '~',
            Self::Prefix => '^',
            Self::Suffix => '$',
            Self::Substring => '*',
            Self::DashMatch => '|',
        }
    }
}

/// Tests an attribute's value: an operator and the literal to compare against.
///
/// An absent attribute never matches. Without an operator, the matcher only checks that the attribute is present and
/// non-empty. Every operator other than [`AttrOp::Equals`] also requires a non-empty value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttrMatcher {
    pub op: Option<AttrOp>,
    pub value: String,
}

impl AttrMatcher {
    pub fn presence() -> Self {
        Self {
            op: None,
            value: String::new(),
        }
    }

    pub fn new(op: AttrOp, value: impl Into<String>) -> Self {
        Self {
            op: Some(op),
            value: value.into(),
        }
    }

    pub fn matches(&self, actual: Option<&str>) -> bool {
        let Some(actual) = actual else {
            return false;
        };
        let expected = self.value.as_str();
        match self.op {
            None => !actual.is_empty(),
            Some(AttrOp::Equals) => actual == expected,
            Some(_) if actual.is_empty() => false,
            Some(AttrOp::Includes) => actual.split_whitespace().any(|token| token == expected),
            Some(AttrOp::Prefix) => actual.starts_with(expected),
            // an empty suffix never matches
            Some(AttrOp::Suffix) => !expected.is_empty() && actual.ends_with(expected),
            Some(AttrOp::Substring) => actual.contains(expected),
            Some(AttrOp::DashMatch) => {
                actual == expected
                    || actual
                        .strip_prefix(expected)
                        .and_then(|rest| rest.strip_prefix('-'))
                        .is_some_and(|subtag| !subtag.contains('-'))
            }
        }
    }
}

impl Display for AttrMatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.op {
            None => Ok(()),
            Some(AttrOp::Equals) => write!(f, "={:?}", self.value),
            Some(op) => write!(f, "{}={:?}", op.symbol(), self.value),
        }
    }
}
