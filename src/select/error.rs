use crate::query::ParseError;
use std::fmt::{Display, Formatter};

/// An error from a selection.
///
/// Most problems with a selector aren't errors: an unknown token, an unknown filter or an unmatched id just select
/// nothing.
#[derive(Debug)]
#[non_exhaustive]
pub enum SelectError {
    /// The selector string couldn't be tokenized.
    Parse(QueryParse),
    /// A `:contains` argument wasn't a valid regular expression, or matching it failed.
    Regex {
        pattern: String,
        source: Box<fancy_regex::Error>,
    },
    /// A filter failed. The built-in filters never return this; it's for custom ones.
    Filter { name: String, message: String },
}

/// A [`ParseError`] together with the selector text it came from, so that it can be displayed in context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParse {
    pub(crate) query_string: String,
    pub(crate) error: ParseError,
}

impl QueryParse {
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    pub fn error(&self) -> &ParseError {
        &self.error
    }
}

impl SelectError {
    pub(crate) fn parse(query_string: &str, error: ParseError) -> Self {
        Self::Parse(QueryParse {
            query_string: query_string.to_string(),
            error,
        })
    }

    pub(crate) fn regex(pattern: &str, source: fancy_regex::Error) -> Self {
        Self::Regex {
            pattern: pattern.to_string(),
            source: Box::new(source),
        }
    }

    /// For custom filters to report a failure.
    pub fn filter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Filter {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl Display for QueryParse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.error.render(&self.query_string))
    }
}

impl Display for SelectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectError::Parse(err) => {
                writeln!(f, "Syntax error in selector:")?;
                write!(f, "{err}")
            }
            SelectError::Regex { pattern, source } => write!(f, "invalid pattern {pattern:?}: {source}"),
            SelectError::Filter { name, message } => write!(f, "filter :{name} failed: {message}"),
        }
    }
}

impl std::error::Error for SelectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SelectError::Parse(err) => Some(&err.error),
            SelectError::Regex { source, .. } => Some(source.as_ref()),
            SelectError::Filter { .. } => None,
        }
    }
}
