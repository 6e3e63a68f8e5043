use crate::query::Rule;
use pest::error::ErrorVariant;
use pest::Span;
use std::fmt::{Display, Formatter};

/// An error from parsing a selector string.
///
/// Most malformed selectors aren't errors at all: an unrecognized token just selects nothing. This is reserved for
/// input that can't be tokenized.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParseError {
    pub(crate) span: DetachedSpan,
    pub(crate) message: String,
}

impl ParseError {
    pub(crate) fn new(span: DetachedSpan, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }

    /// Where in the selector string the error is.
    pub fn span(&self) -> DetachedSpan {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Renders this error against the selector text it came from, pest-style:
    ///
    /// ```text
    ///  --> 1:1
    ///   |
    /// 1 | ] li
    ///   | ^
    ///   |
    ///   = closing bracket or parenthesis with no preceding selector
    /// ```
    ///
    /// If the span doesn't fit in `query_text`, this is just the message.
    pub fn render(&self, query_text: &str) -> String {
        match Span::new(query_text, self.span.start, self.span.end) {
            None => self.message.clone(),
            Some(span) => {
                let pest_err = pest::error::Error::<Rule>::new_from_span(
                    ErrorVariant::CustomError {
                        message: self.message.clone(),
                    },
                    span,
                );
                pest_err.to_string()
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at bytes {}..{}", self.message, self.span.start, self.span.end)
    }
}

/// Like a [pest::Span], but without a reference to the underlying `&str`, and thus cheaply Copyable.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub struct DetachedSpan {
    pub start: usize,
    pub end: usize,
}

impl From<Span<'_>> for DetachedSpan {
    fn from(value: Span) -> Self {
        Self {
            start: value.start(),
            end: value.end(),
        }
    }
}
