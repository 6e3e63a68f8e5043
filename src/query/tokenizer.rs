use crate::query::{DetachedSpan, ParseError};
use std::borrow::Cow;

/// One whitespace-delimited piece of a subselector, after re-joining pieces that were split inside brackets or
/// parentheses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RawToken<'a> {
    pub(crate) text: Cow<'a, str>,
    pub(crate) span: DetachedSpan,
}

/// Splits a selector string into its comma-separated subselectors, each with its byte offset in `text`.
///
/// This is a plain split: commas inside brackets or quotes still separate subselectors.
pub(crate) fn split_subselectors(text: &str) -> Vec<(usize, &str)> {
    let mut result = Vec::new();
    let mut start = 0;
    for comma in memchr::memchr_iter(b',', text.as_bytes()) {
        result.push((start, &text[start..comma]));
        start = comma + 1;
    }
    result.push((start, &text[start..]));
    result
}

/// Splits a subselector on whitespace into tokens.
///
/// A piece that contains a `]` or `)` but no `[` or `(` is taken to be the tail of the previous piece, and is appended
/// to it with a single space; this lets `[class='main post']` and `:contains(add by)` survive as one token. A piece
/// like that with no previous piece is an error.
///
/// Spans are relative to `text`, plus `base_offset`.
pub(crate) fn tokenize(text: &str, base_offset: usize) -> Result<Vec<RawToken<'_>>, ParseError> {
    let mut tokens: Vec<RawToken> = Vec::new();
    for (start, piece) in pieces(text) {
        let span = DetachedSpan {
            start: start + base_offset,
            end: start + base_offset + piece.len(),
        };
        if !is_continuation(piece) {
            tokens.push(RawToken {
                text: Cow::Borrowed(piece),
                span,
            });
            continue;
        }
        let Some(prev) = tokens.last_mut() else {
            return Err(ParseError::new(
                span,
                "closing bracket or parenthesis with no preceding selector",
            ));
        };
        let joined = prev.text.to_mut();
        joined.push(' ');
        joined.push_str(piece);
        prev.span.end = span.end;
    }
    Ok(tokens)
}

fn is_continuation(piece: &str) -> bool {
    let bytes = piece.as_bytes();
    memchr::memchr2(b']', b')', bytes).is_some() && memchr::memchr2(b'[', b'(', bytes).is_none()
}

/// Non-empty whitespace-separated pieces, with their byte offsets.
fn pieces(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split(char::is_whitespace)
        .filter(|piece| !piece.is_empty())
        .map(move |piece| (piece.as_ptr() as usize - text.as_ptr() as usize, piece))
}
