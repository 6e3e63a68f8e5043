//! Parsing selector strings into [`SelectorGroup`](crate::select::SelectorGroup)s.
mod query;

mod error;
mod token_try_from;
mod tokenizer;

pub use error::*;

pub(crate) use query::{Pair, Query, Rule};
