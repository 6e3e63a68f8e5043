//! The node tree that selectors run against, and the search primitives over it.
mod tree;
mod walker;

pub use tree::*;
pub use walker::*;

#[cfg(test)]
mod tree_test_utils;
#[cfg(test)]
pub(crate) use tree_test_utils::*;
