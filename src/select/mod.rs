//! Selector evaluation: the parsed selector types, the engine that runs them, and the pseudo-filters.
mod attr_matcher;
mod context;
mod engine;
mod error;
mod filters;
mod options;
mod selector;

pub use attr_matcher::*;
pub use context::*;
pub use engine::*;
pub use error::*;
pub use filters::*;
pub use options::*;
pub use selector::*;
