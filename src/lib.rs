//! Select nodes from a parsed markup tree using a compact, CSS/jQuery-inspired selector language.
//!
//! ```
//! use domq::{nodes_from_json, select};
//!
//! let dom = nodes_from_json(r#"
//!     {"type": "tag", "name": "ul", "attribs": {"color": "blue"}, "children": [
//!         {"type": "tag", "name": "li", "attribs": {}, "children": [{"type": "text", "data": "water"}]},
//!         {"type": "tag", "name": "li", "attribs": {}, "children": [{"type": "text", "data": "sky"}]}
//!     ]}"#).unwrap();
//!
//! let found = select(&dom, "ul[color='blue'] li:last").unwrap();
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].children()[0].data(), Some("sky"));
//! ```
//!
//! A selector is one or more comma-separated subselectors, whose results are concatenated. Each subselector is a
//! whitespace-separated list of tokens, each of which searches within (and including) the previous token's results:
//!
//! | token | selects |
//! |---|---|
//! | `*` | the current nodes, unchanged |
//! | `tag` | tags with that name |
//! | `tag[attr]`, `[attr=value]` | tags with that attribute; `=`, `~=`, `^=`, `$=`, `*=` and `\|=` compare its value |
//! | `#id` | the first node with that id |
//! | `tag.class1.class2`, `.class` | tags that have all of those classes |
//! | `preselector:filter(arg)` | the result of a pseudo-filter; see [`FilterRegistry`] |
//!
//! Tokens that don't fit any of those select nothing, rather than being errors.
//!
//! [`FilterRegistry`]: select::FilterRegistry
pub mod node;
pub mod query;
pub mod select;

pub use node::{nodes_from_json, DomWalker, Node, NodeType, TreeWalker};
pub use select::{Engine, Roots, SelectError, SelectOptions};

/// Selects nodes with a default [`Engine`].
///
/// If you select more than once, or need custom filters or options, create an [`Engine`] and reuse it.
pub fn select<'n>(roots: impl Into<Roots<'n>>, selector: &str) -> Result<Vec<&'n Node>, SelectError> {
    Engine::new().select(roots, selector)
}
