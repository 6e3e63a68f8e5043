use crate::node::Node;
use std::fmt::{Debug, Formatter};
use std::ops::ControlFlow;

/// A predicate over a (possibly absent) string value: a tag name, or an attribute's value.
pub type ValuePredicate<'p> = Box<dyn Fn(Option<&str>) -> bool + 'p>;

/// What a [`PredicateMap`] entry tests.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PredicateKey {
    /// The node must be a tag, and its name must satisfy the predicate.
    TagName,
    /// The node must have attributes, and the named attribute's value (which may be absent) must satisfy the
    /// predicate.
    Attr(String),
}

/// A conjunction of [`ValuePredicate`]s, keyed by what they test.
///
/// A node matches the map if it matches every entry; an empty map matches every node.
#[derive(Default)]
pub struct PredicateMap<'p> {
    entries: Vec<(PredicateKey, ValuePredicate<'p>)>,
}

impl<'p> PredicateMap<'p> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<F>(mut self, key: PredicateKey, predicate: F) -> Self
    where
        F: Fn(Option<&str>) -> bool + 'p,
    {
        self.insert(key, predicate);
        self
    }

    /// Adds a predicate, replacing any existing one for the same key.
    pub fn insert<F>(&mut self, key: PredicateKey, predicate: F)
    where
        F: Fn(Option<&str>) -> bool + 'p,
    {
        self.entries.retain(|(existing, _)| existing != &key);
        self.entries.push((key, Box::new(predicate)));
    }

    pub fn matches(&self, node: &Node) -> bool {
        self.entries.iter().all(|(key, predicate)| match key {
            PredicateKey::TagName => node.is_tag() && predicate(node.name()),
            PredicateKey::Attr(name) => match &node.attribs {
                None => false,
                Some(attribs) => predicate(attribs.get(name).map(String::as_str)),
            },
        })
    }
}

impl Debug for PredicateMap<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.entries.iter().map(|(key, _)| key)).finish()
    }
}

/// The low-level tree search primitives that selector evaluation is built on.
///
/// Every search is _inclusive_: the roots themselves are candidates, not just their descendants. If `recurse` is
/// `false`, only the roots are tested; otherwise their whole subtrees are, in depth-first document order.
///
/// Only [`TreeWalker::find_matching`] is required; the other two are expressed in terms of it, though implementations
/// may override them (for example, to stop early).
pub trait TreeWalker {
    fn find_matching<'n>(&self, predicates: &PredicateMap<'_>, roots: &[&'n Node], recurse: bool) -> Vec<&'n Node>;

    fn find_by_tag<'n>(&self, name: &str, roots: &[&'n Node], recurse: bool) -> Vec<&'n Node> {
        let predicates = PredicateMap::new().with(PredicateKey::TagName, |tag| tag == Some(name));
        self.find_matching(&predicates, roots, recurse)
    }

    /// Finds the first node (in traversal order) whose `id` attribute is exactly `id`.
    fn find_by_id<'n>(&self, id: &str, roots: &[&'n Node], recurse: bool) -> Option<&'n Node> {
        let predicates = PredicateMap::new().with(PredicateKey::Attr("id".to_string()), |value| value == Some(id));
        self.find_matching(&predicates, roots, recurse).into_iter().next()
    }
}

/// The default [`TreeWalker`], over [`Node`] trees.
///
/// Traversal uses an explicit stack rather than recursion, so tree depth doesn't affect stack usage.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DomWalker;

impl DomWalker {
    /// Visits the roots (and, if `recurse`, all their descendants) in depth-first document order, until the visitor
    /// breaks.
    pub fn walk<'n, F>(roots: &[&'n Node], recurse: bool, mut visit: F)
    where
        F: FnMut(&'n Node) -> ControlFlow<()>,
    {
        let mut stack: Vec<&'n Node> = roots.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if visit(node).is_break() {
                return;
            }
            if recurse {
                stack.extend(node.children().iter().rev());
            }
        }
    }
}

impl TreeWalker for DomWalker {
    fn find_matching<'n>(&self, predicates: &PredicateMap<'_>, roots: &[&'n Node], recurse: bool) -> Vec<&'n Node> {
        let mut found = Vec::new();
        Self::walk(roots, recurse, |node| {
            if predicates.matches(node) {
                found.push(node);
            }
            ControlFlow::Continue(())
        });
        found
    }

    fn find_by_id<'n>(&self, id: &str, roots: &[&'n Node], recurse: bool) -> Option<&'n Node> {
        let mut found = None;
        Self::walk(roots, recurse, |node| {
            if node.attr("id") == Some(id) {
                found = Some(node);
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        found
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::node::{describe_all, FIXTURE};

    fn roots() -> Vec<&'static Node> {
        FIXTURE.iter().collect()
    }

    #[test]
    fn find_by_tag_is_inclusive_and_in_document_order() {
        let found = DomWalker.find_by_tag("html", &roots(), true);
        assert_eq!(describe_all(&found), vec!["html"]);

        let found = DomWalker.find_by_tag("li", &roots(), true);
        assert_eq!(
            describe_all(&found),
            vec![
                r#"li "I am awesome, in green""#,
                r#"li "plain""#,
                r#"li "water""#,
                r#"li "sky""#,
                r#"li "bluebird""#,
            ]
        );
    }

    #[test]
    fn no_recursion_only_tests_roots() {
        let lis = DomWalker.find_by_tag("li", &roots(), true);
        let preds = PredicateMap::new().with(PredicateKey::Attr("color".to_string()), |v| v.is_some());
        let found = DomWalker.find_matching(&preds, &lis, false);
        assert_eq!(describe_all(&found), vec![r#"li "I am awesome, in green""#]);

        let found = DomWalker.find_by_tag("li", &roots(), false);
        assert!(found.is_empty());
    }

    #[test]
    fn find_by_id_stops_at_first() {
        let a = Node::tag("p").with_attr("id", "dup").with_children(vec![Node::text("first")]);
        let b = Node::tag("p").with_attr("id", "dup").with_children(vec![Node::text("second")]);
        let parent = Node::tag("div").with_children(vec![a, b]);

        let found = DomWalker.find_by_id("dup", &[&parent], true).unwrap();
        assert_eq!(found.children(), &[Node::text("first")]);

        assert_eq!(DomWalker.find_by_id("dup", &[&parent], false), None);
        assert_eq!(DomWalker.find_by_id("missing", &[&parent], true), None);
    }

    #[test]
    fn default_find_by_id_agrees_with_dom_walker() {
        struct Plain;
        impl TreeWalker for Plain {
            fn find_matching<'n>(&self, p: &PredicateMap<'_>, roots: &[&'n Node], recurse: bool) -> Vec<&'n Node> {
                DomWalker.find_matching(p, roots, recurse)
            }
        }
        let found = Plain.find_by_id("content", &roots(), true);
        assert_eq!(found, DomWalker.find_by_id("content", &roots(), true));
        assert!(found.is_some());
    }

    #[test]
    fn tag_name_predicate_requires_tag() {
        let text = Node::text("li");
        let preds = PredicateMap::new().with(PredicateKey::TagName, |_| true);
        assert!(!preds.matches(&text));
        assert!(preds.matches(&Node::tag("li")));
    }

    #[test]
    fn attr_predicate_requires_attribs() {
        let preds = PredicateMap::new().with(PredicateKey::Attr("x".to_string()), |v| v.is_none());
        assert!(!preds.matches(&Node::text("no attribs at all")));
        assert!(preds.matches(&Node::tag("p")));
    }

    #[test]
    fn insert_replaces_same_key() {
        let mut preds = PredicateMap::new().with(PredicateKey::TagName, |_| false);
        preds.insert(PredicateKey::TagName, |_| true);
        assert!(preds.matches(&Node::tag("anything")));
        assert_eq!(format!("{preds:?}"), "{TagName}");
    }

    #[test]
    fn deep_tree_does_not_recurse() {
        let mut node = Node::tag("leaf");
        for _ in 0..2_000 {
            node = Node::tag("wrap").with_children(vec![node]);
        }
        let found = DomWalker.find_by_tag("leaf", &[&node], true);
        assert_eq!(found.len(), 1);
    }
}
