use crate::node::Node;

/// The nodes selected so far, grouped by the branch of evaluation that produced them.
///
/// Most steps put each found node in its own group. Filters with a preselector keep one group per input group, which
/// is what lets `:even`, `:odd` and `:last` work per parent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Context<'n> {
    groups: Vec<Vec<&'n Node>>,
}

impl<'n> Context<'n> {
    pub fn new(groups: Vec<Vec<&'n Node>>) -> Self {
        Self { groups }
    }

    pub fn single_group(nodes: Vec<&'n Node>) -> Self {
        Self { groups: vec![nodes] }
    }

    /// A context with each node in its own group.
    pub fn from_nodes<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = &'n Node>,
    {
        Self {
            groups: nodes.into_iter().map(|node| vec![node]).collect(),
        }
    }

    pub fn groups(&self) -> &[Vec<&'n Node>] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<Vec<&'n Node>> {
        self.groups
    }

    /// All nodes, in group order.
    pub fn nodes(&self) -> impl Iterator<Item = &'n Node> + '_ {
        self.groups.iter().flatten().copied()
    }

    /// The total number of nodes across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Whether there are no nodes at all. A context of only empty groups is empty.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(Vec::is_empty)
    }

    pub fn flatten(self) -> Vec<&'n Node> {
        self.groups.into_iter().flatten().collect()
    }
}

/// The starting point of a selection: one or more nodes, each searched inclusively.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roots<'n>(Vec<&'n Node>);

impl<'n> Roots<'n> {
    pub fn as_slice(&self) -> &[&'n Node] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<&'n Node> {
        self.0
    }
}

impl<'n> From<&'n Node> for Roots<'n> {
    fn from(value: &'n Node) -> Self {
        Self(vec![value])
    }
}

impl<'n> From<&'n [Node]> for Roots<'n> {
    fn from(value: &'n [Node]) -> Self {
        Self(value.iter().collect())
    }
}

impl<'n> From<&'n Vec<Node>> for Roots<'n> {
    fn from(value: &'n Vec<Node>) -> Self {
        Self(value.iter().collect())
    }
}

impl<'n> From<Vec<&'n Node>> for Roots<'n> {
    fn from(value: Vec<&'n Node>) -> Self {
        Self(value)
    }
}

impl<'n> From<&[&'n Node]> for Roots<'n> {
    fn from(value: &[&'n Node]) -> Self {
        Self(value.to_vec())
    }
}

impl<'n, const N: usize> From<[&'n Node; N]> for Roots<'n> {
    fn from(value: [&'n Node; N]) -> Self {
        Self(value.to_vec())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn grouping() {
        let (a, b, c) = (Node::text("a"), Node::text("b"), Node::text("c"));

        let ctx = Context::from_nodes([&a, &b]);
        assert_eq!(ctx.groups(), &[vec![&a], vec![&b]]);

        let ctx = Context::new(vec![vec![&a, &b], vec![], vec![&c]]);
        assert_eq!(ctx.len(), 3);
        assert!(!ctx.is_empty());
        assert_eq!(ctx.nodes().collect::<Vec<_>>(), vec![&a, &b, &c]);
        assert_eq!(ctx.flatten(), vec![&a, &b, &c]);
    }

    #[test]
    fn only_empty_groups_is_empty() {
        assert!(Context::new(vec![vec![], vec![]]).is_empty());
        assert!(Context::default().is_empty());
        assert_eq!(Context::new(vec![vec![], vec![]]).len(), 0);
    }

    #[test]
    fn roots_from_various() {
        let nodes = vec![Node::text("a"), Node::text("b")];
        assert_eq!(Roots::from(&nodes).as_slice().len(), 2);
        assert_eq!(Roots::from(nodes.as_slice()).as_slice().len(), 2);
        assert_eq!(Roots::from(&nodes[0]).into_vec(), vec![&nodes[0]]);
        assert_eq!(Roots::from([&nodes[1], &nodes[0]]).into_vec(), vec![&nodes[1], &nodes[0]]);
    }
}
