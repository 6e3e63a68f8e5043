use derive_builder::Builder;

/// Knobs for an [`Engine`](crate::select::Engine).
///
/// The defaults reproduce the long-standing behavior of the selector language, quirks included. Build one with
/// [`SelectOptionsBuilder`]; any field you don't set keeps its default.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Builder)]
#[builder(default)]
pub struct SelectOptions {
    /// How `:not` decides that a node is one of the nodes to exclude.
    pub not_comparison: NotComparison,
    /// Whether positional filters keep their historical off-by-one behavior.
    pub filter_semantics: FilterSemantics,
}

/// Node equality for the `:not` filter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum NotComparison {
    /// A node is excluded only if it is the very same node as one selected by the `:not` argument.
    #[default]
    Identity,
    /// A node is excluded if it agrees with a selected node on every field that the selected node has: kind, name
    /// (if it has one), and text. Attributes and children count as equal only if they're the same objects, which in
    /// practice means the same node.
    ///
    /// This is looser than [`NotComparison::Identity`] for childless nodes: a `<br>` with no children field looks
    /// equal to every other such `<br>`.
    FieldWise,
}

/// Behavior of the positional filters `:even`, `:odd` and `:gt`, and of `:contains`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum FilterSemantics {
    /// `:even` keeps the elements at odd (0-based) positions in each group and `:odd` the ones at even positions, so
    /// that they count from 1. `:gt(n)` keeps everything from index `n - 1` on. `:contains` selects the parent of
    /// each matching text node, even when that's a descendant of the node being filtered.
    #[default]
    Legacy,
    /// `:even` and `:odd` keep even and odd 0-based positions; `:gt(n)` keeps everything after index `n`.
    /// `:contains` selects the filtered node itself.
    Conventional,
}
