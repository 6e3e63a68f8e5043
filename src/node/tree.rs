use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The kind of a [`Node`].
///
/// This mirrors the `"type"` field of an htmlparser-style DOM, and serializes back to the same string. `script` and
/// `style` elements count as tags for selection (see [`Node::is_tag`]). Any type we don't recognize reads as
/// [`NodeType::Other`], which serializes as `"other"`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Tag,
    Script,
    Style,
    Text,
    Comment,
    Directive,
    Cdata,
    #[serde(other)]
    Other,
}

/// A single element or text unit of a parsed markup tree.
///
/// Nodes are produced by some external parser and are only ever read by this crate. The field layout (and its JSON
/// form) follows the htmlparser DOM shape:
///
/// ```json
/// {"type": "tag", "name": "p", "attribs": {"class": "post"}, "children": [{"type": "text", "data": "hello"}]}
/// ```
///
/// Whether `children` is present matters, not just its length: a tag with `children: None` is genuinely childless
/// (like `<br>`), which is what the `:empty` filter looks for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: NodeType,
    /// The tag name. Present iff this is a tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The tag's attributes. Present iff this is a tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribs: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
    /// The text payload. Present iff this is a text node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl Node {
    /// Creates a tag with no attributes and no children field.
    ///
    /// Use [`Node::with_attr`] and [`Node::with_children`] to fill it in.
    pub fn tag(name: impl Into<String>) -> Self {
        Self {
            kind: NodeType::Tag,
            name: Some(name.into()),
            attribs: Some(BTreeMap::new()),
            children: None,
            data: None,
        }
    }

    pub fn text(data: impl Into<String>) -> Self {
        Self {
            kind: NodeType::Text,
            name: None,
            attribs: None,
            children: None,
            data: Some(data.into()),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attribs
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = Some(children);
        self
    }

    /// Whether this is an element: a tag, script or style.
    pub fn is_tag(&self) -> bool {
        matches!(self.kind, NodeType::Tag | NodeType::Script | NodeType::Style)
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeType::Text
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Gets an attribute's value, if this node has attributes and that attribute is among them.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attribs.as_ref()?.get(name).map(String::as_str)
    }

    /// This node's children, or an empty slice if it has no children field.
    pub fn children(&self) -> &[Node] {
        self.children.as_deref().unwrap_or_default()
    }

    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Node>),
    One(Node),
}

/// Reads a tree (or forest) of nodes from their JSON form.
///
/// The input may be either a single node object or an array of root nodes; either way, the result is the list of
/// roots.
pub fn nodes_from_json(json: &str) -> Result<Vec<Node>, serde_json::Error> {
    let parsed: OneOrMany = serde_json::from_str(json)?;
    Ok(match parsed {
        OneOrMany::Many(nodes) => nodes,
        OneOrMany::One(node) => vec![node],
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use indoc::indoc;

    #[test]
    fn reads_htmlparser_shape() {
        let nodes = nodes_from_json(indoc! {r#"
            [
              {"type": "tag", "name": "p", "attribs": {"class": "post"}, "children": [
                {"type": "text", "data": "hello"}
              ]},
              {"type": "script", "name": "script", "attribs": {}},
              {"type": "comment", "data": "ignore me"}
            ]"#})
        .unwrap();

        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].kind, NodeType::Tag);
        assert_eq!(nodes[0].attr("class"), Some("post"));
        assert_eq!(nodes[0].children(), &[Node::text("hello")]);
        assert_eq!(nodes[1].kind, NodeType::Script);
        assert!(nodes[1].is_tag());
        assert_eq!(nodes[1].children, None);
        assert_eq!(nodes[2].kind, NodeType::Comment);
        assert!(!nodes[2].is_tag());
    }

    #[test]
    fn node_kind_survives_a_round_trip() {
        let json = serde_json::json!([
            {"type": "script", "name": "script", "attribs": {}},
            {"type": "style", "name": "style", "attribs": {}},
            {"type": "comment", "data": "note"},
            {"type": "directive", "name": "!doctype", "data": "!DOCTYPE html"},
            {"type": "cdata", "children": []}
        ]);
        let nodes = nodes_from_json(&json.to_string()).unwrap();
        assert_eq!(serde_json::to_value(&nodes).unwrap(), json);
    }

    #[test]
    fn unknown_kind_is_other() {
        let nodes = nodes_from_json(r#"{"type": "processing-instruction", "data": "xml"}"#).unwrap();
        assert_eq!(nodes[0].kind, NodeType::Other);
        assert_eq!(serde_json::to_value(&nodes[0]).unwrap()["type"], "other");
    }

    #[test]
    fn single_object_is_one_root() {
        let nodes = nodes_from_json(r#"{"type": "tag", "name": "br"}"#).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].name(), Some("br"));
        assert_eq!(nodes[0].attribs, None);
    }

    #[test]
    fn empty_children_is_not_missing_children() {
        let nodes = nodes_from_json(r#"[{"type": "tag", "name": "img", "children": []}]"#).unwrap();
        assert_eq!(nodes[0].children, Some(Vec::new()));
        assert!(nodes[0].children().is_empty());
    }

    #[test]
    fn serializes_without_absent_fields() {
        let node = Node::tag("li").with_attr("color", "green").with_children(vec![Node::text("hi")]);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "tag",
                "name": "li",
                "attribs": {"color": "green"},
                "children": [{"type": "text", "data": "hi"}]
            })
        );
    }

    #[test]
    fn attr_on_text_node() {
        assert_eq!(Node::text("x").attr("class"), None);
        assert!(Node::text("x").is_text());
        assert!(!Node::text("x").is_tag());
    }
}
