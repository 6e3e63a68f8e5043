#[cfg(test)]
pub(crate) use test_utils::*;

#[cfg(test)]
mod test_utils {
    use crate::node::{nodes_from_json, Node, NodeType};
    use lazy_static::lazy_static;

    lazy_static! {
        /// A small page with enough variety for most selector tests:
        ///
        /// ```text
        /// html
        ///   head
        ///     meta[http-equiv][content]      (no children field)
        ///     title "Test"
        ///   body
        ///     h1 "Welcome"
        ///     div#menu
        ///       ul
        ///         li[type=awesome][color=green] "I am awesome, in green"
        ///         li[type=plain] "plain"
        ///     ul[color=blue][lang=en-us]
        ///       li "water"
        ///       li "sky"
        ///       li "bluebird"
        ///     div#content
        ///       p#"current post".main.post "Cras mattis"
        ///       p.post "Nullam quis"
        ///     div.sidebar
        ///       span "aside"
        ///       p.post.extra "more posts"
        ///       br                           (no children field)
        ///       img[src]                     (empty children)
        ///     h22 "odd header"
        ///     h2 "Second"
        /// ```
        pub(crate) static ref FIXTURE: Vec<Node> = nodes_from_json(indoc::indoc! {r#"
            [{"type": "tag", "name": "html", "attribs": {}, "children": [
              {"type": "tag", "name": "head", "attribs": {}, "children": [
                {"type": "tag", "name": "meta", "attribs": {
                  "http-equiv": "Content-type", "content": "text/html; charset=utf-8"
                }},
                {"type": "tag", "name": "title", "attribs": {}, "children": [{"type": "text", "data": "Test"}]}
              ]},
              {"type": "tag", "name": "body", "attribs": {}, "children": [
                {"type": "tag", "name": "h1", "attribs": {}, "children": [{"type": "text", "data": "Welcome"}]},
                {"type": "tag", "name": "div", "attribs": {"id": "menu"}, "children": [
                  {"type": "tag", "name": "ul", "attribs": {}, "children": [
                    {"type": "tag", "name": "li", "attribs": {"type": "awesome", "color": "green"}, "children": [
                      {"type": "text", "data": "I am awesome, in green"}
                    ]},
                    {"type": "tag", "name": "li", "attribs": {"type": "plain"}, "children": [
                      {"type": "text", "data": "plain"}
                    ]}
                  ]}
                ]},
                {"type": "tag", "name": "ul", "attribs": {"color": "blue", "lang": "en-us"}, "children": [
                  {"type": "tag", "name": "li", "attribs": {}, "children": [{"type": "text", "data": "water"}]},
                  {"type": "tag", "name": "li", "attribs": {}, "children": [{"type": "text", "data": "sky"}]},
                  {"type": "tag", "name": "li", "attribs": {}, "children": [{"type": "text", "data": "bluebird"}]}
                ]},
                {"type": "tag", "name": "div", "attribs": {"id": "content"}, "children": [
                  {"type": "tag", "name": "p", "attribs": {"id": "current post", "class": "main post"}, "children": [
                    {"type": "text", "data": "Cras mattis"}
                  ]},
                  {"type": "tag", "name": "p", "attribs": {"class": "post"}, "children": [
                    {"type": "text", "data": "Nullam quis"}
                  ]}
                ]},
                {"type": "tag", "name": "div", "attribs": {"class": "sidebar"}, "children": [
                  {"type": "tag", "name": "span", "attribs": {}, "children": [{"type": "text", "data": "aside"}]},
                  {"type": "tag", "name": "p", "attribs": {"class": "post extra"}, "children": [
                    {"type": "text", "data": "more posts"}
                  ]},
                  {"type": "tag", "name": "br", "attribs": {}},
                  {"type": "tag", "name": "img", "attribs": {"src": "a.png"}, "children": []}
                ]},
                {"type": "tag", "name": "h22", "attribs": {}, "children": [{"type": "text", "data": "odd header"}]},
                {"type": "tag", "name": "h2", "attribs": {}, "children": [{"type": "text", "data": "Second"}]}
              ]}
            ]}]"#})
        .expect("test error: bad fixture");
    }

    /// A short, human-readable description of a node: `tag#id.class1.class2 "direct text"`, or the quoted data for a
    /// text node.
    pub(crate) fn describe(node: &Node) -> String {
        match node.kind {
            _ if node.is_tag() => {
                let mut result = node.name().unwrap_or_default().to_string();
                if let Some(id) = node.attr("id") {
                    result.push('#');
                    result.push_str(id);
                }
                for class in node.attr("class").unwrap_or_default().split_whitespace() {
                    result.push('.');
                    result.push_str(class);
                }
                let text: String = node.children().iter().filter_map(Node::data).collect();
                if !text.is_empty() {
                    result.push_str(&format!(" {text:?}"));
                }
                result
            }
            NodeType::Text => format!("{:?}", node.data().unwrap_or_default()),
            _ => format!("<{:?}>", node.kind).to_lowercase(),
        }
    }

    pub(crate) fn describe_all(nodes: &[&Node]) -> Vec<String> {
        nodes.iter().map(|node| describe(node)).collect()
    }
}
