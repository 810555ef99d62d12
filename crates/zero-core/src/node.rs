//! Render tree.
//!
//! Components produce `Node` trees. The same tree is serialized once for a
//! static build or committed repeatedly to a live document in dev mode, so
//! it carries no mode-specific state of its own.

use std::fmt::Write as _;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A node in the render tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Node {
    /// Renders nothing.
    #[default]
    Empty,
    /// An element with attributes and children.
    Element(Element),
    /// Text content, escaped on output.
    Text(String),
    /// Pre-rendered markup, emitted verbatim.
    Raw(String),
    /// A sequence of sibling nodes without a wrapper.
    Fragment(Vec<Node>),
}

impl Node {
    /// Start building an element.
    pub fn element(tag: impl Into<String>) -> Element {
        Element::new(tag)
    }

    /// Create a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a raw markup node.
    pub fn raw(html: impl Into<String>) -> Self {
        Self::Raw(html.into())
    }

    /// Create a fragment from sibling nodes.
    pub fn fragment(children: impl IntoIterator<Item = Node>) -> Self {
        Self::Fragment(children.into_iter().collect())
    }

    /// Check whether this node renders nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Fragment(children) => children.iter().all(Node::is_empty),
            _ => false,
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Empty | Self::Raw(_) => {}
            Self::Text(text) => out.push_str(text),
            Self::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
            Self::Fragment(children) => children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    /// Find the first element (depth-first) carrying the given attribute.
    pub fn find_by_attr(&self, name: &str) -> Option<&Element> {
        match self {
            Self::Element(el) => {
                if el.attr_value(name).is_some() {
                    return Some(el);
                }
                el.children.iter().find_map(|c| c.find_by_attr(name))
            }
            Self::Fragment(children) => children.iter().find_map(|c| c.find_by_attr(name)),
            _ => None,
        }
    }

    /// Serialize the tree to HTML.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        self.write_html(&mut html);
        html
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Empty => {}
            Self::Text(text) => out.push_str(&escape_html(text)),
            Self::Raw(html) => out.push_str(html),
            Self::Fragment(children) => children.iter().for_each(|c| c.write_html(out)),
            Self::Element(el) => el.write_html(out),
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name.
    pub tag: String,
    /// Attributes in insertion order.
    pub attrs: Vec<(String, String)>,
    /// Child nodes.
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Add a child node.
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Add several child nodes.
    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Look up an attribute value.
    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Finish building and wrap as a `Node`.
    pub fn into_node(self) -> Node {
        Node::Element(self)
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            if value.is_empty() {
                let _ = write!(out, " {}", name);
            } else {
                let _ = write!(out, r#" {}="{}""#, name, escape_html(value));
            }
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }

        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_to_html() {
        let node = Node::element("a")
            .attr("href", "/about")
            .child("About")
            .into_node();

        assert_eq!(node.to_html(), r#"<a href="/about">About</a>"#);
    }

    #[test]
    fn test_text_is_escaped() {
        let node = Node::text("<script>&</script>");
        assert_eq!(node.to_html(), "&lt;script&gt;&amp;&lt;/script&gt;");
    }

    #[test]
    fn test_raw_is_verbatim() {
        assert_eq!(Node::raw("<b>hi</b>").to_html(), "<b>hi</b>");
    }

    #[test]
    fn test_attribute_escaping_and_flags() {
        let node = Node::element("div")
            .attr("title", r#"say "hi""#)
            .attr("data-zero-location", "")
            .into_node();

        assert_eq!(
            node.to_html(),
            r#"<div title="say &quot;hi&quot;" data-zero-location></div>"#
        );
    }

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        let node = Node::element("meta").attr("charset", "utf-8").into_node();
        assert_eq!(node.to_html(), r#"<meta charset="utf-8">"#);
    }

    #[test]
    fn test_fragment_and_empty() {
        let node = Node::fragment([Node::text("a"), Node::Empty, Node::text("b")]);

        assert_eq!(node.to_html(), "ab");
        assert!(!node.is_empty());
        assert!(Node::fragment([Node::Empty]).is_empty());
    }

    #[test]
    fn test_text_content_skips_raw() {
        let node = Node::element("div")
            .child("Hello ")
            .child(Node::raw("<hr>"))
            .child(Node::element("b").child("world"))
            .into_node();

        assert_eq!(node.text_content(), "Hello world");
    }

    #[test]
    fn test_find_by_attr() {
        let node = Node::fragment([
            Node::text("x"),
            Node::element("section")
                .child(Node::element("div").attr("data-route", "/about"))
                .into_node(),
        ]);

        let found = node.find_by_attr("data-route").unwrap();
        assert_eq!(found.attr_value("data-route"), Some("/about"));
        assert!(node.find_by_attr("data-missing").is_none());
    }
}
