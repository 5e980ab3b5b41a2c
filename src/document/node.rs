//! Element tree types for template documents

use crate::error::Span;

/// A node in the document tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
}

impl Node {
    /// Borrow the element if this node is one
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Mutably borrow the element if this node is one
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// An element with a qualified name, ordered attributes and ordered children.
///
/// Names are kept exactly as written in the source (`svg:g`, `inkscape:label`),
/// so prefixes are opaque to everything that works on the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
    /// Byte range of the start tag in the source text, if parsed
    pub span: Option<Span>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            span: None,
        }
    }

    /// Builder-style attribute setter
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style child appender
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Builder-style text appender
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Get an attribute value by qualified name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value in place or appending it
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Append a child node
    pub fn push(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Iterate over direct child elements
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Iterate over direct child elements with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.name == name)
    }

    /// Mutably iterate over direct child elements with the given name
    pub fn children_named_mut<'a>(
        &'a mut self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a mut Element> {
        self.children
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .filter(move |e| e.name == name)
    }

    /// First direct child element with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// First direct child element with the given name, mutably
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children
            .iter_mut()
            .filter_map(Node::as_element_mut)
            .find(|e| e.name == name)
    }

    /// Detach every direct child element with the given name, in document order
    pub fn remove_children_named(&mut self, name: &str) -> Vec<Element> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.children.len());
        for child in self.children.drain(..) {
            match child {
                Node::Element(e) if e.name == name => removed.push(e),
                other => kept.push(other),
            }
        }
        self.children = kept;
        removed
    }

    /// Leading text content, before the first non-text child
    pub fn text(&self) -> String {
        self.children
            .iter()
            .map_while(|child| match child {
                Node::Text(t) | Node::CData(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace the leading text content, keeping any child elements after it
    pub fn set_text(&mut self, value: impl Into<String>) {
        let leading = self
            .children
            .iter()
            .take_while(|child| matches!(child, Node::Text(_) | Node::CData(_)))
            .count();
        self.children
            .splice(0..leading, std::iter::once(Node::Text(value.into())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attr_preserves_order() {
        let mut e = Element::new("g")
            .with_attr("id", "layer1")
            .with_attr("style", "display:inline");
        e.set_attr("id", "layer2");
        e.set_attr("transform", "translate(0,0)");

        let keys: Vec<_> = e.attributes.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["id", "style", "transform"]);
        assert_eq!(e.attr("id"), Some("layer2"));
    }

    #[test]
    fn test_remove_children_named() {
        let mut root = Element::new("svg")
            .with_child(Element::new("defs"))
            .with_text("\n")
            .with_child(Element::new("g").with_attr("id", "a"))
            .with_child(Element::new("g").with_attr("id", "b"));

        let removed = root.remove_children_named("g");
        assert_eq!(removed.len(), 2);
        assert_eq!(removed[0].attr("id"), Some("a"));
        assert_eq!(removed[1].attr("id"), Some("b"));
        assert_eq!(root.children.len(), 2);
        assert!(root.child("g").is_none());
        assert!(root.child("defs").is_some());
    }

    #[test]
    fn test_set_text_replaces_leading_text_only() {
        let mut span = Element::new("tspan")
            .with_text("Hello")
            .with_text(" world")
            .with_child(Element::new("tspan").with_text("inner"));

        span.set_text("Bye");
        assert_eq!(span.text(), "Bye");
        assert_eq!(span.children.len(), 2);
        assert!(span.child("tspan").is_some());
    }

    #[test]
    fn test_set_text_on_empty_element() {
        let mut span = Element::new("tspan");
        span.set_text("Alice");
        assert_eq!(span.text(), "Alice");
    }

    #[test]
    fn test_clone_is_deep() {
        let original = Element::new("g").with_child(Element::new("text").with_text("a"));
        let mut copy = original.clone();
        copy.child_mut("text").unwrap().set_text("b");
        assert_eq!(original.child("text").unwrap().text(), "a");
        assert_eq!(copy.child("text").unwrap().text(), "b");
    }

    #[test]
    fn test_child_mut_outlives_name() {
        let mut text = Element::new("text").with_child(Element::new("tspan").with_text("Name"));
        let span = text.child_mut(&String::from("tspan")).unwrap();
        span.set_text("Alice");
        assert_eq!(text.child("tspan").unwrap().text(), "Alice");
        assert!(text.child_mut("missing").is_none());
    }
}
