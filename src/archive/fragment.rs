//! Owned content tree of a post body
//!
//! scraper's `Html` is not `Send`, so the body container is copied into this
//! small owned tree right after extraction. Workers can then hold it across the
//! asset downloads, rewrite image attributes in place, and serialize it back to
//! HTML for Markdown conversion.

use scraper::{ElementRef, Node};

/// Elements never carried into the archive
const DROPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements that end a line in the plain-text rendering
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "br", "li", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "tr",
];

/// One node of a body fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentNode {
    Text(String),
    Element(ContentElement),
}

/// An element with its attributes in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentElement {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<ContentNode>,
}

impl ContentElement {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets an attribute, keeping its position when it already exists
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(key, _)| key != name);
    }
}

/// The extracted body of a post
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyFragment {
    pub nodes: Vec<ContentNode>,
}

impl BodyFragment {
    /// Copies an element (the body container itself included) into an owned tree
    pub fn from_element(element: ElementRef<'_>) -> Self {
        Self {
            nodes: convert_element(element).into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All `<img>` elements in document order
    pub fn images(&self) -> Vec<&ContentElement> {
        let mut found = Vec::new();
        collect_images(&self.nodes, &mut found);
        found
    }

    /// Mutable access to all `<img>` elements in document order
    pub fn images_mut(&mut self) -> Vec<&mut ContentElement> {
        let mut found = Vec::new();
        collect_images_mut(&mut self.nodes, &mut found);
        found
    }

    /// Serializes the fragment back to HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            write_node(node, &mut out);
        }
        out
    }

    /// Concatenated text content, one line per block-level run
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.nodes, &mut out);
        out.split('\n')
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn collect_text(nodes: &[ContentNode], out: &mut String) {
    for node in nodes {
        match node {
            ContentNode::Text(text) => out.push_str(text),
            ContentNode::Element(element) => {
                collect_text(&element.children, out);
                if BLOCK_ELEMENTS.contains(&element.name.as_str()) {
                    out.push('\n');
                }
            }
        }
    }
}

fn convert_element(element: ElementRef<'_>) -> Option<ContentNode> {
    let value = element.value();
    let name = value.name().to_ascii_lowercase();
    if DROPPED_ELEMENTS.contains(&name.as_str()) {
        return None;
    }

    let mut converted = ContentElement {
        name,
        attrs: value
            .attrs()
            .map(|(key, val)| (key.to_string(), val.to_string()))
            .collect(),
        children: Vec::new(),
    };

    for child in element.children() {
        match child.value() {
            Node::Text(text) => converted.children.push(ContentNode::Text(text.to_string())),
            Node::Element(_) => {
                if let Some(node) = ElementRef::wrap(child).and_then(convert_element) {
                    converted.children.push(node);
                }
            }
            _ => {}
        }
    }

    Some(ContentNode::Element(converted))
}

fn collect_images<'a>(nodes: &'a [ContentNode], found: &mut Vec<&'a ContentElement>) {
    for node in nodes {
        if let ContentNode::Element(element) = node {
            if element.name == "img" {
                found.push(element);
            }
            collect_images(&element.children, found);
        }
    }
}

fn collect_images_mut<'a>(nodes: &'a mut [ContentNode], found: &mut Vec<&'a mut ContentElement>) {
    for node in nodes {
        if let ContentNode::Element(element) = node {
            if element.name == "img" {
                found.push(element);
            } else {
                collect_images_mut(&mut element.children, found);
            }
        }
    }
}

fn write_node(node: &ContentNode, out: &mut String) {
    match node {
        ContentNode::Text(text) => out.push_str(&escape_text(text)),
        ContentNode::Element(element) => {
            out.push('<');
            out.push_str(&element.name);
            for (key, value) in &element.attrs {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&element.name.as_str()) {
                return;
            }

            for child in &element.children {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(&element.name);
            out.push('>');
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
