//! Deterministic HTML serialization and a small declarative builder.

use std::fmt::Write;

use crate::dom::{Dom, NodeId, NodeKind};
use crate::style::serialize_style;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

impl Dom {
    /// Serialize a node and its subtree.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Serialize the children of a node.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_node(child, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            NodeKind::Text(text) => out.push_str(&escape_text(text)),
            NodeKind::Comment(text) => {
                let _ = write!(out, "<!--{text}-->");
            }
            NodeKind::Fragment => {
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
            }
            NodeKind::Element(element) => {
                let _ = write!(out, "<{}", element.tag);
                for (name, value) in &element.attributes {
                    let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
                }
                if !element.style.is_empty() {
                    let _ = write!(
                        out,
                        " style=\"{}\"",
                        escape_attr(&serialize_style(&element.style))
                    );
                }
                out.push('>');
                if is_void_element(&element.tag) {
                    return;
                }
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
                let _ = write!(out, "</{}>", element.tag);
            }
        }
    }

    /// Materialize an [`Html`] description as new nodes and return the root.
    pub fn build(&mut self, html: &Html) -> NodeId {
        match html {
            Html::Text(text) => self.create_text(text.clone()),
            Html::Element {
                tag,
                attributes,
                children,
            } => {
                let element = self.create_element(tag);
                for (name, value) in attributes {
                    self.set_attribute(element, name, value.clone());
                }
                for child in children {
                    let child = self.build(child);
                    self.append_child(element, child);
                }
                element
            }
        }
    }
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Declarative node description, mostly used to set up fixtures.
#[derive(Clone, Debug, PartialEq)]
pub enum Html {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<Html>,
    },
    Text(String),
}

/// Start an element description.
pub fn el(tag: &str) -> Html {
    Html::Element {
        tag: tag.to_string(),
        attributes: Vec::new(),
        children: Vec::new(),
    }
}

/// A text node description.
pub fn text(value: &str) -> Html {
    Html::Text(value.to_string())
}

impl Html {
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        if let Html::Element { attributes, .. } = &mut self {
            attributes.push((name.to_string(), value.to_string()));
        }
        self
    }

    pub fn child(mut self, child: Html) -> Self {
        if let Html::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    pub fn text(self, value: &str) -> Self {
        self.child(Html::Text(value.to_string()))
    }
}
