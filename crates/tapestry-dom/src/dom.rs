//! Arena-backed DOM tree.
//!
//! Nodes are never freed: removing a node detaches it from its parent but keeps
//! its slot alive, so `NodeId`s held by the content model (cached elements,
//! entity wrappers) stay valid for the lifetime of the `Dom`.

use smol_str::SmolStr;

use crate::style::{parse_style, serialize_style};

/// Handle to a node stored in a [`Dom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Element payload: lowercase tag name, ordered attributes and inline style.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementData {
    pub tag: SmolStr,
    /// Attributes other than `style`, in insertion order.
    pub attributes: Vec<(SmolStr, String)>,
    /// Inline style declarations, in insertion order.
    pub style: Vec<(SmolStr, String)>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
    Comment(String),
    Fragment,
}

#[derive(Clone, Debug)]
struct NodeSlot {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An arena of DOM nodes.
#[derive(Debug, Default)]
pub struct Dom {
    nodes: Vec<NodeSlot>,
}

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeSlot {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Total number of nodes ever created in this arena.
    pub fn created_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element(ElementData {
            tag: SmolStr::new(tag.to_ascii_lowercase()),
            ..Default::default()
        }))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Comment(text.into()))
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.alloc(NodeKind::Fragment)
    }

    /// Clone a node. A shallow clone copies the tag, attributes and style only.
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> NodeId {
        let kind = self.kind(id).clone();
        let copy = self.alloc(kind);
        if deep {
            let children = self.children(id).to_vec();
            for child in children {
                let child_copy = self.clone_node(child, true);
                self.append_child(copy, child_copy);
            }
        }
        copy
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn contains_id(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.kind(id) {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes[id.index()].kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Element(_))
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Text(_))
    }

    /// Lowercase tag name of an element node.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag_name(id).is_some_and(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn set_text(&mut self, id: NodeId, value: impl Into<String>) {
        if let NodeKind::Text(text) = &mut self.nodes[id.index()].kind {
            *text = value.into();
        }
    }

    /// Length of a node in DOM offset units: chars for text, child count otherwise.
    pub fn node_length(&self, id: NodeId) -> usize {
        match self.kind(id) {
            NodeKind::Text(text) | NodeKind::Comment(text) => text.chars().count(),
            _ => self.children(id).len(),
        }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Comment(_) => {}
            _ => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
        }
    }

    // === Tree navigation ===

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Position of a node among its parent's children.
    pub fn child_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.child_index(id)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.child_index(id)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    /// True if `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    // === Tree mutation ===

    /// Detach a node from its parent, if any.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.index()].parent.take() {
            self.nodes[parent.index()].children.retain(|&c| c != id);
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// Insert `child` into `parent` before `reference`, moving it if it is
    /// already attached somewhere. A reference that is not a child of
    /// `parent` appends.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if reference == Some(child) {
            return;
        }
        if self.contains(child, parent) {
            tracing::warn!(
                target: "tapestry::dom",
                ?child,
                ?parent,
                "insert_before: refusing to insert a node into its own subtree"
            );
            return;
        }
        self.detach(child);
        let index = reference
            .and_then(|r| self.children(parent).iter().position(|&c| c == r))
            .unwrap_or_else(|| self.children(parent).len());
        self.nodes[parent.index()].children.insert(index, child);
        self.nodes[child.index()].parent = Some(parent);
    }

    /// Remove `child` from `parent`. No-op if it is not a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.parent(child) == Some(parent) {
            self.detach(child);
        }
    }

    /// Move all children of `from` to the end of `to`.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        let children = std::mem::take(&mut self.nodes[from.index()].children);
        for child in children {
            self.nodes[child.index()].parent = None;
            self.append_child(to, child);
        }
    }

    /// Remove all children of a node.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id.index()].children);
        for child in children {
            self.nodes[child.index()].parent = None;
        }
    }

    /// Replace a node with its children.
    pub fn unwrap_node(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let children = self.children(id).to_vec();
        for child in children {
            self.insert_before(parent, child, Some(id));
        }
        self.detach(id);
    }

    /// Move all children of `id` into a new `tag` element that becomes its only child.
    pub fn wrap_all_children(&mut self, id: NodeId, tag: &str) -> NodeId {
        let wrapper = self.create_element(tag);
        self.move_children(id, wrapper);
        self.append_child(id, wrapper);
        wrapper
    }

    // === Attributes ===

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Set an attribute. Setting `style` replaces the inline declarations.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let value = value.into();
        let Some(element) = self.element_mut(id) else {
            return;
        };
        if name.eq_ignore_ascii_case("style") {
            element.style = parse_style(&value);
            return;
        }
        match element
            .attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value,
            None => element
                .attributes
                .push((SmolStr::new(name.to_ascii_lowercase()), value)),
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(element) = self.element_mut(id) {
            if name.eq_ignore_ascii_case("style") {
                element.style.clear();
            } else {
                element.attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
            }
        }
    }

    /// Serialized `style` attribute, if any declaration is present.
    pub fn style_attribute(&self, id: NodeId) -> Option<String> {
        let element = self.element(id)?;
        (!element.style.is_empty()).then(|| serialize_style(&element.style))
    }

    /// Whitespace separated class names.
    pub fn class_list(&self, id: NodeId) -> Vec<&str> {
        self.attribute(id, "class")
            .map(|c| c.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.class_list(id).contains(&class)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        let value = match self.attribute(id, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
            _ => class.to_string(),
        };
        self.set_attribute(id, "class", value);
    }

    // === Inline style ===

    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.element(id)?
            .style
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(property))
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Set an inline style property. An empty value removes it.
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) {
        let Some(element) = self.element_mut(id) else {
            return;
        };
        if value.is_empty() {
            element.style.retain(|(k, _)| !k.eq_ignore_ascii_case(property));
            return;
        }
        match element
            .style
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(property))
        {
            Some((_, existing)) => *existing = value.to_string(),
            None => element
                .style
                .push((SmolStr::new(property.to_ascii_lowercase()), value.to_string())),
        }
    }

    pub fn remove_style(&mut self, id: NodeId, property: &str) {
        self.set_style(id, property, "");
    }

    // === Dataset ===

    /// All `data-*` attributes, keyed by camelCase name.
    pub fn dataset(&self, id: NodeId) -> std::collections::BTreeMap<String, String> {
        self.element(id)
            .map(|e| {
                e.attributes
                    .iter()
                    .filter_map(|(k, v)| {
                        k.strip_prefix("data-")
                            .map(|name| (data_key_to_camel(name), v.clone()))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn data(&self, id: NodeId, key: &str) -> Option<&str> {
        self.attribute(id, &camel_to_data_attribute(key))
    }

    pub fn set_data(&mut self, id: NodeId, key: &str, value: impl Into<String>) {
        self.set_attribute(id, &camel_to_data_attribute(key), value);
    }

    pub fn remove_data(&mut self, id: NodeId, key: &str) {
        self.remove_attribute(id, &camel_to_data_attribute(key));
    }
}

/// `editing-info` -> `editingInfo`
fn data_key_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// `editingInfo` -> `data-editing-info`
fn camel_to_data_attribute(key: &str) -> String {
    let mut out = String::from("data-");
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
