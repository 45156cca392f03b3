//! Arena-backed document used by headless clients and tests.

use std::collections::BTreeMap;

use crate::render::escape_html;
use crate::view::TEXT_TAG;

use super::document::Document;

/// Handle into a [`MemoryDocument`]. Identity is the arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    attrs: BTreeMap<String, String>,
    /// Only meaningful for text nodes.
    text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

/// In-memory DOM with a mutation counter.
///
/// Detached nodes stay in the arena; a handle never changes meaning.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    nodes: Vec<NodeData>,
    mutations: u64,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mutating calls made so far.
    pub fn mutation_count(&self) -> u64 {
        self.mutations
    }

    /// Serialized children of `element`.
    pub fn inner_html(&self, element: &NodeId) -> String {
        let mut out = String::new();
        for child in &self.node(element).children {
            self.write_html(*child, &mut out);
        }
        out
    }

    pub fn outer_html(&self, element: &NodeId) -> String {
        let mut out = String::new();
        self.write_html(*element, &mut out);
        out
    }

    /// First descendant (or self) carrying `data-key="key"`.
    pub fn find_by_key(&self, root: &NodeId, key: &str) -> Option<NodeId> {
        if self.node(root).attrs.get("data-key").map(String::as_str) == Some(key) {
            return Some(*root);
        }
        self.node(root)
            .children
            .iter()
            .find_map(|child| self.find_by_key(child, key))
    }

    fn node(&self, id: &NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: &NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    fn alloc(&mut self, tag: &str, text: &str) -> NodeId {
        self.nodes.push(NodeData {
            tag: tag.to_ascii_lowercase(),
            attrs: BTreeMap::new(),
            text: text.to_string(),
            children: Vec::new(),
            parent: None,
        });
        NodeId(self.nodes.len() - 1)
    }

    fn detach(&mut self, child: &NodeId) {
        if let Some(parent) = self.node_mut(child).parent.take() {
            self.node_mut(&parent).children.retain(|c| c != child);
        }
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let node = self.node(&id);
        if node.tag == TEXT_TAG {
            out.push_str(&escape_html(&node.text));
            return;
        }
        out.push('<');
        out.push_str(&node.tag);
        for (name, value) in &node.attrs {
            out.push(' ');
            out.push_str(name);
            if !value.is_empty() {
                out.push_str("=\"");
                out.push_str(&escape_html(value));
                out.push('"');
            }
        }
        out.push('>');
        for child in &node.children {
            self.write_html(*child, out);
        }
        out.push_str("</");
        out.push_str(&node.tag);
        out.push('>');
    }
}

impl Document for MemoryDocument {
    type Element = NodeId;

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.mutations += 1;
        self.alloc(tag, "")
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        self.mutations += 1;
        self.alloc(TEXT_TAG, text)
    }

    fn tag(&self, element: &NodeId) -> String {
        self.node(element).tag.clone()
    }

    fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) {
        self.mutations += 1;
        self.node_mut(element)
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&mut self, element: &NodeId, name: &str) {
        self.mutations += 1;
        self.node_mut(element).attrs.remove(name);
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        self.node(element).attrs.get(name).cloned()
    }

    fn attribute_names(&self, element: &NodeId) -> Vec<String> {
        self.node(element).attrs.keys().cloned().collect()
    }

    fn set_text(&mut self, element: &NodeId, text: &str) {
        self.mutations += 1;
        if self.node(element).tag == TEXT_TAG {
            self.node_mut(element).text = text.to_string();
            return;
        }
        let children = std::mem::take(&mut self.node_mut(element).children);
        for child in children {
            self.node_mut(&child).parent = None;
        }
        if !text.is_empty() {
            let node = self.alloc(TEXT_TAG, text);
            self.node_mut(&node).parent = Some(*element);
            self.node_mut(element).children.push(node);
        }
    }

    fn text(&self, element: &NodeId) -> String {
        let node = self.node(element);
        if node.tag == TEXT_TAG {
            return node.text.clone();
        }
        node.children.iter().map(|c| self.text(c)).collect()
    }

    fn children(&self, element: &NodeId) -> Vec<NodeId> {
        self.node(element).children.clone()
    }

    fn parent(&self, element: &NodeId) -> Option<NodeId> {
        self.node(element).parent
    }

    fn insert_before(&mut self, parent: &NodeId, child: &NodeId, reference: &NodeId) {
        self.mutations += 1;
        self.detach(child);
        let siblings = &mut self.node_mut(parent).children;
        let index = siblings
            .iter()
            .position(|c| c == reference)
            .unwrap_or(siblings.len());
        siblings.insert(index, *child);
        self.node_mut(child).parent = Some(*parent);
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.mutations += 1;
        self.detach(child);
        self.node_mut(parent).children.push(*child);
        self.node_mut(child).parent = Some(*parent);
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) {
        if self.node(child).parent != Some(*parent) {
            return;
        }
        self.mutations += 1;
        self.detach(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_moves_between_parents() {
        let mut doc = MemoryDocument::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let child = doc.create_element("span");
        doc.append_child(&a, &child);
        doc.append_child(&b, &child);
        assert!(doc.children(&a).is_empty());
        assert_eq!(doc.children(&b), vec![child]);
        assert_eq!(doc.parent(&child), Some(b));
    }

    #[test]
    fn insert_before_reorders_siblings() {
        let mut doc = MemoryDocument::new();
        let list = doc.create_element("ul");
        let x = doc.create_element("li");
        let y = doc.create_element("li");
        doc.append_child(&list, &x);
        doc.append_child(&list, &y);
        doc.insert_before(&list, &y, &x);
        assert_eq!(doc.children(&list), vec![y, x]);
    }

    #[test]
    fn set_text_replaces_children() {
        let mut doc = MemoryDocument::new();
        let p = doc.create_element("p");
        let b = doc.create_element("b");
        doc.append_child(&p, &b);
        doc.set_text(&p, "hi");
        assert_eq!(doc.text(&p), "hi");
        assert_eq!(doc.parent(&b), None);
        assert_eq!(doc.inner_html(&p), "hi");
    }

    #[test]
    fn mutations_are_counted() {
        let mut doc = MemoryDocument::new();
        let before = doc.mutation_count();
        let el = doc.create_element("div");
        doc.set_attribute(&el, "class", "x");
        assert_eq!(doc.mutation_count(), before + 2);
        let _ = doc.attribute(&el, "class");
        assert_eq!(doc.mutation_count(), before + 2);
    }
}
