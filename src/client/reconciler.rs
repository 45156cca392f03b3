use std::collections::HashSet;

use crate::render::Snapshot;
use crate::view::{AttrValue, ViewNode, TEXT_TAG};

use super::document::Document;
use super::registry::KeyRegistry;

/// Attribute carrying element identity.
pub const KEY_ATTR: &str = "data-key";
/// Prefix of the attributes carrying event bindings.
pub const ACTION_ATTR_PREFIX: &str = "data-action-";

/// Tags whose text is user input and must never be overwritten by a render.
const TEXT_INPUT_TAGS: &[&str] = &["input", "textarea"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountState {
    Unmounted,
    Mounted,
}

/// Applies wire snapshots to one mount point with minimal mutation.
///
/// Every call runs to completion synchronously. Keyed elements that
/// survive an update are only ever moved, never removed and re-added, so
/// focus, scroll position and uncommitted input stay put.
pub struct Reconciler<D: Document> {
    document: D,
    mount: D::Element,
    registry: KeyRegistry<D::Element>,
    state: MountState,
    /// Elements given a place during the current apply.
    claimed: HashSet<D::Element>,
    /// Subtrees removed during the current apply; their keys are released
    /// once the apply finishes unless they were reattached.
    detached: Vec<D::Element>,
}

impl<D: Document> Reconciler<D> {
    pub fn new(document: D, mount: D::Element) -> Self {
        Self {
            document,
            mount,
            registry: KeyRegistry::new(),
            state: MountState::Unmounted,
            claimed: HashSet::new(),
            detached: Vec::new(),
        }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn mount(&self) -> &D::Element {
        &self.mount
    }

    pub fn state(&self) -> MountState {
        self.state
    }

    pub fn registry(&self) -> &KeyRegistry<D::Element> {
        &self.registry
    }

    /// Take over server-rendered markup: register every `data-key`
    /// element under the mount so the first snapshot patches it in place.
    pub fn adopt(&mut self) -> usize {
        let mut stack = self.document.children(&self.mount);
        let mut adopted = 0;
        if !stack.is_empty() {
            self.state = MountState::Mounted;
        }
        while let Some(element) = stack.pop() {
            if let Some(key) = self.document.attribute(&element, KEY_ATTR) {
                self.registry.insert(key, element.clone());
                adopted += 1;
            }
            stack.extend(self.document.children(&element));
        }
        tracing::debug!(adopted, "Adopted server-rendered elements");
        adopted
    }

    pub fn apply(&mut self, snapshot: &Snapshot) {
        self.apply_root(&snapshot.root);
    }

    /// Patch the existing root when its key still maps to an attached
    /// element of the same tag; otherwise rebuild the mount from scratch.
    pub fn apply_root(&mut self, root: &ViewNode) {
        let existing = root
            .key
            .as_deref()
            .and_then(|key| self.registry.get(key))
            .filter(|el| self.document.parent(el).as_ref() == Some(&self.mount))
            .filter(|el| self.document.tag(el) == root.element_tag())
            .cloned();

        let mount = self.mount.clone();
        match existing {
            Some(element) => {
                self.claimed.insert(element.clone());
                self.patch(&element, root);
                for child in self.document.children(&mount) {
                    if child != element {
                        self.discard(&mount, &child);
                    }
                }
            }
            None => {
                for child in self.document.children(&mount) {
                    self.discard(&mount, &child);
                }
                self.registry.clear();
                let element = self.create(root);
                self.document.append_child(&mount, &element);
            }
        }

        self.release_detached();
        self.claimed.clear();
        self.state = MountState::Mounted;
    }

    /// Build a fresh element subtree for `node`.
    fn create(&mut self, node: &ViewNode) -> D::Element {
        if node.is_text_node() {
            let element = self
                .document
                .create_text(node.text.as_deref().unwrap_or_default());
            if let Some(key) = &node.key {
                self.registry.insert(key.clone(), element.clone());
            }
            return element;
        }

        let element = self.document.create_element(node.element_tag());
        if let Some(key) = &node.key {
            self.registry.insert(key.clone(), element.clone());
        }
        self.sync_attributes(&element, node);

        if let Some(text) = &node.text {
            if !text.is_empty() {
                self.document.set_text(&element, text);
            }
        } else {
            for child in &node.children {
                let child_el = self.create(child);
                self.document.append_child(&element, &child_el);
            }
        }
        element
    }

    /// Update an existing element in place.
    fn patch(&mut self, element: &D::Element, node: &ViewNode) {
        if node.is_text_node() {
            let text = node.text.as_deref().unwrap_or_default();
            if self.document.text(element) != text {
                self.document.set_text(element, text);
            }
            return;
        }

        self.sync_attributes(element, node);

        let tag = self.document.tag(element);
        let is_text_input = TEXT_INPUT_TAGS.contains(&tag.as_str());

        if !node.children.is_empty() {
            self.reconcile_children(element, &node.children);
            return;
        }
        // Text inside inputs belongs to the user until it is committed.
        if is_text_input {
            return;
        }
        match &node.text {
            Some(text) => {
                let has_elements = self
                    .document
                    .children(element)
                    .iter()
                    .any(|c| self.document.tag(c) != TEXT_TAG);
                if has_elements || self.document.text(element) != *text {
                    let replaced = self.document.children(element);
                    self.detached.extend(replaced);
                    self.document.set_text(element, text);
                }
            }
            None => self.reconcile_children(element, &[]),
        }
    }

    /// Keyed reconciliation of `parent`'s child list against `nodes`.
    fn reconcile_children(&mut self, parent: &D::Element, nodes: &[ViewNode]) {
        // 1. Target list: reuse keyed elements, create everything else.
        // An element claimed once in this apply is never handed out again,
        // so duplicate keys degrade to fresh elements.
        let mut targets = Vec::with_capacity(nodes.len());
        for node in nodes {
            let existing = node
                .key
                .as_deref()
                .and_then(|key| self.registry.get(key))
                .filter(|el| !self.claimed.contains(*el))
                .filter(|el| self.document.tag(el) == expected_tag(node))
                .cloned();

            let element = match existing {
                Some(element) => {
                    self.patch(&element, node);
                    element
                }
                None => self.create(node),
            };
            self.claimed.insert(element.clone());
            targets.push(element);
        }
        let target_set: HashSet<_> = targets.iter().cloned().collect();

        // 2. Drop current children that are not part of the target list.
        for child in self.document.children(parent) {
            if !target_set.contains(&child) {
                self.discard(parent, &child);
            }
        }

        // 3. Move or insert out-of-place targets; leave the rest alone.
        let mut current = self.document.children(parent);
        for (index, target) in targets.iter().enumerate() {
            if current.get(index) == Some(target) {
                continue;
            }
            if let Some(pos) = current.iter().position(|c| c == target) {
                current.remove(pos);
            }
            match current.get(index) {
                Some(reference) => self.document.insert_before(parent, target, reference),
                None => self.document.append_child(parent, target),
            }
            current.insert(index, target.clone());
        }
    }

    /// Overwrite managed attributes and drop any that are no longer wanted.
    fn sync_attributes(&mut self, element: &D::Element, node: &ViewNode) {
        let mut wanted: Vec<(String, String)> = Vec::new();
        if let Some(key) = &node.key {
            wanted.push((KEY_ATTR.to_string(), key.clone()));
        }
        for (name, value) in &node.attrs {
            if crate::view::is_valid_name(name) && name != KEY_ATTR && !name.starts_with(ACTION_ATTR_PREFIX) {
                wanted.push((name.clone(), value_of(value)));
            }
        }
        for (event, action) in &node.events {
            if crate::view::is_valid_name(event) {
                wanted.push((format!("{ACTION_ATTR_PREFIX}{event}"), action.clone()));
            }
        }

        for name in self.document.attribute_names(element) {
            if !wanted.iter().any(|(n, _)| *n == name) {
                self.document.remove_attribute(element, &name);
            }
        }
        for (name, value) in &wanted {
            if self.document.attribute(element, name).as_deref() != Some(value.as_str()) {
                self.document.set_attribute(element, name, value);
            }
        }
    }

    fn discard(&mut self, parent: &D::Element, child: &D::Element) {
        self.document.remove_child(parent, child);
        self.detached.push(child.clone());
    }

    /// Forget the keys of every removed subtree. Elements that were moved
    /// back under the mount later in the same apply keep their entries.
    fn release_detached(&mut self) {
        let mut stack = std::mem::take(&mut self.detached);
        while let Some(element) = stack.pop() {
            if self.is_attached(&element) {
                continue;
            }
            if let Some(key) = self.document.attribute(&element, KEY_ATTR) {
                self.registry.release(&key, &element);
            }
            stack.extend(self.document.children(&element));
        }
    }

    fn is_attached(&self, element: &D::Element) -> bool {
        let mut current = self.document.parent(element);
        while let Some(parent) = current {
            if parent == self.mount {
                return true;
            }
            current = self.document.parent(&parent);
        }
        false
    }
}

fn expected_tag(node: &ViewNode) -> &str {
    if node.is_text_node() {
        TEXT_TAG
    } else {
        node.element_tag()
    }
}

fn value_of(value: &AttrValue) -> String {
    value.as_dom_value().to_string()
}
