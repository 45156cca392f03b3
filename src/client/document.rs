use std::fmt::Debug;
use std::hash::Hash;

/// Backend-agnostic live document.
///
/// The reconciler only talks to the document through this trait, so a
/// browser binding and the in-memory [`MemoryDocument`](super::MemoryDocument)
/// are interchangeable. Element handles compare by identity: two handles
/// are equal only when they refer to the same live node.
pub trait Document {
    type Element: Clone + Eq + Hash + Debug;

    fn create_element(&mut self, tag: &str) -> Self::Element;

    /// Create a bare text node.
    fn create_text(&mut self, text: &str) -> Self::Element;

    /// Lowercase tag name, `#text` for text nodes.
    fn tag(&self, element: &Self::Element) -> String;

    fn set_attribute(&mut self, element: &Self::Element, name: &str, value: &str);

    fn remove_attribute(&mut self, element: &Self::Element, name: &str);

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn attribute_names(&self, element: &Self::Element) -> Vec<String>;

    /// `textContent` semantics: replaces every child with the text.
    fn set_text(&mut self, element: &Self::Element, text: &str);

    /// Concatenated text of the subtree.
    fn text(&self, element: &Self::Element) -> String;

    fn children(&self, element: &Self::Element) -> Vec<Self::Element>;

    fn parent(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Insert `child` before `reference`, detaching it from wherever it
    /// currently lives.
    fn insert_before(
        &mut self,
        parent: &Self::Element,
        child: &Self::Element,
        reference: &Self::Element,
    );

    /// Append `child`, detaching it from wherever it currently lives.
    fn append_child(&mut self, parent: &Self::Element, child: &Self::Element);

    fn remove_child(&mut self, parent: &Self::Element, child: &Self::Element);
}
