use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::view::ViewNode;

use super::head::extract_head;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Malformed snapshot: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Wire snapshot: `{ "root": ViewNode }`.
///
/// Same shape for action responses and push frames. Always a full tree,
/// never a diff.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub root: ViewNode,
}

impl Snapshot {
    /// Build the update-path snapshot. Head entries are dropped: the
    /// document head is only written on first paint.
    pub fn from_tree(tree: ViewNode) -> Self {
        let (root, _head) = extract_head(tree);
        Self { root }
    }

    /// Deterministic encoding: the same tree always yields the same bytes,
    /// which the client relies on for deduplication.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        serde_json::to_vec(self).map_err(SnapshotError::Encode)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, SnapshotError> {
        serde_json::from_slice(bytes).map_err(SnapshotError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::HEAD_TAG;

    #[test]
    fn update_snapshot_drops_head_entries() {
        let tree = ViewNode::new("main")
            .child(ViewNode::new(HEAD_TAG).child(ViewNode::new("title").text("t")))
            .child(ViewNode::new("p").text("x"));
        let snapshot = Snapshot::from_tree(tree);
        assert_eq!(snapshot.root.children.len(), 1);
        assert_eq!(snapshot.root.children[0].tag, "p");
    }

    #[test]
    fn encoding_is_stable() {
        let tree = || {
            ViewNode::new("div")
                .attr("z", "1")
                .attr("a", "2")
                .on("submit", "go")
                .on("click", "tap")
        };
        let a = Snapshot::from_tree(tree()).to_bytes().unwrap();
        let b = Snapshot::from_tree(tree()).to_bytes().unwrap();
        assert_eq!(a, b);
        let text = String::from_utf8(a).unwrap();
        assert!(text.find("\"a\"").unwrap() < text.find("\"z\"").unwrap());
    }

    #[test]
    fn missing_root_decodes_to_empty_node() {
        let snapshot = Snapshot::from_slice(b"{}").unwrap();
        assert_eq!(snapshot.root, ViewNode::default());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            Snapshot::from_slice(b"not json"),
            Err(SnapshotError::Decode(_))
        ));
    }
}
