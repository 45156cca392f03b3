use crate::view::ViewNode;

/// Pull every head node out of the tree.
///
/// Returns the body tree and the hoisted head entries in document order.
/// A head node's own children become the entries; the head node itself is
/// dropped. Every other node keeps its shape, and a parent left with no
/// children simply has none (never an empty list on the wire).
pub fn extract_head(root: ViewNode) -> (ViewNode, Vec<ViewNode>) {
    let mut head_nodes = Vec::new();

    if root.is_head() {
        head_nodes.extend(root.children);
        return (ViewNode::new("div"), head_nodes);
    }

    let body = strip(root, &mut head_nodes);
    (body, head_nodes)
}

fn strip(mut node: ViewNode, head_nodes: &mut Vec<ViewNode>) -> ViewNode {
    if node.children.is_empty() {
        return node;
    }

    let children = std::mem::take(&mut node.children);
    for child in children {
        if child.is_head() {
            head_nodes.extend(child.children);
        } else {
            node.children.push(strip(child, head_nodes));
        }
    }
    node
}
