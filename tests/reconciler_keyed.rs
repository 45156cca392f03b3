//! Keyed reconciliation against the in-memory document.

mod common;

use wiretree::client::{Document, MemoryDocument, Reconciler};
use wiretree::render::Snapshot;
use wiretree::view::ViewNode;

fn rows(keys: &[&str]) -> Snapshot {
    Snapshot {
        root: ViewNode::new("ul").key("rows").children(
            keys.iter()
                .map(|k| ViewNode::new("li").key(*k).text(format!("row {k}"))),
        ),
    }
}

fn row_elements(r: &Reconciler<MemoryDocument>) -> Vec<wiretree::client::NodeId> {
    let ul = *r.registry().get("rows").unwrap();
    r.document().children(&ul)
}

#[test]
fn reorder_and_removal_preserve_identity() {
    let mut r = common::memory_reconciler();
    r.apply(&rows(&["a", "b", "c"]));
    let before = row_elements(&r);

    r.apply(&rows(&["c", "a"]));
    let after = row_elements(&r);

    assert_eq!(after, vec![before[2], before[0]]);
    assert_eq!(r.document().parent(&before[1]), None);
    assert!(!r.registry().contains("b"));
}

#[test]
fn reapplying_the_same_tree_mutates_nothing() {
    let mut r = common::memory_reconciler();
    let snapshot = rows(&["a", "b"]);
    r.apply(&snapshot);
    let count = r.document().mutation_count();
    r.apply(&snapshot);
    assert_eq!(r.document().mutation_count(), count);
}

#[test]
fn reapplying_parsed_wire_bytes_mutates_nothing() {
    let mut r = common::memory_reconciler();
    let bytes = rows(&["x", "y", "z"]).to_bytes().unwrap();
    r.apply(&Snapshot::from_slice(&bytes).unwrap());
    let count = r.document().mutation_count();
    r.apply(&Snapshot::from_slice(&bytes).unwrap());
    assert_eq!(r.document().mutation_count(), count);
}

#[test]
fn insertion_in_the_middle_moves_nothing_else() {
    let mut r = common::memory_reconciler();
    r.apply(&rows(&["a", "c"]));
    let before = row_elements(&r);
    r.apply(&rows(&["a", "b", "c"]));
    let after = row_elements(&r);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[1]);
    assert_eq!(
        r.document().inner_html(r.mount()),
        "<ul data-key=\"rows\"><li data-key=\"a\">row a</li><li data-key=\"b\">row b</li><li data-key=\"c\">row c</li></ul>"
    );
}

#[test]
fn keyed_element_survives_moving_between_parents() {
    let mut r = common::memory_reconciler();
    let tree = |left: bool| Snapshot {
        root: ViewNode::new("div")
            .key("board")
            .child(ViewNode::new("ul").key("left").children(
                left.then(|| ViewNode::new("li").key("card").text("card")),
            ))
            .child(ViewNode::new("ul").key("right").children(
                (!left).then(|| ViewNode::new("li").key("card").text("card")),
            )),
    };

    r.apply(&tree(true));
    let card = *r.registry().get("card").unwrap();
    r.apply(&tree(false));

    let right = *r.registry().get("right").unwrap();
    assert_eq!(r.document().parent(&card), Some(right));
}

#[test]
fn mixed_text_and_elements_render_in_order() {
    let mut r = common::memory_reconciler();
    r.apply(&Snapshot {
        root: ViewNode::new("p")
            .key("p")
            .text("Hello ")
            .child(ViewNode::new("b").text("world")),
    });
    assert_eq!(
        r.document().inner_html(r.mount()),
        "<p data-key=\"p\">Hello <b>world</b></p>"
    );
}
