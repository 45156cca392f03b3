//! Client action pipeline: dedup, debounce, offline replay, navigation.

mod common;

use std::time::Duration;

use common::recording::RecordingTransport;
use serde_json::{json, Value};
use wiretree::client::{
    ApplyOutcome, Dispatcher, Document, EventKind, MemoryDocument, PAYLOAD_ATTR,
};
use wiretree::config::ClientConfig;
use wiretree::render::Snapshot;
use wiretree::view::ViewNode;

fn dispatcher() -> (
    Dispatcher<MemoryDocument, RecordingTransport>,
    std::sync::Arc<wiretree::client::MemoryHistory>,
) {
    let history = common::memory_history();
    let d = Dispatcher::new(
        common::memory_reconciler(),
        RecordingTransport::new(),
        history.clone(),
        &ClientConfig::default(),
    );
    (d, history)
}

#[tokio::test]
async fn identical_responses_apply_once() {
    let (d, _) = dispatcher();
    let bytes = Snapshot {
        root: ViewNode::new("main").key("root").text("same"),
    }
    .to_bytes()
    .unwrap();
    d.transport().respond_with(bytes.clone());

    d.send("refresh", Value::Null).await;
    let count = d.with_reconciler(|r| r.document().mutation_count());

    d.send("refresh", Value::Null).await;
    assert_eq!(d.with_reconciler(|r| r.document().mutation_count()), count);
    assert_eq!(d.apply_snapshot_bytes(&bytes), ApplyOutcome::Duplicate);
    assert_eq!(d.transport().actions(), ["refresh", "refresh"]);
}

#[tokio::test(start_paused = true)]
async fn rapid_input_collapses_into_one_send() {
    let (d, _) = dispatcher();
    for value in ["h", "he", "hel", "hell", "hello"] {
        d.input("draft", value);
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(d.transport().sent().is_empty());

    tokio::time::sleep(Duration::from_millis(400)).await;
    let sent = d.transport().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].action, "draft");
    assert_eq!(sent[0].payload, json!({"value": "hello"}));
}

#[tokio::test(start_paused = true)]
async fn separate_bindings_debounce_independently() {
    let (d, _) = dispatcher();
    d.input("title", "a");
    d.input("body", "b");
    tokio::time::sleep(Duration::from_millis(400)).await;

    let mut actions = d.transport().actions();
    actions.sort();
    assert_eq!(actions, ["body", "title"]);
}

#[tokio::test]
async fn offline_actions_replay_in_order() {
    let (d, _) = dispatcher();
    d.transport().set_offline(true);
    d.send("first", json!({"n": 1})).await;
    d.send("second", json!({"n": 2})).await;
    d.send("third", json!({"n": 3})).await;
    assert!(!d.is_connected());
    assert_eq!(d.queued(), 3);
    assert!(d.transport().sent().is_empty());

    d.transport().set_offline(false);
    d.set_connected(true).await;

    assert_eq!(d.queued(), 0);
    assert_eq!(d.transport().actions(), ["first", "second", "third"]);
    let text = d.with_reconciler(|r| r.document().text(r.mount()));
    assert_eq!(text, "third {\"n\":3}");
}

#[tokio::test]
async fn navigation_pushes_history_and_reaches_the_server() {
    let (d, history) = dispatcher();
    d.send("navigate:/tasks/1", Value::Null).await;
    d.pop_state("/tasks").await;

    assert_eq!(history.entries(), ["/tasks/1"]);
    let paths: Vec<_> = d
        .transport()
        .sent()
        .iter()
        .map(|e| e.navigate_path().map(str::to_string))
        .collect();
    assert_eq!(
        paths,
        [Some("/tasks/1".to_string()), Some("/tasks".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn delegated_input_event_is_debounced_with_its_value() {
    let (d, _) = dispatcher();
    let root = ViewNode::new("form").key("form").child(
        ViewNode::new("input")
            .key("draft")
            .on("input", "draft")
            .attr(PAYLOAD_ATTR, r#"{"field":"title"}"#),
    );
    d.apply_snapshot_bytes(&Snapshot { root }.to_bytes().unwrap());
    let input = d.with_reconciler(|r| r.registry().get("draft").copied().unwrap());

    assert!(d.handle_event(&input, EventKind::Input, Some("a".into())).await);
    assert!(d.handle_event(&input, EventKind::Input, Some("ab".into())).await);
    tokio::time::sleep(Duration::from_millis(400)).await;

    let sent = d.transport().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].payload, json!({"field": "title", "value": "ab"}));
}

#[tokio::test(start_paused = true)]
async fn inputs_sharing_an_action_debounce_separately() {
    let (d, _) = dispatcher();
    let row = |id: u64| {
        ViewNode::new("input")
            .key(format!("row-{id}"))
            .on("input", "rename")
            .attr(PAYLOAD_ATTR, json!({ "id": id }).to_string())
    };
    let root = ViewNode::new("ul").key("rows").child(row(1)).child(row(2));
    d.apply_snapshot_bytes(&Snapshot { root }.to_bytes().unwrap());
    let (first, second) = d.with_reconciler(|r| {
        (
            r.registry().get("row-1").copied().unwrap(),
            r.registry().get("row-2").copied().unwrap(),
        )
    });

    d.handle_event(&first, EventKind::Input, Some("first row".into())).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    d.handle_event(&second, EventKind::Input, Some("second row".into())).await;
    tokio::time::sleep(Duration::from_millis(400)).await;

    let mut payloads: Vec<Value> = d.transport().sent().into_iter().map(|e| e.payload).collect();
    payloads.sort_by_key(|p| p["id"].as_u64());
    assert_eq!(
        payloads,
        [
            json!({"id": 1, "value": "first row"}),
            json!({"id": 2, "value": "second row"}),
        ]
    );
}
