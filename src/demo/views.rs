use anyhow::Context as _;
use serde_json::json;

use crate::client::PAYLOAD_ATTR;
use crate::router::{GuardDecision, Props};
use crate::view::{ViewNode, HEAD_TAG};

use super::state::{BoardState, Task};

fn board(props: &Props) -> anyhow::Result<BoardState> {
    serde_json::from_value(props.model.clone()).context("model is not a task board")
}

fn nav_link(key: &str, path: &str, label: &str) -> ViewNode {
    ViewNode::new("a")
        .key(key)
        .attr("href", path)
        .on("click", format!("navigate:{path}"))
        .text(label)
}

/// Outer frame shared by every page.
pub fn shell(inner: ViewNode, props: &Props) -> anyhow::Result<ViewNode> {
    let state = board(props)?;
    Ok(ViewNode::new("div")
        .key("shell")
        .child(
            ViewNode::new(HEAD_TAG)
                .child(ViewNode::new("title").text("Tasks · wiretree"))
                .child(
                    ViewNode::new("meta")
                        .attr("name", "viewport")
                        .attr("content", "width=device-width, initial-scale=1"),
                ),
        )
        .child(
            ViewNode::new("nav")
                .key("nav")
                .child(nav_link("nav-tasks", "/tasks", "Tasks"))
                .child(nav_link("nav-settings", "/settings", "Settings"))
                .child(
                    ViewNode::new("span")
                        .key("open-count")
                        .attr("class", "badge")
                        .text(state.open_count().to_string()),
                ),
        )
        .child(inner))
}

fn task_row(task: &Task) -> ViewNode {
    let payload = json!({ "id": task.id }).to_string();
    ViewNode::new("li")
        .key(format!("task-{}", task.id))
        .attr("class", if task.done { "task done" } else { "task" })
        .child(
            ViewNode::new("input")
                .key(format!("task-{}-check", task.id))
                .attr("type", "checkbox")
                .attr("checked", task.done)
                .on("click", "toggle")
                .attr(PAYLOAD_ATTR, payload.clone()),
        )
        .child(nav_link(
            &format!("task-{}-link", task.id),
            &format!("/tasks/{}", task.id),
            &task.title,
        ))
        .child(
            ViewNode::new("button")
                .key(format!("task-{}-remove", task.id))
                .attr("type", "button")
                .on("click", "remove")
                .attr(PAYLOAD_ATTR, payload)
                .text("×"),
        )
}

pub fn task_list(props: &Props) -> anyhow::Result<ViewNode> {
    let state = board(props)?;

    let list = if state.tasks.is_empty() {
        ViewNode::new("p").key("empty").text("Nothing to do.")
    } else {
        ViewNode::new("ul")
            .key("task-list")
            .children(state.tasks.iter().map(task_row))
    };

    Ok(ViewNode::new("main")
        .key("tasks")
        .child(ViewNode::new("h1").key("tasks-title").text("Tasks"))
        .child(
            ViewNode::new("form")
                .key("new-task")
                .on("submit", "add")
                .child(
                    ViewNode::new("input")
                        .key("draft")
                        .attr("type", "text")
                        .attr("placeholder", "What needs doing?")
                        .attr("value", state.draft.as_str())
                        .on("input", "draft"),
                )
                .child(ViewNode::new("button").attr("type", "submit").text("Add")),
        )
        .child(list)
        .child(
            ViewNode::new("button")
                .key("clear-done")
                .attr("type", "button")
                .attr("disabled", state.tasks.iter().all(|t| !t.done))
                .on("click", "clear_done")
                .text("Clear completed"),
        ))
}

pub fn task_detail(props: &Props) -> anyhow::Result<ViewNode> {
    let state = board(props)?;
    let raw = props.param("id").unwrap_or_default();
    let task = raw.parse::<u64>().ok().and_then(|id| state.task(id));

    let Some(task) = task else {
        return Ok(ViewNode::new("main")
            .key("task-missing")
            .child(ViewNode::new("h1").text("Unknown task"))
            .child(ViewNode::new("p").text(format!("There is no task #{raw}.")))
            .child(nav_link("back", "/tasks", "Back to the list")));
    };

    Ok(ViewNode::new("main")
        .key(format!("task-{}-detail", task.id))
        .child(ViewNode::new(HEAD_TAG).child(ViewNode::new("title").text(task.title.clone())))
        .child(ViewNode::new("h1").text(task.title.clone()))
        .child(
            ViewNode::new("p")
                .key("status")
                .text(if task.done { "Done" } else { "Open" }),
        )
        .child(nav_link("back", "/tasks", "Back to the list")))
}

/// Settings are only reachable once unlocked.
pub fn require_unlocked(props: &Props) -> anyhow::Result<GuardDecision> {
    let unlocked = props
        .field("unlocked")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    Ok(if unlocked {
        GuardDecision::Allow
    } else {
        GuardDecision::Redirect("/tasks".to_string())
    })
}

pub fn settings(props: &Props) -> anyhow::Result<ViewNode> {
    let state = board(props)?;
    Ok(ViewNode::new("main")
        .key("settings")
        .child(ViewNode::new("h1").text("Settings"))
        .child(ViewNode::new("p").text(format!("{} task(s) in total.", state.tasks.len())))
        .child(
            ViewNode::new("button")
                .key("lock")
                .attr("type", "button")
                .on("click", "lock")
                .text("Lock settings"),
        ))
}
