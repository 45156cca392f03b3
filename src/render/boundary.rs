use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::view::ViewNode;

pub const RENDER_ERROR_CLASS: &str = "wiretree-render-error";

/// Run a page or layout and never let its failure escape.
///
/// Both an `Err` and a panic are replaced by [`fallback_node`] so one
/// broken page cannot stop a response from going out.
pub fn render_boundary<F>(label: &str, render: F) -> ViewNode
where
    F: FnOnce() -> anyhow::Result<ViewNode>,
{
    match catch_unwind(AssertUnwindSafe(render)) {
        Ok(Ok(node)) => node,
        Ok(Err(err)) => {
            tracing::error!(boundary = label, error = %err, "Render failed");
            fallback_node(&err.to_string())
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(boundary = label, panic = %message, "Render panicked");
            fallback_node(&message)
        }
    }
}

/// Minimal node shown in place of a failed render.
pub fn fallback_node(message: &str) -> ViewNode {
    ViewNode::new("div")
        .attr("class", RENDER_ERROR_CLASS)
        .attr("role", "alert")
        .text(message)
}

/// Default page for paths the router does not know.
pub fn not_found_node(path: &str) -> ViewNode {
    ViewNode::new("main")
        .key("not-found")
        .child(ViewNode::new("h1").text("Not found"))
        .child(ViewNode::new("p").text(format!("No page at {path}")))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "render panicked".to_string()
    }
}
