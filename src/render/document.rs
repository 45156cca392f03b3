use crate::view::ViewNode;

use super::head::extract_head;
use super::html::{escape_html, render_html};
use super::wire::{Snapshot, SnapshotError};

/// Id of the inline JSON script that carries the first-paint snapshot.
pub const SNAPSHOT_SCRIPT_ID: &str = "wiretree-snapshot";
/// Name of the `<meta>` tag carrying the session id.
pub const SESSION_META: &str = "wiretree-session";

#[derive(Debug, Clone)]
pub struct DocumentOptions {
    /// Id of the element the client mounts into.
    pub mount_id: String,
    pub lang: String,
    pub session: Option<String>,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            mount_id: "app".to_string(),
            lang: "en".to_string(),
            session: None,
        }
    }
}

/// Full first-paint HTML document.
///
/// Head entries are hoisted into `<head>`. The body holds the mount
/// element and an inert JSON copy of the same snapshot so the client can
/// adopt the server-rendered nodes instead of rebuilding them.
pub fn render_document(tree: ViewNode, opts: &DocumentOptions) -> Result<String, SnapshotError> {
    let (body, head_nodes) = extract_head(tree);

    let mut head = String::new();
    let declares_charset = head_nodes
        .iter()
        .any(|n| n.tag == "meta" && n.attrs.contains_key("charset"));
    if !declares_charset {
        head.push_str("<meta charset=\"utf-8\">");
    }
    for node in &head_nodes {
        head.push_str(&render_html(node));
    }
    if let Some(session) = &opts.session {
        head.push_str(&format!(
            "<meta name=\"{SESSION_META}\" content=\"{}\">",
            escape_html(session)
        ));
    }

    let markup = render_html(&body);
    let snapshot = Snapshot { root: body }.to_bytes()?;
    let snapshot = String::from_utf8_lossy(&snapshot).replace('<', "\\u003c");

    Ok(format!(
        "<!DOCTYPE html><html lang=\"{lang}\"><head>{head}</head><body>\
         <div id=\"{mount}\">{markup}</div>\
         <script type=\"application/json\" id=\"{SNAPSHOT_SCRIPT_ID}\">{snapshot}</script>\
         </body></html>",
        lang = escape_html(&opts.lang),
        mount = escape_html(&opts.mount_id),
    ))
}
