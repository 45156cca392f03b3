use crate::view::{is_valid_name, AttrValue, ViewNode};

/// Tags that never get a closing tag or children.
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Escape the five reserved HTML characters.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a body tree. Head nodes are skipped; run
/// [`extract_head`](super::extract_head) first to keep their entries.
pub fn render_html(node: &ViewNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: &ViewNode, out: &mut String) {
    if node.is_text_node() {
        out.push_str(&escape_html(node.text.as_deref().unwrap_or_default()));
        return;
    }
    if node.is_head() {
        return;
    }

    let tag = node.element_tag();

    out.push('<');
    out.push_str(tag);

    if let Some(key) = &node.key {
        write_attr(out, "data-key", Some(key));
    }
    for (name, value) in &node.attrs {
        if !is_valid_name(name) || name == "data-key" || name.starts_with("data-action-") {
            continue;
        }
        match value {
            AttrValue::Text(v) => write_attr(out, name, Some(v)),
            AttrValue::Flag => write_attr(out, name, None),
        }
    }
    for (event, action) in &node.events {
        if is_valid_name(event) {
            write_attr(out, &format!("data-action-{event}"), Some(action));
        }
    }
    out.push('>');

    if VOID_TAGS.contains(&tag) {
        return;
    }

    if let Some(text) = &node.text {
        out.push_str(&escape_html(text));
    } else {
        for child in &node.children {
            write_node(child, out);
        }
    }

    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn write_attr(out: &mut String, name: &str, value: Option<&str>) {
    out.push(' ');
    out.push_str(name);
    if let Some(value) = value {
        out.push_str("=\"");
        out.push_str(&escape_html(value));
        out.push('"');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::HEAD_TAG;

    #[test]
    fn escapes_text_and_attributes() {
        let node = ViewNode::new("p")
            .attr("title", "a \"quoted\" <value>")
            .text("1 < 2 & 'x'");
        assert_eq!(
            render_html(&node),
            "<p title=\"a &quot;quoted&quot; &lt;value&gt;\">1 &lt; 2 &amp; &#39;x&#39;</p>"
        );
    }

    #[test]
    fn key_and_events_become_data_attributes() {
        let node = ViewNode::new("button")
            .key("save-btn")
            .on("click", "save")
            .text("Save");
        assert_eq!(
            render_html(&node),
            "<button data-key=\"save-btn\" data-action-click=\"save\">Save</button>"
        );
    }

    #[test]
    fn flags_render_without_value() {
        let node = ViewNode::new("input")
            .attr("type", "checkbox")
            .attr("checked", true)
            .attr("disabled", false);
        assert_eq!(render_html(&node), "<input checked type=\"checkbox\">");
    }

    #[test]
    fn void_tags_have_no_closing_tag_or_children() {
        let node = ViewNode::new("br").child(ViewNode::new("span"));
        assert_eq!(render_html(&node), "<br>");
    }

    #[test]
    fn mixed_content_renders_text_nodes_inline() {
        let node = ViewNode::new("p")
            .text("Hello ")
            .child(ViewNode::new("b").text("world"));
        assert_eq!(render_html(&node), "<p>Hello <b>world</b></p>");
    }

    #[test]
    fn head_nodes_never_reach_the_body() {
        let node = ViewNode::new("div")
            .child(ViewNode::new(HEAD_TAG).child(ViewNode::new("title").text("x")))
            .child(ViewNode::new("span"));
        assert_eq!(render_html(&node), "<div><span></span></div>");
    }

    #[test]
    fn invalid_tag_falls_back_to_div() {
        let node = ViewNode::from_json(&serde_json::json!({"text": "x"}));
        assert_eq!(render_html(&node), "<div>x</div>");
    }
}
