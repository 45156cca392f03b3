use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::attr::{AttrValue, IntoAttr};

/// Nodes under this tag never reach the live document; their children are
/// hoisted into the `<head>` of the first-paint HTML.
pub const HEAD_TAG: &str = "head";

/// Tag of a bare text node used for mixed content.
pub const TEXT_TAG: &str = "#text";

/// The canonical UI-tree unit.
///
/// A node carries `text` or `children`, never both. Nodes are built fresh
/// on every render and are not mutated after construction.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ViewNode {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, AttrValue>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub events: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ViewNode>,
}

impl ViewNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// A bare text node. Used as a child only when text is mixed with
    /// elements; a lone text child collapses into the parent's `text`.
    pub fn text_node(text: impl Into<String>) -> Self {
        Self {
            tag: TEXT_TAG.to_string(),
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set an attribute. `false`/`None` values remove it.
    ///
    /// Names starting with `on` are handler bindings and are stored in
    /// `events` (`onclick` → `click`) so `attrs` never carries event data.
    pub fn attr(mut self, name: impl Into<String>, value: impl IntoAttr) -> Self {
        let name = name.into();
        if let Some(event) = name.strip_prefix("on").filter(|e| !e.is_empty()) {
            if let Some(AttrValue::Text(action)) = value.into_attr() {
                self.events.insert(event.to_string(), action);
            }
            return self;
        }
        match value.into_attr() {
            Some(v) => {
                self.attrs.insert(name, v);
            }
            None => {
                self.attrs.remove(&name);
            }
        }
        self
    }

    /// Bind an abstract event ("click", "submit", "input") to an action name.
    pub fn on(mut self, event: impl Into<String>, action: impl Into<String>) -> Self {
        self.events.insert(event.into(), action.into());
        self
    }

    /// Set text content, discarding any children.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.clear();
        self.text = Some(text.into());
        self
    }

    /// Append a child. Existing text becomes a leading text node so the
    /// text/children exclusivity holds.
    pub fn child(mut self, child: ViewNode) -> Self {
        if let Some(text) = self.text.take() {
            self.children.push(ViewNode::text_node(text));
        }
        self.children.push(child);
        self.collapse_text_child()
    }

    pub fn children(self, children: impl IntoIterator<Item = ViewNode>) -> Self {
        children.into_iter().fold(self, ViewNode::child)
    }

    pub fn is_head(&self) -> bool {
        self.tag == HEAD_TAG
    }

    pub fn is_text_node(&self) -> bool {
        self.tag == TEXT_TAG
    }

    /// Tag used for the real element. Missing or unusable tags fall back
    /// to `div` so a malformed node still produces an element.
    pub fn element_tag(&self) -> &str {
        if is_valid_name(&self.tag) {
            &self.tag
        } else {
            "div"
        }
    }

    fn collapse_text_child(mut self) -> Self {
        let collapsible = matches!(
            self.children.as_slice(),
            [only] if only.is_text_node() && only.key.is_none()
        );
        if collapsible {
            if let Some(only) = self.children.pop() {
                self.text = Some(only.text.unwrap_or_default());
            }
        }
        self
    }

    /// Lenient decoding from a wire value.
    ///
    /// Never fails: a missing or mistyped field is treated as absent. When
    /// both `text` and `children` arrive, children win.
    pub fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let tag = obj
            .get("tag")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let key = obj.get("key").and_then(json_scalar);

        let attrs = obj
            .get("attrs")
            .and_then(Value::as_object)
            .map(|m| {
                m.iter()
                    .filter_map(|(k, v)| AttrValue::from_json(v).map(|v| (k.clone(), v)))
                    .collect()
            })
            .unwrap_or_default();

        let events = obj
            .get("events")
            .and_then(Value::as_object)
            .map(|m| {
                m.iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        let children: Vec<ViewNode> = obj
            .get("children")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter(|v| v.is_object())
                    .map(ViewNode::from_json)
                    .collect()
            })
            .unwrap_or_default();

        let text = if children.is_empty() {
            obj.get("text").and_then(json_scalar)
        } else {
            None
        };

        Self {
            tag,
            key,
            attrs,
            events,
            text,
            children,
        }
    }
}

/// Tag and attribute names accepted for real elements.
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

fn json_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for ViewNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(ViewNode::from_json(&value))
    }
}
