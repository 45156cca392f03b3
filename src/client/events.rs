use std::fmt;
use std::str::FromStr;

use super::document::Document;
use super::reconciler::ACTION_ATTR_PREFIX;

/// Abstract events the client delegates at the document level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Submit,
    Input,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Submit => "submit",
            EventKind::Input => "input",
        }
    }

    /// Attribute that binds this event on an element.
    pub fn binding_attr(&self) -> String {
        format!("{ACTION_ATTR_PREFIX}{}", self.as_str())
    }

    /// Input events are coalesced; the rest are sent right away.
    pub fn is_debounced(&self) -> bool {
        matches!(self, EventKind::Input)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "click" => Ok(EventKind::Click),
            "submit" => Ok(EventKind::Submit),
            "input" => Ok(EventKind::Input),
            other => Err(format!("unsupported event kind: {other}")),
        }
    }
}

/// Nearest ancestor-or-self of `target` bound to `kind`, with its action
/// name. The walk stops after `boundary` so bindings outside the mount
/// are never picked up.
pub fn find_binding<D: Document>(
    document: &D,
    target: &D::Element,
    kind: EventKind,
    boundary: &D::Element,
) -> Option<(D::Element, String)> {
    let attr = kind.binding_attr();
    let mut current = Some(target.clone());
    while let Some(element) = current {
        if let Some(action) = document.attribute(&element, &attr) {
            return Some((element, action));
        }
        if element == *boundary {
            return None;
        }
        current = document.parent(&element);
    }
    None
}
