use serde::{Serialize, Serializer};
use serde_json::Value;

/// A present attribute value.
///
/// `false`/`null` attributes are never stored; they are dropped when the
/// node is built or decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Regular `name="value"` attribute.
    Text(String),
    /// Boolean-true attribute, rendered without a value (`disabled`).
    Flag,
}

impl AttrValue {
    /// The string written into a DOM attribute. Flags carry an empty value.
    pub fn as_dom_value(&self) -> &str {
        match self {
            AttrValue::Text(s) => s,
            AttrValue::Flag => "",
        }
    }

    /// Decode a wire value. Returns `None` for `false`, `null` and shapes
    /// that have no attribute meaning (arrays, objects).
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(AttrValue::Text(s.clone())),
            Value::Bool(true) => Some(AttrValue::Flag),
            Value::Number(n) => Some(AttrValue::Text(n.to_string())),
            _ => None,
        }
    }
}

impl Serialize for AttrValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AttrValue::Text(s) => serializer.serialize_str(s),
            AttrValue::Flag => serializer.serialize_bool(true),
        }
    }
}

/// Conversion used by [`ViewNode::attr`](super::ViewNode::attr).
///
/// Returning `None` means "omit the attribute entirely".
pub trait IntoAttr {
    fn into_attr(self) -> Option<AttrValue>;
}

impl IntoAttr for AttrValue {
    fn into_attr(self) -> Option<AttrValue> {
        Some(self)
    }
}

impl IntoAttr for &str {
    fn into_attr(self) -> Option<AttrValue> {
        Some(AttrValue::Text(self.to_string()))
    }
}

impl IntoAttr for String {
    fn into_attr(self) -> Option<AttrValue> {
        Some(AttrValue::Text(self))
    }
}

impl IntoAttr for &String {
    fn into_attr(self) -> Option<AttrValue> {
        Some(AttrValue::Text(self.clone()))
    }
}

impl IntoAttr for bool {
    fn into_attr(self) -> Option<AttrValue> {
        self.then_some(AttrValue::Flag)
    }
}

impl IntoAttr for u64 {
    fn into_attr(self) -> Option<AttrValue> {
        Some(AttrValue::Text(self.to_string()))
    }
}

impl IntoAttr for i64 {
    fn into_attr(self) -> Option<AttrValue> {
        Some(AttrValue::Text(self.to_string()))
    }
}

impl IntoAttr for usize {
    fn into_attr(self) -> Option<AttrValue> {
        Some(AttrValue::Text(self.to_string()))
    }
}

impl<T: IntoAttr> IntoAttr for Option<T> {
    fn into_attr(self) -> Option<AttrValue> {
        self.and_then(IntoAttr::into_attr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn false_and_none_are_omitted() {
        assert_eq!(false.into_attr(), None);
        assert_eq!(None::<&str>.into_attr(), None);
        assert_eq!(true.into_attr(), Some(AttrValue::Flag));
    }

    #[test]
    fn wire_decoding_drops_null_and_false() {
        assert_eq!(AttrValue::from_json(&json!(null)), None);
        assert_eq!(AttrValue::from_json(&json!(false)), None);
        assert_eq!(AttrValue::from_json(&json!(true)), Some(AttrValue::Flag));
        assert_eq!(
            AttrValue::from_json(&json!(3)),
            Some(AttrValue::Text("3".to_string()))
        );
    }

    #[test]
    fn flag_serializes_as_true() {
        assert_eq!(serde_json::to_string(&AttrValue::Flag).unwrap(), "true");
        assert_eq!(
            serde_json::to_string(&AttrValue::Text("x".into())).unwrap(),
            "\"x\""
        );
    }
}
