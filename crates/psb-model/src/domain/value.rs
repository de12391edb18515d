use serde::Serialize;

use crate::Payload;

/// Marker written in place of payload fields once a result has been consumed.
pub const REDACTED: &str = "<removed>";

/// Indirect reference to a payload held by a store.
///
/// The bytes are only materialized when the reference is resolved against the named store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRef {
    /// Name of the store holding the payload.
    pub store: String,
    /// Key of the payload inside the store.
    pub key: String,
}

/// Payload slot of a task request or result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    /// Payload travels with the message.
    Inline(Payload),
    /// Payload lives in a store; see [`ProxyRef`].
    Proxy(ProxyRef),
    /// Payload was scrubbed after consumption.
    #[serde(rename = "<removed>")]
    Removed,
}

impl Value {
    pub fn as_proxy(&self) -> Option<&ProxyRef> {
        match self {
            Value::Proxy(r) => Some(r),
            _ => None,
        }
    }

    pub fn is_removed(&self) -> bool {
        matches!(self, Value::Removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_serializes_as_marker() {
        let json = serde_json::to_string(&Value::Removed).unwrap();
        assert_eq!(json, format!("\"{REDACTED}\""));
    }

    #[test]
    fn inline_serializes_size_only() {
        let json = serde_json::to_string(&Value::Inline(Payload::empty(40.0))).unwrap();
        assert_eq!(json, r#"{"inline":40}"#);
    }

    #[test]
    fn proxy_accessor() {
        let v = Value::Proxy(ProxyRef {
            store: "store".into(),
            key: "k".into(),
        });
        assert_eq!(v.as_proxy().map(|r| r.key.as_str()), Some("k"));
        assert!(Value::Removed.as_proxy().is_none());
    }
}
