use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

/// Top-level auth trace object as captured by the recorder
#[derive(Debug, Clone, Deserialize)]
pub struct AuthTrace {
    #[serde(rename = "tabId", default = "default_tab_id")]
    pub tab_id: i64,
    #[serde(rename = "startedAtMs", default)]
    pub started_at_ms: i64,
    pub events: Vec<TraceEvent>,
    /// Set by the recorder when its event buffer overflowed
    #[serde(default)]
    pub truncated: bool,
    #[serde(rename = "droppedEvents", default)]
    pub dropped_events: u64,
}

fn default_tab_id() -> i64 {
    -1
}

/// One observed HTTP exchange
///
/// Events decode leniently: a field with an unexpected type is treated as
/// absent rather than failing the whole trace. Recorder fields the analyzer
/// does not interpret (`type`, `tMs`, `method`, `requestId`, `status`,
/// `initiator`, `requestHeaders`) are dropped on decode.
#[derive(Debug, Clone, Default)]
pub struct TraceEvent {
    pub url: Option<String>,
    pub response_headers: Option<ResponseHeaders>,
    pub request_body_keys: Option<Vec<String>>,
}

impl TraceEvent {
    /// The event URL, if present and non-empty
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }

    fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let url = obj.get("url").and_then(Value::as_str).map(str::to_owned);

        let response_headers = obj
            .get("responseHeaders")
            .and_then(ResponseHeaders::from_value);

        // Present only when the recorder saw a form body; non-string keys
        // are skipped, a non-array value counts as absent.
        let request_body_keys = obj
            .get("requestBodyKeys")
            .and_then(Value::as_array)
            .map(|keys| {
                keys.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            });

        Self {
            url,
            response_headers,
            request_body_keys,
        }
    }
}

impl<'de> Deserialize<'de> for TraceEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(TraceEvent::from_value(&value))
    }
}

/// Response headers in either wire shape: an ordered name/value list
/// (duplicate names all preserved) or a flat name-to-value map
#[derive(Debug, Clone)]
pub enum ResponseHeaders {
    List(Vec<Header>),
    Map(HashMap<String, String>),
}

/// HTTP header
#[derive(Debug, Clone)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl ResponseHeaders {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(ResponseHeaders::List(
                items.iter().filter_map(Header::from_value).collect(),
            )),
            Value::Object(map) => Some(ResponseHeaders::Map(
                map.iter()
                    .filter_map(|(name, v)| v.as_str().map(|s| (name.clone(), s.to_owned())))
                    .collect(),
            )),
            _ => None,
        }
    }

    /// Collect every value whose header name matches case-insensitively.
    /// Repeated headers (Set-Cookie in particular) all appear in the result.
    pub fn values(&self, name: &str) -> Vec<&str> {
        match self {
            ResponseHeaders::List(headers) => headers
                .iter()
                .filter(|h| h.name.eq_ignore_ascii_case(name))
                .map(|h| h.value.as_str())
                .collect(),
            ResponseHeaders::Map(map) => map
                .iter()
                .filter(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
                .collect(),
        }
    }
}

impl Header {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let name = obj.get("name")?.as_str()?;
        let val = obj.get("value")?.as_str()?;
        Some(Header {
            name: name.to_owned(),
            value: val.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_decodes_leniently() {
        let trace: AuthTrace = serde_json::from_str(
            r#"{
                "events": [
                    {"url": 42, "responseHeaders": "nope", "requestBodyKeys": "nope"},
                    {"url": "https://a.test/cb"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(trace.events.len(), 2);
        assert!(trace.events[0].url().is_none());
        assert!(trace.events[0].response_headers.is_none());
        assert!(trace.events[0].request_body_keys.is_none());
        assert_eq!(trace.events[1].url(), Some("https://a.test/cb"));
    }

    #[test]
    fn test_missing_events_is_fatal() {
        let result = serde_json::from_str::<AuthTrace>(r#"{"tabId": 1}"#);
        assert!(result.is_err());

        let result = serde_json::from_str::<AuthTrace>(r#"{"events": "nope"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_trace_metadata_defaults() {
        let trace: AuthTrace = serde_json::from_str(r#"{"events": []}"#).unwrap();
        assert_eq!(trace.tab_id, -1);
        assert_eq!(trace.started_at_ms, 0);
        assert!(!trace.truncated);
        assert_eq!(trace.dropped_events, 0);
    }

    #[test]
    fn test_header_list_preserves_duplicates() {
        let trace: AuthTrace = serde_json::from_str(
            r#"{
                "events": [{
                    "url": "https://a.test/",
                    "responseHeaders": [
                        {"name": "Set-Cookie", "value": "a=1"},
                        {"name": "content-type", "value": "text/html"},
                        {"name": "set-cookie", "value": "b=2"}
                    ]
                }]
            }"#,
        )
        .unwrap();

        let headers = trace.events[0].response_headers.as_ref().unwrap();
        assert_eq!(headers.values("set-cookie"), vec!["a=1", "b=2"]);
    }

    #[test]
    fn test_header_map_shape() {
        let trace: AuthTrace = serde_json::from_str(
            r#"{
                "events": [{
                    "url": "https://a.test/",
                    "responseHeaders": {"Set-Cookie": "sid=1; Path=/", "X-Num": 7}
                }]
            }"#,
        )
        .unwrap();

        let headers = trace.events[0].response_headers.as_ref().unwrap();
        assert_eq!(headers.values("Set-Cookie"), vec!["sid=1; Path=/"]);
        assert!(headers.values("x-num").is_empty());
    }

    #[test]
    fn test_body_keys_skip_non_strings() {
        let trace: AuthTrace = serde_json::from_str(
            r#"{"events": [{"url": "https://a.test/token", "requestBodyKeys": ["code", 3, "code_verifier"]}]}"#,
        )
        .unwrap();

        assert_eq!(
            trace.events[0].request_body_keys.as_deref(),
            Some(&["code".to_string(), "code_verifier".to_string()][..])
        );
    }
}
