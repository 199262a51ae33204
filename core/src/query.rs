//! Query-string and path-segment encoding.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::error::ClientError;

/// Characters left alone in a path segment: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Serialize `params` into a form-encoded query string.
///
/// `params` must serialize to a JSON object (or `null` for no parameters).
/// Null members are dropped; order follows serialization order. Returns an
/// empty string when nothing remains.
pub fn encode_query<Q: Serialize + ?Sized>(params: &Q) -> Result<String, ClientError> {
    let value = serde_json::to_value(params).map_err(|e| ClientError::Serialization(e.to_string()))?;
    let map = match value {
        Value::Null => return Ok(String::new()),
        Value::Object(map) => map,
        other => {
            return Err(ClientError::Serialization(format!(
                "query parameters must be a map, got {other}"
            )))
        }
    };

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &map {
        if value.is_null() {
            continue;
        }
        serializer.append_pair(key, &stringify(value));
    }
    Ok(serializer.finish())
}

/// Text form of a query value: strings verbatim, whole floats without a
/// fraction (`1.0` → `1`), arrays comma-joined with null elements empty,
/// objects as compact JSON.
fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => f.to_string(),
            _ => n.to_string(),
        },
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

/// Append `?query` to `path` unless the query is empty.
pub fn with_query<Q: Serialize + ?Sized>(path: &str, params: &Q) -> Result<String, ClientError> {
    let query = encode_query(params)?;
    if query.is_empty() {
        Ok(path.to_string())
    } else {
        Ok(format!("{path}?{query}"))
    }
}

/// Percent-encode one path segment (volume names may contain `/` or spaces).
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Page {
        search: Option<String>,
        start: Option<u32>,
        limit: Option<u32>,
    }

    #[test]
    fn drops_null_members() {
        let query = encode_query(&json!({"a": "1", "b": null})).unwrap();
        assert_eq!(query, "a=1");
    }

    #[test]
    fn all_null_is_empty() {
        assert_eq!(with_query("/x", &json!({"a": null})).unwrap(), "/x");
        assert_eq!(with_query("/x", &Option::<Page>::None).unwrap(), "/x");
    }

    #[test]
    fn keeps_serialization_order_and_stringifies() {
        let page = Page {
            search: Some("web app".to_string()),
            start: Some(0),
            limit: Some(20),
        };
        assert_eq!(
            with_query("/api/environments", &page).unwrap(),
            "/api/environments?search=web+app&start=0&limit=20"
        );
        assert_eq!(
            encode_query(&json!({"z": true, "a": 1.5})).unwrap(),
            "z=true&a=1.5"
        );
    }

    #[test]
    fn whole_floats_and_arrays_stringify_plainly() {
        assert_eq!(
            encode_query(&json!({"limit": 1.0, "ratio": 0.5, "tags": ["a", "b"]})).unwrap(),
            "limit=1&ratio=0.5&tags=a%2Cb"
        );
        assert_eq!(encode_query(&json!({"ids": [1, null, 2.0]})).unwrap(), "ids=1%2C%2C2");
        assert_eq!(encode_query(&json!({"filter": {"a": 1}})).unwrap(), "filter=%7B%22a%22%3A1%7D");
    }

    #[test]
    fn percent_encodes_reserved_characters() {
        assert_eq!(encode_query(&json!({"path": "/etc/a&b"})).unwrap(), "path=%2Fetc%2Fa%26b");
    }

    #[test]
    fn rejects_non_map_params() {
        let err = encode_query(&json!(["a"])).unwrap_err();
        assert!(matches!(err, ClientError::Serialization(_)));
    }

    #[test]
    fn path_segments_are_component_encoded() {
        assert_eq!(encode_segment("my volume/data"), "my%20volume%2Fdata");
        assert_eq!(encode_segment("db_data-1.bak"), "db_data-1.bak");
    }
}
