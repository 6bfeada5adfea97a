//! Request query parameters and body parsing.

use axum::http::{header, HeaderMap};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};

/// Default `range` when the query omits it.
pub const DEFAULT_RANGE: u32 = 50;
/// Default `offset` when the query omits it.
pub const DEFAULT_OFFSET: u32 = 1;

/// Query string parameters understood by every endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestQuery {
    /// Request path passed in the query (`?url=collection/id`), used instead
    /// of the URI path when present.
    pub url: Option<String>,
    /// Page size. Accepted, not applied.
    pub range: Option<String>,
    /// Page offset. Accepted, not applied.
    pub offset: Option<String>,
    /// JSONP callback name.
    pub callback: Option<String>,
}

impl RequestQuery {
    /// Splits the request path into segments.
    ///
    /// A non-empty `url` parameter takes precedence over `path`. Leading and
    /// trailing slashes are ignored.
    pub fn segments(&self, path: &str) -> Vec<String> {
        let raw = match self.url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => path,
        };
        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty() {
            return Vec::new();
        }
        trimmed.split('/').map(str::to_string).collect()
    }

    /// Returns the JSONP callback, if any.
    ///
    /// Only identifier characters and `.`, `$`, `[`, `]` are accepted.
    pub fn callback(&self) -> Result<Option<&str>> {
        match self.callback.as_deref() {
            None | Some("") => Ok(None),
            Some(cb) if cb.chars().all(is_callback_char) => Ok(Some(cb)),
            Some(_) => Err(ApiError::BadRequest("Invalid callback".to_string())),
        }
    }

    /// Returns the requested page size.
    pub fn range(&self) -> u32 {
        parse_or(self.range.as_deref(), DEFAULT_RANGE)
    }

    /// Returns the requested page offset.
    pub fn offset(&self) -> u32 {
        parse_or(self.offset.as_deref(), DEFAULT_OFFSET)
    }
}

fn parse_or(value: Option<&str>, default: u32) -> u32 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// Parses the request body into field values.
///
/// JSON bodies (by content type) must be objects. Anything else is read as
/// `application/x-www-form-urlencoded`, with every value kept as a string
/// and the last occurrence of a repeated key winning. An empty body yields
/// no fields.
pub fn parse_fields(headers: &HeaderMap, body: &[u8]) -> Result<Map<String, Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with("application/json"));

    if is_json {
        return match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => Ok(fields),
            Ok(_) => Err(ApiError::BadRequest(
                "Request body must be a JSON object".to_string(),
            )),
            Err(e) => Err(ApiError::BadRequest(format!("Invalid JSON body: {}", e))),
        };
    }

    Ok(url::form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect())
}

fn is_callback_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | '[' | ']')
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn query(url: Option<&str>) -> RequestQuery {
        RequestQuery {
            url: url.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_segments_from_path() {
        let q = query(None);
        assert_eq!(q.segments("/customers/c1/orders/"), vec!["customers", "c1", "orders"]);
        assert!(q.segments("/").is_empty());
        assert!(q.segments("").is_empty());
    }

    #[test]
    fn test_segments_from_url_param() {
        let q = query(Some("customers/c1/"));
        assert_eq!(q.segments("/ignored"), vec!["customers", "c1"]);

        let empty = query(Some(""));
        assert_eq!(empty.segments("/orders"), vec!["orders"]);
    }

    #[test]
    fn test_range_and_offset_defaults() {
        let q = RequestQuery::default();
        assert_eq!(q.range(), 50);
        assert_eq!(q.offset(), 1);

        let q = RequestQuery {
            range: Some("10".into()),
            offset: Some("abc".into()),
            ..Default::default()
        };
        assert_eq!(q.range(), 10);
        assert_eq!(q.offset(), 1);
    }

    #[test]
    fn test_callback_validation() {
        let mut q = RequestQuery::default();
        assert_eq!(q.callback().unwrap(), None);

        q.callback = Some("jQuery123_cb".into());
        assert_eq!(q.callback().unwrap(), Some("jQuery123_cb"));

        q.callback = Some("alert(1)//".into());
        assert!(q.callback().is_err());
    }

    #[test]
    fn test_parse_form_fields() {
        let fields = parse_fields(
            &HeaderMap::new(),
            b"firstname=John&email=jdoe%40email.com&customers.id=c1",
        )
        .unwrap();

        assert_eq!(fields["firstname"], json!("John"));
        assert_eq!(fields["email"], json!("jdoe@email.com"));
        assert_eq!(fields["customers.id"], json!("c1"));
    }

    #[test]
    fn test_parse_json_fields() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let fields = parse_fields(&headers, br#"{"ordertotal": 325}"#).unwrap();
        assert_eq!(fields["ordertotal"], json!(325));

        assert!(parse_fields(&headers, b"[1,2]").is_err());
        assert!(parse_fields(&headers, b"{oops").is_err());
    }

    #[test]
    fn test_parse_empty_body() {
        assert!(parse_fields(&HeaderMap::new(), b"").unwrap().is_empty());
    }
}
