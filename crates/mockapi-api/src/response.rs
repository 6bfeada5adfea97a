//! Response rendering with optional JSONP wrapping.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{ApiError, Result};

/// Content type used for JSONP responses.
pub const SCRIPT_CONTENT_TYPE: &str = "text/javascript";

/// Status and optional JSON body of a response, before rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl Payload {
    /// Creates a payload with a JSON body.
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    /// 200 with a JSON body.
    pub fn ok(body: Value) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// Serializes `body` into a payload.
    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Internal(format!("failed to encode response: {}", e)))?;
        Ok(Self::new(status, value))
    }

    /// 204 without a body.
    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: None,
        }
    }

    /// Renders the payload. With a callback the body is sent as
    /// `callback(<json>);` using a script content type.
    pub fn render(self, callback: Option<&str>) -> Response {
        match (self.body, callback) {
            (None, _) => self.status.into_response(),
            (Some(body), None) => (self.status, Json(body)).into_response(),
            (Some(body), Some(callback)) => (
                self.status,
                [(header::CONTENT_TYPE, SCRIPT_CONTENT_TYPE)],
                format!("{}({});", callback, body),
            )
                .into_response(),
        }
    }
}

impl From<ApiError> for Payload {
    fn from(err: ApiError) -> Self {
        Self::new(err.status_code(), json!({ "message": err.to_string() }))
    }
}
