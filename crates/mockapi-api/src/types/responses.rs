//! Response bodies for the API.

use serde::Serialize;

/// Body of a successful create.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedResponse {
    /// ID of the new resource.
    pub id: String,
}

/// Generic message body.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
