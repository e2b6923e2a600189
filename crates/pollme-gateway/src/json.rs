//! JSON request and response types for the HTTP gateway.

use serde::{Deserialize, Serialize};

/// Generic success response wrapper.
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T: Serialize> {
    /// Success flag.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    /// Create a new success response.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Response for mutations that return nothing but a message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status.
    pub status: String,
    /// Gateway version.
    pub version: String,
    /// Number of installed apps.
    pub apps: usize,
}

/// Page selection for listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Root selection for the sample tree.
#[derive(Debug, Default, Deserialize)]
pub struct TreeQuery {
    pub root: Option<u64>,
}

/// Vote request body.
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    /// Selected choice id. Missing means nothing was selected.
    #[serde(default)]
    pub choice: Option<u64>,
}
