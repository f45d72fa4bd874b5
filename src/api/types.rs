// API type definitions module
// Request/response shapes for the JSON surface

use serde::{Deserialize, Serialize};

/// Upload request body. Fields default to empty so a missing field gets the
/// descriptive 400 instead of a generic deserialization error; `subject` stays
/// a string here and is validated against the closed enum in the handler.
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub chapter: String,
    #[serde(default, rename = "htmlContent")]
    pub html_content: String,
}

/// Successful upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    /// Shareable link of the form `<base>/sim/<id>`
    pub url: String,
}

/// Error payload for the JSON surface
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Liveness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}
