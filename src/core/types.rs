// Request/response types for the comparison endpoint

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::config::Config;
use crate::services::compare::CompareService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub compare: Arc<CompareService>,
}

/// Incoming comparison request.
///
/// Both fields are base64-encoded JPEG payloads, optionally carrying a
/// `data:image/jpeg;base64,` prefix. Fields are optional at the serde
/// level so a missing field surfaces as a validation error with a
/// stable message instead of a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub test: Option<String>,
}

/// Successful comparison response
#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub success: bool,
    pub result_image: String,
    pub inference_time: Option<f64>,
}

/// Uniform error envelope for every non-success response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Outcome of unpacking the inference archive
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    /// Annotated change map as a `data:image/jpeg;base64,` URL
    pub result_image: String,
    /// Model-reported inference time in seconds, when the archive
    /// included metadata
    pub inference_time: Option<f64>,
}
