// Custom error types for the comparison pipeline
//
// Using thiserror for ergonomic error definitions with:
// - Context preservation
// - Type-safe error matching
// - Automatic Display/Error trait implementations

use thiserror::Error;

/// Configuration errors (fatal at startup)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("NVCF_API_KEY is not set (refusing to start without a credential)")]
    MissingApiKey,

    #[error("Invalid endpoint URL for {name}: {value}")]
    InvalidEndpoint { name: &'static str, value: String },

    #[error("Timeout must be > 0 seconds, got {0}")]
    InvalidTimeout(u64),

    #[error("Environment variable parsing failed: {0}")]
    EnvVarError(String),
}

/// Errors raised by the comparison pipeline.
///
/// Client-input errors map to 400 responses, everything else to 500.
/// Provider error bodies are carried verbatim so the caller sees what
/// the upstream API reported.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("Both reference and test images are required")]
    MissingImages,

    #[error("Invalid request body: {0}")]
    MalformedBody(serde_json::Error),

    #[error("Invalid base64 image data: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("API request failed: {0}")]
    Inference(String),

    #[error("Request to provider timed out: {0}")]
    Timeout(reqwest::Error),

    #[error("HTTP transport failed: {0}")]
    Transport(reqwest::Error),

    #[error("Result archive is unreadable: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Failed to read archive entry: {0}")]
    ArchiveEntry(#[from] std::io::Error),

    #[error("Invalid inference metadata: {0}")]
    Metadata(serde_json::Error),

    #[error("No result image found in response")]
    NoResultImage,

    #[error("Task join failed: {0}")]
    TaskJoinFailed(String),
}

impl CompareError {
    /// Classify a reqwest error, keeping timeouts distinct from other
    /// transport failures.
    pub fn transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            CompareError::Timeout(error)
        } else {
            CompareError::Transport(error)
        }
    }

    /// True when the error was caused by the client's input rather than
    /// the provider or this service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CompareError::MissingImages
                | CompareError::MalformedBody(_)
                | CompareError::InvalidBase64(_)
        )
    }
}

// Convenience type aliases for Results
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type CompareResult<T> = Result<T, CompareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(CompareError::MissingImages.is_client_error());
        assert!(!CompareError::NoResultImage.is_client_error());
        assert!(!CompareError::Authorization("denied".to_string()).is_client_error());
    }

    #[test]
    fn test_provider_text_passes_through() {
        let err = CompareError::Authorization("quota exceeded".to_string());
        assert_eq!(err.to_string(), "Authorization failed: quota exceeded");

        let err = CompareError::Inference("502 Bad Gateway".to_string());
        assert_eq!(err.to_string(), "API request failed: 502 Bad Gateway");
    }

    #[test]
    fn test_missing_image_message() {
        assert_eq!(
            CompareError::NoResultImage.to_string(),
            "No result image found in response"
        );
    }
}
