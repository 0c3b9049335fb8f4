pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items for convenience
pub use config::Config;
pub use errors::{CompareError, ConfigError};
pub use types::{AppState, CompareRequest, CompareResponse, ComparisonResult, ErrorResponse};
