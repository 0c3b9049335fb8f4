// Library exports for the visual change-detection proxy

pub mod core;
pub mod server;
pub mod services;
pub mod utils;

// Re-export commonly used types and functions
pub use core::{
    config::Config,
    errors::{CompareError, ConfigError},
    types::{AppState, CompareRequest, CompareResponse, ComparisonResult, ErrorResponse},
};

pub use server::build_router;
pub use services::{CompareService, NvcfClient};
pub use utils::{decode_image_payload, encode_jpeg_data_url};
