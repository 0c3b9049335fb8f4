use crate::core::errors::ConfigError;
use std::env;
use std::time::Duration;
use tracing::Level;

/// Default NVCF asset authorization endpoint
const DEFAULT_ASSET_ENDPOINT: &str = "https://api.nvcf.nvidia.com/v2/nvcf/assets";

/// Default visual-changenet inference endpoint
const DEFAULT_INFERENCE_ENDPOINT: &str = "https://ai.api.nvidia.com/v1/cv/nvidia/visual-changenet";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub log_level: Level,
}

/// NVCF provider configuration
#[derive(Debug, Clone)]
pub struct NvcfConfig {
    /// Bearer credential for the NVCF API. Required: there is no
    /// embedded fallback, a missing key is a fatal startup error.
    pub api_key: String,
    pub asset_endpoint: String,
    pub inference_endpoint: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub nvcf: NvcfConfig,
}

impl Config {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let config = Self::load_from_env()?;
        config.validate()?;
        Ok(config)
    }

    fn load_from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("NVCF_API_KEY").unwrap_or_default();

        // Parse log level
        let log_level = env::var("LOG_LEVEL")
            .ok()
            .and_then(|s| match s.to_lowercase().as_str() {
                "trace" => Some(Level::TRACE),
                "debug" => Some(Level::DEBUG),
                "info" => Some(Level::INFO),
                "warn" | "warning" => Some(Level::WARN),
                "error" => Some(Level::ERROR),
                _ => None,
            })
            .unwrap_or(Level::INFO);

        Ok(Self {
            server: ServerConfig {
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(8080),
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                log_level,
            },
            nvcf: NvcfConfig {
                api_key,
                asset_endpoint: env::var("NVCF_ASSET_URL")
                    .unwrap_or_else(|_| DEFAULT_ASSET_ENDPOINT.to_string()),
                inference_endpoint: env::var("NVCF_INFERENCE_URL")
                    .unwrap_or_else(|_| DEFAULT_INFERENCE_ENDPOINT.to_string()),
                request_timeout: Duration::from_secs(
                    env::var("NVCF_TIMEOUT_SECONDS")
                        .ok()
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(60),
                ),
                connect_timeout: Duration::from_secs(
                    env::var("NVCF_CONNECT_TIMEOUT_SECONDS")
                        .ok()
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(10),
                ),
            },
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.nvcf.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        if !self.nvcf.asset_endpoint.starts_with("http") {
            return Err(ConfigError::InvalidEndpoint {
                name: "NVCF_ASSET_URL",
                value: self.nvcf.asset_endpoint.clone(),
            });
        }

        if !self.nvcf.inference_endpoint.starts_with("http") {
            return Err(ConfigError::InvalidEndpoint {
                name: "NVCF_INFERENCE_URL",
                value: self.nvcf.inference_endpoint.clone(),
            });
        }

        if self.nvcf.request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(0));
        }

        Ok(())
    }

    pub fn server_port(&self) -> u16 {
        self.server.port
    }

    pub fn server_host(&self) -> &str {
        &self.server.host
    }

    pub fn log_level(&self) -> Level {
        self.server.log_level
    }
}

// Note: No Default implementation because Config::new() can fail
// Users should explicitly call Config::new()? and handle errors

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            server: ServerConfig {
                port: 8080,
                host: "127.0.0.1".to_string(),
                log_level: Level::INFO,
            },
            nvcf: NvcfConfig {
                api_key: "nvapi-test".to_string(),
                asset_endpoint: DEFAULT_ASSET_ENDPOINT.to_string(),
                inference_endpoint: DEFAULT_INFERENCE_ENDPOINT.to_string(),
                request_timeout: Duration::from_secs(60),
                connect_timeout: Duration::from_secs(10),
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let mut config = valid_config();
        config.nvcf.api_key = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingApiKey)
        ));

        // Whitespace is not a credential either
        config.nvcf.api_key = "   ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = valid_config();
        config.nvcf.request_timeout = Duration::from_secs(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTimeout(0))
        ));
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        let mut config = valid_config();
        config.nvcf.asset_endpoint = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }
}
