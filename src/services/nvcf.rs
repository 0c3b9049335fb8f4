// NVCF API client for asset upload and visual-changenet inference
//
// Two-step upload per the NVCF contract: authorize a slot against the
// asset store, then PUT the raw bytes to the returned pre-signed URL.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::NvcfConfig;
use crate::core::errors::{CompareError, CompareResult};

/// Content type declared for both uploads and asset metadata
const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// S3 metadata header carrying the asset description on the binary PUT
const ASSET_DESCRIPTION_HEADER: &str = "x-amz-meta-nvcf-asset-description";

/// NVCF client with a pooled HTTP connection and explicit timeouts
pub struct NvcfClient {
    http_client: reqwest::Client,
    api_key: String,
    asset_endpoint: String,
    inference_endpoint: String,
}

#[derive(Debug, Serialize)]
struct AssetAuthorizationRequest<'a> {
    #[serde(rename = "contentType")]
    content_type: &'a str,
    description: &'a str,
}

#[derive(Debug, Deserialize)]
struct AssetAuthorization {
    #[serde(rename = "uploadUrl")]
    upload_url: String,
    #[serde(rename = "assetId")]
    asset_id: String,
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    reference_image: &'a str,
    test_image: &'a str,
}

impl NvcfClient {
    /// Create a new client from provider configuration.
    pub fn new(config: &NvcfConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(5)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            asset_endpoint: config.asset_endpoint.clone(),
            inference_endpoint: config.inference_endpoint.clone(),
        })
    }

    /// Upload one image to the NVCF asset store.
    ///
    /// Returns the opaque asset id, valid only for the lifetime of the
    /// inference call that follows.
    pub async fn upload_asset(&self, bytes: Vec<u8>, description: &str) -> CompareResult<String> {
        // Authorize upload
        let response = self
            .http_client
            .post(&self.asset_endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("accept", "application/json")
            .json(&AssetAuthorizationRequest {
                content_type: IMAGE_CONTENT_TYPE,
                description,
            })
            .send()
            .await
            .map_err(CompareError::transport)?;

        if !response.status().is_success() {
            let body = response.text().await.map_err(CompareError::transport)?;
            return Err(CompareError::Authorization(body));
        }

        let authorization: AssetAuthorization =
            response.json().await.map_err(CompareError::transport)?;

        debug!(
            asset_id = %authorization.asset_id,
            bytes = bytes.len(),
            "Authorized upload slot for {description}"
        );

        // Upload the image. The pre-signed URL carries its own
        // credentials, no bearer header here.
        let upload = self
            .http_client
            .put(&authorization.upload_url)
            .header(ASSET_DESCRIPTION_HEADER, description)
            .header("content-type", IMAGE_CONTENT_TYPE)
            .body(bytes)
            .send()
            .await
            .map_err(CompareError::transport)?;

        if !upload.status().is_success() {
            let body = upload.text().await.map_err(CompareError::transport)?;
            return Err(CompareError::Upload(body));
        }

        Ok(authorization.asset_id)
    }

    /// Run visual-changenet inference over two uploaded assets.
    ///
    /// On success the body is a zip archive containing the annotated
    /// result image and optional metadata, not JSON.
    pub async fn infer(&self, reference_id: &str, test_id: &str) -> CompareResult<Vec<u8>> {
        // The provider expects both assets declared twice: as input
        // references and as function asset ids.
        let asset_list = format!("{}, {}", reference_id, test_id);

        let response = self
            .http_client
            .post(&self.inference_endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("NVCF-INPUT-ASSET-REFERENCES", &asset_list)
            .header("NVCF-FUNCTION-ASSET-IDS", &asset_list)
            .json(&InferenceRequest {
                reference_image: reference_id,
                test_image: test_id,
            })
            .send()
            .await
            .map_err(CompareError::transport)?;

        if !response.status().is_success() {
            let body = response.text().await.map_err(CompareError::transport)?;
            return Err(CompareError::Inference(body));
        }

        let archive = response.bytes().await.map_err(CompareError::transport)?;
        debug!(bytes = archive.len(), "Received inference archive");
        Ok(archive.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_response_field_mapping() {
        let parsed: AssetAuthorization = serde_json::from_str(
            r#"{"uploadUrl": "https://storage.example/slot", "assetId": "abc-123", "extra": 1}"#,
        )
        .unwrap();
        assert_eq!(parsed.upload_url, "https://storage.example/slot");
        assert_eq!(parsed.asset_id, "abc-123");
    }

    #[test]
    fn test_inference_request_wire_format() {
        let body = serde_json::to_value(InferenceRequest {
            reference_image: "ref-id",
            test_image: "test-id",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"reference_image": "ref-id", "test_image": "test-id"})
        );
    }

    #[test]
    fn test_authorization_request_uses_camel_case() {
        let body = serde_json::to_value(AssetAuthorizationRequest {
            content_type: IMAGE_CONTENT_TYPE,
            description: "Reference Image",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"contentType": "image/jpeg", "description": "Reference Image"})
        );
    }
}
