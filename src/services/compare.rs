// The comparison pipeline: decode -> upload -> infer -> unpack
//
// Stateless; nothing survives a single request. Asset ids are only
// valid for the inference call they were uploaded for.

use std::time::Instant;
use tracing::{debug, info};

use crate::core::errors::{CompareError, CompareResult};
use crate::core::types::ComparisonResult;
use crate::services::archive::extract_result;
use crate::services::nvcf::NvcfClient;
use crate::utils::encoding::decode_image_payload;

/// Asset descriptions as recorded in the NVCF asset store
const REFERENCE_DESCRIPTION: &str = "Reference Image";
const TEST_DESCRIPTION: &str = "Test Image";

/// Orchestrates one comparison request end to end
pub struct CompareService {
    client: NvcfClient,
}

impl CompareService {
    pub fn new(client: NvcfClient) -> Self {
        Self { client }
    }

    /// Run the full pipeline for one pair of base64 payloads.
    ///
    /// The two uploads have no data dependency on each other and are
    /// issued concurrently, joined before inference. First failure at
    /// any stage aborts the request; there are no retries.
    pub async fn compare(&self, reference: &str, test: &str) -> CompareResult<ComparisonResult> {
        let reference_bytes = decode_image_payload(reference)?;
        let test_bytes = decode_image_payload(test)?;
        debug!(
            reference_bytes = reference_bytes.len(),
            test_bytes = test_bytes.len(),
            "Decoded image payloads"
        );

        info!("Uploading reference and test images...");
        let (reference_id, test_id) = tokio::try_join!(
            self.client.upload_asset(reference_bytes, REFERENCE_DESCRIPTION),
            self.client.upload_asset(test_bytes, TEST_DESCRIPTION),
        )?;

        info!("Requesting change detection...");
        let start = Instant::now();
        let archive = self.client.infer(&reference_id, &test_id).await?;
        info!(
            "Inference returned {} bytes in {:.2}s",
            archive.len(),
            start.elapsed().as_secs_f64()
        );

        // Unpacking is sync CPU work, keep it off the async runtime
        tokio::task::spawn_blocking(move || extract_result(&archive))
            .await
            .map_err(|e| CompareError::TaskJoinFailed(e.to_string()))?
    }
}
