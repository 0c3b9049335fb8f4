// Base64 / data-URL handling for image payloads

use base64::{engine::general_purpose, Engine};

/// Data-URL prefix attached to the result image
const JPEG_DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Decode a base64 image payload, stripping an optional data-URL prefix.
///
/// If the string contains a comma (`data:image/jpeg;base64,<payload>`
/// form) everything up to and including the first comma is discarded;
/// otherwise the whole string is treated as the payload. Either way the
/// decoded bytes are identical.
pub fn decode_image_payload(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let encoded = match payload.split_once(',') {
        Some((_, rest)) => rest,
        None => payload,
    };
    general_purpose::STANDARD.decode(encoded)
}

/// Encode raw JPEG bytes as a data-URL string.
pub fn encode_jpeg_data_url(bytes: &[u8]) -> String {
    format!(
        "{}{}",
        JPEG_DATA_URL_PREFIX,
        general_purpose::STANDARD.encode(bytes)
    )
}
