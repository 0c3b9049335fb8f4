pub mod encoding;

// Re-export commonly used items
pub use encoding::{decode_image_payload, encode_jpeg_data_url};
