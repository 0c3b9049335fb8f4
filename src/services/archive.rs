// Unpacks the zip archive returned by the inference endpoint
//
// Entry order and count are unspecified by the provider contract, so
// matching is done purely on filename suffix.

use serde::Deserialize;
use std::io::{Cursor, Read};
use zip::ZipArchive;

use crate::core::errors::{CompareError, CompareResult};
use crate::core::types::ComparisonResult;
use crate::utils::encoding::encode_jpeg_data_url;

/// Metadata entry (`*.response`) written next to the result image
#[derive(Debug, Deserialize)]
struct InferenceMetadata {
    #[serde(default)]
    inference_time: Option<f64>,
}

/// Scan the archive for the annotated image and optional metadata.
///
/// A `.jpg` entry becomes the result image (if several exist the last
/// one scanned wins). A `.response` entry is parsed as JSON for its
/// `inference_time` field and is optional. CPU-bound sync work: callers
/// on the async runtime should run this via `spawn_blocking`.
pub fn extract_result(archive_bytes: &[u8]) -> CompareResult<ComparisonResult> {
    let mut archive = ZipArchive::new(Cursor::new(archive_bytes))?;

    let mut result_image = None;
    let mut inference_time = None;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let name = entry.name().to_string();

        if name.ends_with(".jpg") {
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            result_image = Some(encode_jpeg_data_url(&data));
        } else if name.ends_with(".response") {
            let mut text = String::new();
            entry.read_to_string(&mut text)?;
            let metadata: InferenceMetadata =
                serde_json::from_str(&text).map_err(CompareError::Metadata)?;
            inference_time = metadata.inference_time;
        }
    }

    match result_image {
        Some(result_image) => Ok(ComparisonResult {
            result_image,
            inference_time,
        }),
        None => Err(CompareError::NoResultImage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extracts_image_and_inference_time() {
        let archive = build_archive(&[
            ("result.jpg", &[0x41]),
            ("result.response", br#"{"inference_time": 0.42}"#),
        ]);

        let result = extract_result(&archive).unwrap();
        assert_eq!(result.result_image, "data:image/jpeg;base64,QQ==");
        assert_eq!(result.inference_time, Some(0.42));
    }

    #[test]
    fn test_missing_metadata_yields_null_inference_time() {
        let archive = build_archive(&[("result.jpg", &[0x41])]);

        let result = extract_result(&archive).unwrap();
        assert_eq!(result.inference_time, None);
    }

    #[test]
    fn test_metadata_without_inference_time_field() {
        let archive = build_archive(&[
            ("result.jpg", &[0x41]),
            ("result.response", br#"{"status": "done"}"#),
        ]);

        let result = extract_result(&archive).unwrap();
        assert_eq!(result.inference_time, None);
    }

    #[test]
    fn test_missing_image_is_an_error() {
        let archive = build_archive(&[("result.response", br#"{"inference_time": 1.0}"#)]);

        let err = extract_result(&archive).unwrap_err();
        assert!(err
            .to_string()
            .contains("No result image found in response"));
    }

    #[test]
    fn test_last_image_entry_wins() {
        let archive = build_archive(&[("first.jpg", &[0x41]), ("second.jpg", &[0x42])]);

        let result = extract_result(&archive).unwrap();
        assert_eq!(result.result_image, "data:image/jpeg;base64,Qg==");
    }

    #[test]
    fn test_unrelated_entries_are_ignored() {
        let archive = build_archive(&[
            ("readme.txt", b"ignore me"),
            ("result.jpg", &[0x41]),
        ]);

        let result = extract_result(&archive).unwrap();
        assert_eq!(result.result_image, "data:image/jpeg;base64,QQ==");
    }

    #[test]
    fn test_truncated_archive_is_an_error() {
        let err = extract_result(&[0x50, 0x4b, 0x03, 0x04]).unwrap_err();
        assert!(matches!(err, CompareError::Archive(_)));
    }
}
