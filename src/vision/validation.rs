// Upload validation
// Author: kelexine (https://github.com/kelexine)

use super::models::{ImageFormat, UploadPolicy, UploadedImage};
use crate::error::{RelayError, Result};
use image::{ImageReader, Limits};
use std::io::Cursor;
use tracing::debug;

/// Message for a request that carried no `file` field.
pub const MISSING_FILE_MESSAGE: &str = "Chybí soubor v poli 'file'.";

/// Message for an upload whose bytes are not a readable image.
pub const DECODE_MESSAGE: &str =
    "Soubor se nepodařilo načíst jako obrázek. Může být poškozený nebo má nesprávný formát.";

/// Check an upload against a policy. The first failing check wins:
/// size, then declared type, then (optionally) decodability.
pub fn validate_upload(upload: &UploadedImage, policy: &UploadPolicy) -> Result<()> {
    if upload.size() > policy.max_bytes {
        return Err(RelayError::Validation(too_large_message(policy)));
    }

    if upload.size() == 0 {
        return Err(RelayError::Validation("Nahraný soubor je prázdný.".to_string()));
    }

    if !policy.allows(&upload.mime_type) {
        return Err(RelayError::Validation(unsupported_type_message(policy)));
    }

    if policy.verify_decodes {
        verify_decodes(upload)?;
    }

    Ok(())
}

/// "Soubor je příliš velký. Maximální velikost je 20MB."
pub fn too_large_message(policy: &UploadPolicy) -> String {
    format!(
        "Soubor je příliš velký. Maximální velikost je {}MB.",
        policy.max_megabytes()
    )
}

/// "Podporované formáty jsou pouze JPEG a PNG."
pub fn unsupported_type_message(policy: &UploadPolicy) -> String {
    let mut labels: Vec<&str> = Vec::new();
    for mime in &policy.allowed_mime_types {
        let label = ImageFormat::from_mime_type(mime)
            .map(|f| f.label())
            .unwrap_or(mime.as_str());
        if !labels.contains(&label) {
            labels.push(label);
        }
    }

    let joined = match labels.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} a {}", rest.join(", "), last),
        Some((last, _)) => last.to_string(),
        None => String::new(),
    };

    format!("Podporované formáty jsou pouze {}.", joined)
}

/// Largest width or height accepted for a decoded upload.
pub const MAX_DECODE_DIMENSION: u32 = 8192;

/// Ceiling on decoder allocations for a single upload.
pub const MAX_DECODE_ALLOC: u64 = 128 * 1024 * 1024;

/// Fully decode the payload; a MIME label alone does not prove the bytes are an image.
///
/// Decoding is bounded by [`MAX_DECODE_DIMENSION`] and [`MAX_DECODE_ALLOC`] so a
/// small, highly compressible file cannot expand into a huge buffer. This is
/// CPU-bound; async callers should run it on the blocking pool.
fn verify_decodes(upload: &UploadedImage) -> Result<()> {
    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_DECODE_DIMENSION);
    limits.max_image_height = Some(MAX_DECODE_DIMENSION);
    limits.max_alloc = Some(MAX_DECODE_ALLOC);

    let decoded = ImageReader::new(Cursor::new(&upload.bytes[..]))
        .with_guessed_format()
        .map_err(|e| {
            debug!("Upload format sniffing failed: {}", e);
            RelayError::Decode(DECODE_MESSAGE.to_string())
        })
        .and_then(|mut reader| {
            reader.limits(limits);
            reader.decode().map_err(|e| {
                debug!("Upload failed to decode: {}", e);
                RelayError::Decode(DECODE_MESSAGE.to_string())
            })
        })?;

    debug!(
        "Upload decoded as {}x{} image ({} bytes)",
        decoded.width(),
        decoded.height(),
        upload.size()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis_policy() -> UploadPolicy {
        UploadPolicy::new(
            20 * 1024 * 1024,
            &["image/jpeg".to_string(), "image/png".to_string()],
            false,
        )
    }

    fn generation_policy() -> UploadPolicy {
        UploadPolicy::new(
            10 * 1024 * 1024,
            &[
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
            true,
        )
    }

    fn tiny_png() -> Vec<u8> {
        let mut buf = std::io::Cursor::new(Vec::new());
        image::RgbImage::new(2, 2)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            too_large_message(&analysis_policy()),
            "Soubor je příliš velký. Maximální velikost je 20MB."
        );
        assert_eq!(
            unsupported_type_message(&analysis_policy()),
            "Podporované formáty jsou pouze JPEG a PNG."
        );
        assert_eq!(
            unsupported_type_message(&generation_policy()),
            "Podporované formáty jsou pouze JPEG, PNG a WEBP."
        );
    }

    #[test]
    fn test_size_checked_before_type() {
        let upload = UploadedImage::new(vec![0u8; 20 * 1024 * 1024 + 1], "text/plain");
        match validate_upload(&upload, &analysis_policy()) {
            Err(RelayError::Validation(msg)) => assert!(msg.starts_with("Soubor je příliš velký")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_exact_limit_is_accepted() {
        let upload = UploadedImage::new(vec![0u8; 20 * 1024 * 1024], "image/jpeg");
        assert!(validate_upload(&upload, &analysis_policy()).is_ok());
    }

    #[test]
    fn test_empty_upload_rejected() {
        let upload = UploadedImage::new(Vec::<u8>::new(), "image/png");
        assert!(matches!(
            validate_upload(&upload, &analysis_policy()),
            Err(RelayError::Validation(_))
        ));
    }

    #[test]
    fn test_analysis_does_not_decode() {
        // Analysis only trusts the declared type
        let upload = UploadedImage::new(b"not really a png".to_vec(), "image/png");
        assert!(validate_upload(&upload, &analysis_policy()).is_ok());
    }

    #[test]
    fn test_generation_rejects_corrupt_png() {
        let mut bytes = tiny_png();
        bytes.truncate(bytes.len() / 2);
        let upload = UploadedImage::new(bytes, "image/png");
        match validate_upload(&upload, &generation_policy()) {
            Err(RelayError::Decode(msg)) => assert_eq!(msg, DECODE_MESSAGE),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_generation_accepts_real_png() {
        let upload = UploadedImage::new(tiny_png(), "image/png");
        assert!(validate_upload(&upload, &generation_policy()).is_ok());
    }

    #[test]
    fn test_type_rejected_before_decode() {
        let upload = UploadedImage::new(b"GIF89a....".to_vec(), "image/gif");
        assert!(matches!(
            validate_upload(&upload, &generation_policy()),
            Err(RelayError::Validation(_))
        ));
    }

    #[test]
    fn test_generation_rejects_oversized_dimensions() {
        // Tiny on disk, far wider than anything a decode is allowed to allocate for
        let mut buf = std::io::Cursor::new(Vec::new());
        image::GrayImage::new(MAX_DECODE_DIMENSION + 1, 1)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        let bytes = buf.into_inner();
        assert!(bytes.len() < 64 * 1024);

        let upload = UploadedImage::new(bytes, "image/png");
        let err = validate_upload(&upload, &generation_policy()).unwrap_err();
        assert!(matches!(err, RelayError::Decode(_)));
        assert_eq!(err.status().as_u16(), 400);
    }

    #[test]
    fn test_generation_accepts_image_at_dimension_limit() {
        let mut buf = std::io::Cursor::new(Vec::new());
        image::GrayImage::new(MAX_DECODE_DIMENSION, 1)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();

        let upload = UploadedImage::new(buf.into_inner(), "image/png");
        assert!(validate_upload(&upload, &generation_policy()).is_ok());
    }
}
