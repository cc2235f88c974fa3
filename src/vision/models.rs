// Vision models and types
// Author: kelexine (https://github.com/kelexine)

use base64::Engine;
use bytes::Bytes;

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    WebP,
    Gif,
}

impl ImageFormat {
    /// Get MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
        }
    }

    /// Short upper-case name shown to users ("JPEG", "PNG", ...)
    pub fn label(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Png => "PNG",
            ImageFormat::WebP => "WEBP",
            ImageFormat::Gif => "GIF",
        }
    }

    /// Try to detect format from MIME type
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match normalize_mime(mime).as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            "image/png" => Some(ImageFormat::Png),
            "image/webp" => Some(ImageFormat::WebP),
            "image/gif" => Some(ImageFormat::Gif),
            _ => None,
        }
    }
}

/// Lower-case a MIME type and drop any parameters (`; charset=...`).
pub fn normalize_mime(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Upload rules for one pipeline.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    /// Largest accepted payload in bytes (inclusive).
    pub max_bytes: usize,
    /// Declared MIME types that are accepted, already normalized.
    pub allowed_mime_types: Vec<String>,
    /// Require the bytes to decode as an image.
    pub verify_decodes: bool,
}

impl UploadPolicy {
    pub fn new(max_bytes: usize, allowed_mime_types: &[String], verify_decodes: bool) -> Self {
        Self {
            max_bytes,
            allowed_mime_types: allowed_mime_types.iter().map(|m| normalize_mime(m)).collect(),
            verify_decodes,
        }
    }

    pub fn allows(&self, mime: &str) -> bool {
        let mime = normalize_mime(mime);
        self.allowed_mime_types.iter().any(|allowed| *allowed == mime)
    }

    /// Limit in whole megabytes, as shown in user-facing messages.
    pub fn max_megabytes(&self) -> usize {
        self.max_bytes.div_ceil(1024 * 1024)
    }
}

/// A file received in a multipart upload. Lives for one request.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Bytes,
    pub mime_type: String,
}

impl UploadedImage {
    pub fn new(bytes: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Standard base64 of the raw bytes, without a `data:` prefix.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    /// `data:<mime>;base64,<...>` URI for echoing the upload back.
    pub fn to_data_uri(&self) -> String {
        data_uri(&normalize_mime(&self.mime_type), &self.to_base64())
    }
}

/// Build a `data:` URI from a MIME type and already-encoded base64.
pub fn data_uri(mime_type: &str, base64_data: &str) -> String {
    format!("data:{};base64,{}", mime_type, base64_data)
}
