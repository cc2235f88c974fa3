// Shared helpers for integration tests
// Author: kelexine (https://github.com/kelexine)

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use vision_relay::error::{RelayError, Result};
use vision_relay::provider::{Provider, ProviderRequest, ProviderResponse, ResponsePart};

/// Canned answer in the shape the food analysis prompt asks for.
pub const FOOD_REPLY: &str = "Název jídla:\nSvíčková na smetaně\n\n\
Kalorická hodnota:\nPřibližně 850 kcal\n\n\
Poznámky:\nTradiční české jídlo.\n\n\
Zdravotní benefity:\n- Bílkoviny z hovězího masa\n\n\
Zdravotní rizika:\n- Vysoký obsah tuku";

/// In-process provider that records every call and replies with a fixed result.
pub struct StubProvider {
    reply: std::result::Result<Vec<ResponsePart>, String>,
    calls: AtomicUsize,
    last_request: Mutex<Option<ProviderRequest>>,
}

impl StubProvider {
    pub fn replying(parts: Vec<ResponsePart>) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(parts),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn text(text: &str) -> Arc<Self> {
        Self::replying(vec![ResponsePart::Text(text.to_string())])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ProviderRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);

        match &self.reply {
            Ok(parts) => Ok(ProviderResponse {
                parts: parts.clone(),
            }),
            Err(message) => Err(RelayError::Provider(message.clone())),
        }
    }
}

/// Encode a noise PNG. Noise does not compress, so the file is slightly
/// larger than `width * height * 3` bytes.
pub fn noise_png(width: u32, height: u32) -> Vec<u8> {
    let mut state: u32 = 0x2545_f491;
    let img = image::RgbImage::from_fn(width, height, |_, _| {
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state & 0xff) as u8
        };
        image::Rgb([next(), next(), next()])
    });

    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

pub fn tiny_png() -> Vec<u8> {
    noise_png(4, 4)
}

pub const BOUNDARY: &str = "vision-relay-test-boundary-7d3f";

/// Build a `multipart/form-data` body with a single file field.
pub fn multipart_body(field: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"upload\"\r\n",
            field
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}
