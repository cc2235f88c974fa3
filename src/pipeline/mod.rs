//! Upload-to-provider pipeline.
//!
//! A [`Pipeline`] is one configured combination of provider, model, prompt
//! template, upload policy and extraction strategy. Both HTTP endpoints run
//! the same code; only the parameters differ:
//!
//! - `analysis`: food photo in, first text block out.
//! - `generation`: portrait in, generated image plus a short message out.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod prompts;

pub use prompts::{PromptTemplate, FOOD_ANALYSIS_SECTIONS, STUDIO_PORTRAIT};

use crate::config::{AnalysisConfig, GenerationConfig};
use crate::error::{RelayError, Result};
use crate::metrics;
use crate::provider::{ImagePart, Provider, ProviderRequest, ProviderResponse};
use crate::vision::{data_uri, normalize_mime, validate_upload, UploadPolicy, UploadedImage};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Fallback MIME type for generated images that arrive without one.
const DEFAULT_GENERATED_MIME: &str = "image/png";

/// How the useful result is pulled out of a provider response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// The first text part is the answer.
    FirstText,
    /// The first inline-data part is the answer; the first text part, if
    /// any, is an accompanying message.
    ImageWithMessage,
}

/// Successful pipeline result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Analysis {
        text: String,
    },
    Portrait {
        message: String,
        original_image: String,
        generated_image: String,
    },
}

pub struct Pipeline {
    name: &'static str,
    provider: Option<Arc<dyn Provider>>,
    model: String,
    template: PromptTemplate,
    extraction: Extraction,
    policy: UploadPolicy,
    max_tokens: u32,
    default_message: String,
    failure_message: String,
}

impl Pipeline {
    /// Food photo analysis. `provider` is `None` when its API key is missing;
    /// requests then fail with a configuration error after validation.
    pub fn analysis(config: &AnalysisConfig, provider: Option<Arc<dyn Provider>>) -> Self {
        Self {
            name: "analysis",
            provider,
            model: config.model.clone(),
            template: PromptTemplate::for_analysis(config.template),
            extraction: Extraction::FirstText,
            policy: UploadPolicy::new(config.max_upload_bytes, &config.allowed_mime_types, false),
            max_tokens: config.max_tokens,
            default_message: String::new(),
            failure_message: "Došlo k chybě při analýze obrázku. Zkuste to prosím znovu."
                .to_string(),
        }
    }

    /// Studio portrait generation. Uploads must also decode as images.
    pub fn generation(config: &GenerationConfig, provider: Option<Arc<dyn Provider>>) -> Self {
        Self {
            name: "generation",
            provider,
            model: config.model.clone(),
            template: STUDIO_PORTRAIT,
            extraction: Extraction::ImageWithMessage,
            policy: UploadPolicy::new(config.max_upload_bytes, &config.allowed_mime_types, true),
            max_tokens: config.max_tokens,
            default_message: config.default_message.clone(),
            failure_message: "Došlo k chybě při generování portrétu. Zkuste to prosím znovu."
                .to_string(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Client-safe summary for provider failures on this pipeline.
    pub fn failure_message(&self) -> &str {
        &self.failure_message
    }

    /// Validate, call the provider once, and extract the result.
    pub async fn run(&self, upload: UploadedImage) -> Result<Outcome> {
        metrics::record_upload(self.name, upload.size());

        if let Err(e) = self.validate(&upload).await {
            info!("{} upload rejected ({}): {}", self.name, e.kind(), e);
            metrics::record_rejection(self.name, e.kind());
            return Err(e);
        }

        let provider = self.provider.as_ref().ok_or_else(|| {
            RelayError::Configuration(format!("no provider configured for {}", self.name))
        })?;

        let request = self.build_request(&upload);
        info!(
            "{} pipeline: {} bytes {} -> {} ({})",
            self.name,
            upload.size(),
            request.image.mime_type,
            provider.name(),
            self.model
        );

        let start = Instant::now();
        let result = provider.send(request).await;
        let elapsed = start.elapsed().as_secs_f64();

        let response = match result {
            Ok(response) => {
                metrics::record_provider_call(provider.name(), &self.model, "ok", elapsed);
                response
            }
            Err(e) => {
                metrics::record_provider_call(provider.name(), &self.model, e.kind(), elapsed);
                error!("{} provider call failed after {:.2}s: {}", self.name, elapsed, e);
                return Err(e);
            }
        };

        debug!(
            "{} provider returned {} parts in {:.2}s",
            self.name,
            response.parts.len(),
            elapsed
        );

        self.extract(&upload, response)
    }

    /// Upload checks. Decoding is CPU-bound, so policies that decode run on
    /// the blocking pool instead of a runtime worker.
    async fn validate(&self, upload: &UploadedImage) -> Result<()> {
        if !self.policy.verify_decodes {
            return validate_upload(upload, &self.policy);
        }

        let upload = upload.clone();
        let policy = self.policy.clone();
        tokio::task::spawn_blocking(move || validate_upload(&upload, &policy))
            .await
            .map_err(|e| RelayError::Internal(format!("upload validation task failed: {}", e)))?
    }

    fn build_request(&self, upload: &UploadedImage) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            system: self.template.system.to_string(),
            prompt: self.template.render(),
            image: ImagePart {
                mime_type: normalize_mime(&upload.mime_type),
                data: upload.to_base64(),
            },
            max_tokens: self.max_tokens,
            wants_image: self.extraction == Extraction::ImageWithMessage,
        }
    }

    fn extract(&self, upload: &UploadedImage, response: ProviderResponse) -> Result<Outcome> {
        match self.extraction {
            Extraction::FirstText => response
                .first_text()
                .map(|text| Outcome::Analysis {
                    text: text.to_string(),
                })
                .ok_or_else(|| {
                    RelayError::Provider("provider response contained no text part".to_string())
                }),

            Extraction::ImageWithMessage => {
                let Some((mime_type, data)) = response.first_inline_data() else {
                    warn!(
                        "{} provider returned no image (text present: {})",
                        self.name,
                        response.first_text().is_some()
                    );
                    return Err(RelayError::MissingImage);
                };

                let mime_type = if mime_type.is_empty() {
                    DEFAULT_GENERATED_MIME
                } else {
                    mime_type
                };

                let message = response
                    .first_text()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| self.default_message.clone());

                Ok(Outcome::Portrait {
                    message,
                    original_image: upload.to_data_uri(),
                    generated_image: data_uri(mime_type, data),
                })
            }
        }
    }
}
