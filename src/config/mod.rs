// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{RelayError, Result};
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};

/// Environment variable carrying the Anthropic API key.
pub const ANTHROPIC_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Environment variable carrying the Gemini API key.
pub const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Provider key variables (`ANTHROPIC_API_KEY`, `GEMINI_API_KEY`)
    /// 2. Environment variables (prefix: `VISION_RELAY__`)
    /// 3. Config file (explicit path, or `~/.vision-relay/config.toml`)
    /// 4. Defaults (lowest)
    ///
    /// CLI overrides are applied by the caller afterwards.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(&Self::default_config_path()).required(false),
        };

        let anthropic_key = non_empty(std::env::var(ANTHROPIC_KEY_ENV).ok());
        let gemini_key = non_empty(std::env::var(GEMINI_KEY_ENV).ok());

        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            // Override with environment variables, e.g. VISION_RELAY__SERVER__PORT
            .add_source(
                Environment::with_prefix("VISION_RELAY")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("anthropic.api_key", anthropic_key)?
            .set_override_option("gemini.api_key", gemini_key)?
            .build()
            .map_err(|e| RelayError::Configuration(e.to_string()))?;

        let config: AppConfig = config
            .try_deserialize()
            .map_err(|e| RelayError::Configuration(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject combinations that could never serve a request: unreachable
    /// upload limits, empty allow-lists, or a generation provider without
    /// image output.
    pub fn validate(&self) -> Result<()> {
        let largest_upload = self
            .analysis
            .max_upload_bytes
            .max(self.generation.max_upload_bytes);

        if self.server.max_body_bytes <= largest_upload {
            return Err(RelayError::Configuration(format!(
                "server.max_body_bytes ({}) must exceed the largest upload limit ({})",
                self.server.max_body_bytes, largest_upload
            )));
        }

        if self.analysis.allowed_mime_types.is_empty()
            || self.generation.allowed_mime_types.is_empty()
        {
            return Err(RelayError::Configuration(
                "allowed_mime_types must not be empty".to_string(),
            ));
        }

        if !self.generation.provider.supports_image_output() {
            return Err(RelayError::Configuration(format!(
                "generation.provider = \"{}\" cannot return images",
                self.generation.provider.as_str()
            )));
        }

        Ok(())
    }

    fn default_config_path() -> String {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".vision-relay")
            .join("config.toml")
            .to_string_lossy()
            .to_string()
    }
}

/// Trimmed value, or `None` if nothing is left. Stray whitespace from `.env`
/// files would otherwise end up in request headers.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.analysis.max_upload_bytes, 20 * 1024 * 1024);
        assert_eq!(config.generation.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.analysis.allowed_mime_types, vec!["image/jpeg", "image/png"]);
        assert!(config
            .generation
            .allowed_mime_types
            .contains(&"image/webp".to_string()));
        assert_eq!(config.analysis.provider, ProviderKind::Anthropic);
        assert_eq!(config.generation.provider, ProviderKind::Gemini);
        assert_eq!(config.analysis.error_status, ErrorStatusPolicy::StatusCodes);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9100

[analysis]
model = "claude-3-5-sonnet-20241022"
template = "brief"
error_status = "always_ok"

[generation]
max_upload_bytes = 5242880
"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.analysis.model, "claude-3-5-sonnet-20241022");
        assert_eq!(config.analysis.template, AnalysisTemplate::Brief);
        assert_eq!(config.analysis.error_status, ErrorStatusPolicy::AlwaysOk);
        assert_eq!(config.generation.max_upload_bytes, 5 * 1024 * 1024);
        // untouched sections keep their defaults
        assert_eq!(config.analysis.max_upload_bytes, 20 * 1024 * 1024);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/vision-relay.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_body_limit_must_exceed_upload_limit() {
        let mut config = AppConfig::default();
        config.server.max_body_bytes = 1024;
        assert!(matches!(config.validate(), Err(RelayError::Configuration(_))));
    }

    #[test]
    fn test_generation_requires_image_capable_provider() {
        let mut config = AppConfig::default();
        config.generation.provider = ProviderKind::Anthropic;
        assert!(matches!(config.validate(), Err(RelayError::Configuration(_))));
    }

    #[test]
    fn test_load_rejects_anthropic_generation() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[generation]\nprovider = \"anthropic\"").unwrap();

        let result = AppConfig::load(Some(file.path()));
        assert!(matches!(result, Err(RelayError::Configuration(_))));
    }

    #[test]
    fn test_key_values_are_trimmed() {
        assert_eq!(
            non_empty(Some("  sk-ant-api03-abc \r\n".to_string())),
            Some("sk-ant-api03-abc".to_string())
        );
        assert_eq!(non_empty(Some(" \t ".to_string())), None);
        assert_eq!(non_empty(None), None);
    }
}
