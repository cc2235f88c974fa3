// vision-relay - image upload relay to multimodal AI providers
// Author: kelexine (https://github.com/kelexine)

pub mod anthropic;
pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod provider;
pub mod server;
pub mod utils;
pub mod vision;
