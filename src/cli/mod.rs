// CLI module for vision-relay
// Author: kelexine (https://github.com/kelexine)

use crate::config::AppConfig;
use clap::Parser;
use std::path::PathBuf;

/// vision-relay - food photo analysis and studio portrait generation over HTTP
#[derive(Parser, Debug)]
#[command(name = "vision-relay", version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (default: ~/.vision-relay/config.toml)
    #[arg(short, long, env = "VISION_RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind, overrides server.host
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overrides server.port
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
