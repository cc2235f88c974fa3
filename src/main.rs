// vision-relay - image upload relay to multimodal AI providers
// Author: kelexine (https://github.com/kelexine)

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;
use vision_relay::cli::Args;
use vision_relay::config::AppConfig;
use vision_relay::pipeline::Pipeline;
use vision_relay::provider::build_provider;
use vision_relay::server::create_router;
use vision_relay::utils::logging;

fn main() -> Result<()> {
    // Phase 1: Load .env and configuration
    dotenvy::dotenv().ok();
    let args = Args::parse();
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting vision-relay v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Runtime sized from config
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.workers.max(1))
        .enable_all()
        .build()?;

    runtime.block_on(serve(config))
}

async fn serve(config: AppConfig) -> Result<()> {
    // Phase 4: Build provider clients once; missing keys only disable their pipeline
    let analysis_provider = build_provider(config.analysis.provider, &config);
    let generation_provider = build_provider(config.generation.provider, &config);

    let analysis = Pipeline::analysis(&config.analysis, analysis_provider);
    let generation = Pipeline::generation(&config.generation, generation_provider);

    info!(
        "Analysis: {} via {} (configured: {})",
        config.analysis.model,
        config.analysis.provider.as_str(),
        analysis.is_configured()
    );
    info!(
        "Generation: {} via {} (configured: {})",
        config.generation.model,
        config.generation.provider.as_str(),
        generation.is_configured()
    );

    // Phase 5: Build and start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = create_router(config, analysis, generation);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 6: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
