use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use auth_data::MongoStorage;
use clap::Parser;
use sso::logging::init_tracing;
use sso::{build_auth_service, shutdown_signal, Config, GrpcApp};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "sso", about = "Issues per-app access tokens over gRPC")]
struct Args {
    /// Path to the YAML config file
    #[arg(long, env = "CONFIG_PATH", default_value = "config/local.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)
        .with_context(|| format!("failed to load config from {}", args.config.display()))?;

    init_tracing(config.env);

    info!(
        service = "sso",
        version = env!("CARGO_PKG_VERSION"),
        env = ?config.env,
        grpc_port = config.grpc.port,
        token_ttl_secs = config.token_ttl_secs,
        "Starting application"
    );

    let storage = MongoStorage::connect(&config.storage.uri, &config.storage.database)
        .await
        .context("failed to connect to storage")?;
    storage
        .init_indexes()
        .await
        .context("failed to prepare storage indexes")?;

    info!(database = %config.storage.database, "Storage ready");

    let auth_service = build_auth_service(Arc::new(storage), config.token_ttl());

    GrpcApp::new(config.grpc.port, config.grpc_timeout(), auth_service)
        .run_until(shutdown_signal())
        .await
        .context("gRPC server failed")?;

    info!("Application stopped");

    Ok(())
}
