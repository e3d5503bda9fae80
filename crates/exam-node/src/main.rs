//! # Exam Registration Node
//!
//! Entry point for the exam registration backend.

use anyhow::{Context, Result};
use exam_gateway::ExamGatewayService;
use exam_node::{init_logging, load_config, open_store, TelemetryConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(&TelemetryConfig::from_env()).context("Failed to initialize logging")?;

    let config = load_config().context("Invalid configuration")?;
    let backend = config.storage.backend().context("Invalid storage URI")?;

    tokio::fs::create_dir_all(&config.uploads.dir)
        .await
        .with_context(|| format!("Failed to create upload dir {}", config.uploads.dir.display()))?;

    let store = open_store(&backend).context("Failed to open registration store")?;
    store
        .ping()
        .await
        .context("Registration store is not reachable")?;
    info!(backend = ?backend, "Registration store ready");

    let service = ExamGatewayService::new(config, store).context("Failed to create gateway")?;

    info!("Node is running. Press Ctrl+C to stop.");
    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received shutdown signal"),
            Err(e) => {
                error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    };

    service.run(shutdown).await.context("Gateway failed")?;
    Ok(())
}
