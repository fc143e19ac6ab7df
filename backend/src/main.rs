use anyhow::Result;
use tracing::{info, Level};

use finanzas_backend::{DbConfig, Finanzas};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let config = DbConfig::from_env();
    info!("Opening database at {}", config.database_url);

    let app = Finanzas::new(config);
    app.initialize().await;

    if let Some(error) = app.error().await {
        anyhow::bail!("initialization failed: {error}");
    }

    let Some(state) = app.state().await else {
        anyhow::bail!("backend not ready after initialization");
    };

    let categories = state.ledger_service.list_categories().await?;
    let transactions = state.ledger_service.list_transactions().await?;
    info!(
        "{} categories, {} transactions on record",
        categories.len(),
        transactions.len()
    );

    let summary = state.summary_service.compute_summary().await?;
    info!("Current summary: {}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
