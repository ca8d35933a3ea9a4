// This is the entry point of the monster trigger export.
//
// **Architecture Overview:**
// - `core/` = Business logic (reshaping rows, normalizing triggers)
// - `infra/` = Implementations of core traits (Google Sheets, output files)
// - `config.rs` = Environment configuration, read once here
//
// This file's job is to:
// 1. Load configuration
// 2. Build the Sheets client and the writer (dependency injection)
// 3. Run the export once and exit

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with several mod.rs files that all look the same.
mod config;
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, CredentialSource};
use crate::core::monsters::MonsterExportService;
use crate::infra::google_sheets::{
    AuthorizedUserAuth, GoogleSheetsClient, ServiceAccountAuth, SheetsCredentials,
};
use crate::infra::output::JsonDocumentWriter;

async fn build_credentials(source: &CredentialSource) -> Result<SheetsCredentials> {
    let credentials = match source {
        CredentialSource::ServiceAccountFile(path) => {
            let auth = ServiceAccountAuth::from_file(path)
                .await
                .context("Failed to load service account key")?;
            tracing::info!("Using service account {}", auth.client_email());
            SheetsCredentials::Token(Box::new(auth))
        }
        CredentialSource::ServiceAccountJson(json) => {
            let auth = ServiceAccountAuth::from_json(json)
                .context("Failed to parse GOOGLE_SERVICE_ACCOUNT_JSON")?;
            tracing::info!("Using service account {}", auth.client_email());
            SheetsCredentials::Token(Box::new(auth))
        }
        CredentialSource::AuthorizedUserFile(path) => {
            let auth = AuthorizedUserAuth::from_file(path.clone())
                .await
                .context("Failed to load authorized user token file")?;
            tracing::info!("Using authorized user token from {}", path.display());
            SheetsCredentials::Token(Box::new(auth))
        }
        CredentialSource::ApiKey(key) => {
            tracing::info!("Using API key (sheet must be publicly readable)");
            SheetsCredentials::ApiKey(key.clone())
        }
    };
    Ok(credentials)
}

async fn run() -> Result<()> {
    let config = AppConfig::from_env()?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    let credentials = build_credentials(&config.credentials).await?;
    let source = GoogleSheetsClient::new(credentials);
    let writer = JsonDocumentWriter::new(config.output_paths.clone());
    tracing::debug!("Output targets: {:?}", writer.targets());

    let service = MonsterExportService::new(source, writer, config.location, config.schema);

    let summary = service.run().await.context("Export failed")?;
    tracing::info!(
        "Exported {} monster(s) with {} trigger(s)",
        summary.commands,
        summary.triggers
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file (if it exists), before the
    // subscriber reads RUST_LOG
    dotenv::dotenv().ok();

    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}
