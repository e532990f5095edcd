//! Dietitian Chat
//!
//! Entry point for the terminal chat with the AI Dietitian service.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::io::BufReader;
use tracing::info;

use dietitian_chat::api::Client;
use dietitian_chat::config::AppConfig;
use dietitian_chat::session::SessionClient;
use dietitian_chat::telemetry;
use dietitian_chat::ui::Repl;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    let config = AppConfig::load().context("Configuration error")?;
    telemetry::init(&config.logging)?;

    info!(
        name: "config.loaded",
        base_url = %config.api.base_url,
        "Configuration loaded"
    );

    let api = Client::new(&config.api.base_url)
        .with_context(|| format!("Invalid base URL: {}", config.api.base_url))?;
    let client = SessionClient::new(Arc::new(api));

    let mut repl = Repl::new(client, std::io::stdout());
    repl.run(BufReader::new(tokio::io::stdin())).await?;

    Ok(())
}
