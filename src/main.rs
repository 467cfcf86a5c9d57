//! # gigbook
//!
//! Entry point: parse arguments, assemble the API configuration, run one
//! command and print its output.
//!
//! ## Configuration
//!
//! Later sources win:
//!
//! 1. Defaults
//! 2. `--config` file (TOML, or JSON by extension)
//! 3. `GIGBOOK_API_URL`, `GIGBOOK_ACCESS_TOKEN`, `GIGBOOK_TIMEOUT_SECS`,
//!    `GIGBOOK_PAGE_SIZE`
//! 4. `--api-url` and `--page-size`

#![forbid(unsafe_code)]
#![forbid(clippy::unwrap_used)]
#![forbid(clippy::panic)]
#![deny(clippy::expect_used)]

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use gigbook::App;
use gigbook::cli::Cli;
use gigbook_api::{ApiConfig, GigbookClient};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    debug!(base_url = ?config.base_url, page_size = config.page_size, "Configuration loaded");

    let page_size = config.page_size;
    let client = GigbookClient::with_config(config)
        .context("No API URL configured. Pass --api-url or set GIGBOOK_API_URL")?;

    let app = App::new(client, page_size, cli.preferences);
    let output = app.execute(cli.command).await?;
    print!("{output}");

    Ok(())
}

/// Initialize tracing on stderr so command output stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<ApiConfig> {
    let config = match &cli.config {
        Some(path) => ApiConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ApiConfig::default(),
    };

    let mut config = config.overlay_env(|key| std::env::var(key).ok());
    if let Some(url) = &cli.api_url {
        config.base_url = Some(url.clone());
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    Ok(config)
}
