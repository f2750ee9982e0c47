use anyhow::Result;
use clap::Parser;

mod api;
mod config;
mod error;
mod models;
mod render;

use crate::config::{Args, ReportConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Logging goes to stderr; stdout carries only the report so the
    // output can be piped straight into a mail transport agent.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ReportConfig::resolve(Args::parse())?;
    let services = api::fetch_status(&config).await?;

    let stdout = std::io::stdout();
    render::write_report(&config, &services, chrono::Local::now(), &mut stdout.lock())?;

    Ok(())
}
