//! cms-admin command-line client

use clap::Parser;
use cms_admin::cli::{self, Cli};
use cms_admin::config::{LogFormat, Settings};
use cms_admin::notify::TracingNotifier;
use cms_admin::AdminContext;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load()?;
    init_tracing(settings.log.format);
    cli::apply_overrides(&cli, &mut settings)?;
    debug!(api = %settings.api.base_url, "Configuration loaded");

    let ctx = AdminContext::new(settings, Arc::new(TracingNotifier))?;
    cli::run(cli, &ctx).await?;
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cms_admin=debug"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init(),
    }
}
