use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use thawctl::cli::Cli;
use thawctl::settings::FileConfig;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const ENV_FILE_VAR: &str = "THAW_ENV_FILE";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Env file first so its values feed clap's env fallbacks.
    let env_file = std::env::var_os(ENV_FILE_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".env"));
    match dotenvy::from_path(&env_file) {
        Ok(()) => info!(path = %env_file.display(), "loaded env file"),
        Err(err) if err.not_found() => {
            debug!(path = %env_file.display(), "no env file")
        }
        Err(err) => {
            return Err(err).with_context(|| {
                format!("failed to load env file {}", env_file.display())
            });
        }
    }

    let cli = Cli::parse();
    let file = match cli.config.as_deref() {
        Some(path) => FileConfig::load_from_file(path)?,
        None => FileConfig::default(),
    };
    let settings = cli.into_settings(file);

    thawctl::execute(settings).await?;
    Ok(())
}
