use std::io::{self, Read};
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use dockdns::config::Config;

const DEFAULT_CONFIG_PATH: &str = "/etc/dockdns/dockdns.toml";

fn main() -> Result<()> {
    // Records go to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("dockdns=info"))
        )
        .with_writer(io::stderr)
        .init();

    let explicit = std::env::args().nth(1).map(PathBuf::from);
    let config = Config::resolve(explicit.as_deref(), Path::new(DEFAULT_CONFIG_PATH))
        .context("Failed to load config")?;

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read container JSON from stdin")?;

    let written = dockdns::run(&config, &input, io::stdout().lock())?;
    tracing::info!("Wrote {} records", written);

    Ok(())
}
