use std::path::Path;
use serde::Deserialize;
use anyhow::{Context, Result};
use shared::protocol::{DEFAULT_ENVIRONMENT, DEFAULT_PORT, DEFAULT_TTL};
use shared::types::Defaults;
use crate::builder::Strategy;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub builder: BuilderConfig,
    #[serde(default)]
    pub dns: DnsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default = "default_ttl")]
    pub ttl: u32,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuilderConfig {
    #[serde(default)]
    pub strategy: Strategy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DnsConfig {
    /// Same domain the DNS server is authoritative for
    #[serde(default = "default_domain")]
    pub domain: String,
}

fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_domain() -> String {
    "skydns.local".to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            ttl: default_ttl(),
            port: default_port(),
        }
    }
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// An explicit path must exist. Without one, the default path is used if
    /// present, else the built-in defaults.
    pub fn resolve(explicit: Option<&Path>, default_path: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None if default_path.exists() => Self::load(default_path),
            None => {
                tracing::info!(
                    "No config at {}, using built-in defaults",
                    default_path.display()
                );
                Ok(Self::default())
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.defaults().map(|_| ())
    }

    /// Fallback values handed to every build
    pub fn defaults(&self) -> Result<Defaults> {
        Defaults::new(
            self.defaults.environment.clone(),
            self.defaults.ttl,
            self.defaults.port,
        )
        .context("Invalid [defaults] section")
    }
}
