use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use crate::protocol::{DEFAULT_ENVIRONMENT, DEFAULT_PORT, DEFAULT_TTL};

/// Snapshot of a running container, as handed over by the container runtime.
/// Read-only input to the service builders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContainerDescriptor {
    /// Image reference, e.g. "registry/name:tag"
    pub image: String,

    /// Container name, a leading "/" is permitted
    pub name: String,

    /// IPv4/IPv6 literal of the container, copied verbatim into the record
    pub network_address: Option<String>,

    /// "port/proto" -> host bindings. An unbound declared port has an empty list.
    #[serde(default)]
    pub exposed_ports: BTreeMap<String, Vec<PortBinding>>,

    /// Raw "KEY=VALUE" environment entries
    #[serde(default)]
    pub env: Vec<String>,
}

/// A single host binding of an exposed port
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortBinding {
    #[serde(default)]
    pub host_ip: String,

    /// Kept as reported by the runtime; may be empty or non-numeric
    #[serde(default)]
    pub host_port: String,
}

impl PortBinding {
    pub fn new(host_port: impl Into<String>) -> Self {
        Self {
            host_ip: String::new(),
            host_port: host_port.into(),
        }
    }
}

/// TTL of a record. Container overrides are carried as found, so consumers
/// must accept either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ttl {
    Seconds(u32),
    Literal(String),
}

impl Ttl {
    /// Positive integers become `Seconds`, anything else is kept verbatim.
    /// A numeric zero is no TTL at all and yields `None`.
    pub fn from_override(value: &str) -> Option<Self> {
        match value.trim().parse::<u32>() {
            Ok(0) => None,
            Ok(secs) => Some(Ttl::Seconds(secs)),
            Err(_) => Some(Ttl::Literal(value.to_string())),
        }
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ttl::Seconds(secs) => write!(f, "{}", secs),
            Ttl::Literal(raw) => f.write_str(raw),
        }
    }
}

/// The resolved discovery entry for one container.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub port: u16,

    /// Environment tag, e.g. "production"
    pub environment: String,

    pub ttl: Ttl,

    /// Service name, derived from the image or overridden
    pub service: String,

    /// Instance identifier, derived from the container name or overridden
    pub instance: String,

    /// Network address, not validated
    pub host: String,
}

impl ServiceRecord {
    /// `instance.service.environment.domain`
    pub fn dns_name(&self, domain: &str) -> String {
        let domain = domain.trim_matches('.');
        if domain.is_empty() {
            format!("{}.{}.{}", self.instance, self.service, self.environment)
        } else {
            format!("{}.{}.{}.{}", self.instance, self.service, self.environment, domain)
        }
    }

    /// `host:port`, with IPv6 literals bracketed
    pub fn target(&self) -> String {
        match self.host.parse::<IpAddr>() {
            Ok(IpAddr::V6(addr)) => format!("[{}]:{}", addr, self.port),
            _ => format!("{}:{}", self.host, self.port),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidDefaults {
    #[error("default environment must not be empty")]
    EmptyEnvironment,
    #[error("default ttl must be greater than 0")]
    ZeroTtl,
    #[error("default port must be greater than 0")]
    ZeroPort,
}

/// Fallback values, fixed at startup.
/// Only constructible through [`Defaults::new`], so every field is usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Defaults {
    environment: String,
    ttl: u32,
    port: u16,
}

impl Defaults {
    pub fn new(environment: impl Into<String>, ttl: u32, port: u16) -> Result<Self, InvalidDefaults> {
        let environment = environment.into();
        if environment.trim().is_empty() {
            return Err(InvalidDefaults::EmptyEnvironment);
        }
        if ttl == 0 {
            return Err(InvalidDefaults::ZeroTtl);
        }
        if port == 0 {
            return Err(InvalidDefaults::ZeroPort);
        }
        Ok(Self { environment, ttl, port })
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            ttl: DEFAULT_TTL,
            port: DEFAULT_PORT,
        }
    }
}
