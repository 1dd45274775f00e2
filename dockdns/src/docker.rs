//! Serde model of the Docker Engine container inspect body
//! (`GET /containers/{id}/json`), reduced to what the builders read.

use std::collections::BTreeMap;
use serde::Deserialize;
use anyhow::{Context, Result};
use shared::types::{ContainerDescriptor, PortBinding};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InspectedContainer {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub config: Option<ContainerConfig>,
    #[serde(default)]
    pub network_settings: Option<NetworkSettings>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerConfig {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub env: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkSettings {
    #[serde(rename = "IPAddress", alias = "IpAddress", default)]
    pub ip_address: String,
    /// null for a port that is exposed but not published
    #[serde(rename = "Ports", default)]
    pub ports: Option<BTreeMap<String, Option<Vec<Binding>>>>,
    /// Per-network settings for containers on user-defined networks
    #[serde(rename = "Networks", default)]
    pub networks: Option<BTreeMap<String, EndpointSettings>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EndpointSettings {
    #[serde(rename = "IPAddress", default)]
    pub ip_address: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Binding {
    #[serde(default)]
    pub host_ip: String,
    #[serde(default)]
    pub host_port: String,
}

impl NetworkSettings {
    /// Top-level address, else the first non-empty per-network address
    fn address(&self) -> Option<String> {
        if !self.ip_address.is_empty() {
            return Some(self.ip_address.clone());
        }
        self.networks
            .iter()
            .flatten()
            .map(|(_, endpoint)| &endpoint.ip_address)
            .find(|addr| !addr.is_empty())
            .cloned()
    }
}

impl InspectedContainer {
    pub fn into_descriptor(self) -> ContainerDescriptor {
        let config = self.config.unwrap_or_default();
        let network = self.network_settings.unwrap_or_default();
        let network_address = network.address();

        let exposed_ports = network
            .ports
            .unwrap_or_default()
            .into_iter()
            .map(|(key, bindings)| {
                let bindings = bindings
                    .unwrap_or_default()
                    .into_iter()
                    .map(|b| PortBinding {
                        host_ip: b.host_ip,
                        host_port: b.host_port,
                    })
                    .collect();
                (key, bindings)
            })
            .collect();

        ContainerDescriptor {
            image: config.image,
            name: self.name,
            network_address,
            exposed_ports,
            env: config.env.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InspectOutput {
    Many(Vec<InspectedContainer>),
    One(Box<InspectedContainer>),
}

/// Parses `docker inspect` output: an array of containers or a single one
pub fn parse_inspect(json: &str) -> Result<Vec<InspectedContainer>> {
    let output: InspectOutput =
        serde_json::from_str(json).context("Failed to parse container inspect JSON")?;

    Ok(match output {
        InspectOutput::Many(containers) => containers,
        InspectOutput::One(container) => vec![*container],
    })
}
