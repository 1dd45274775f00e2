use std::collections::BTreeMap;
use shared::types::{ContainerDescriptor, Defaults, PortBinding, ServiceRecord, Ttl};
use crate::names::{clean_image_name, remove_slash};
use super::{host, BuildError, ServiceBuilder};

/// Same as the static builder, but the port comes from the container's
/// exposed ports
#[derive(Debug, Clone, Copy, Default)]
pub struct ExposedPortsBuilder;

impl ServiceBuilder for ExposedPortsBuilder {
    fn build(
        &self,
        container: &ContainerDescriptor,
        defaults: &Defaults,
    ) -> Result<ServiceRecord, BuildError> {
        Ok(ServiceRecord {
            port: select_port(&container.exposed_ports, defaults.port()),
            environment: defaults.environment().to_string(),
            ttl: Ttl::Seconds(defaults.ttl()),
            service: clean_image_name(&container.image).to_string(),
            instance: remove_slash(&container.name).to_string(),
            host: host(container)?,
        })
    }
}

/// Picks the port to publish.
///
/// Bound entries contribute every host port, keeping the smallest seen. An
/// unbound entry contributes the number in its "port/proto" key, but only
/// while nothing has been selected yet. The result therefore depends on
/// iteration order when bound and unbound entries are mixed: an unbound key
/// seen first is only displaced by a smaller bound port. Candidates that do
/// not parse as a non-zero port are skipped. Falls back to `default` when
/// nothing was selected.
pub fn select_port(exposed: &BTreeMap<String, Vec<PortBinding>>, default: u16) -> u16 {
    let mut port = 0u16;

    for (key, bindings) in exposed {
        if bindings.is_empty() {
            if port == 0 {
                let declared = key.split('/').next().unwrap_or(key);
                if let Some(p) = parse_port(declared) {
                    port = p;
                }
            }
            continue;
        }

        for binding in bindings {
            if let Some(p) = parse_port(&binding.host_port) {
                if port == 0 || p < port {
                    port = p;
                }
            }
        }
    }

    if port == 0 {
        default
    } else {
        port
    }
}

fn parse_port(raw: &str) -> Option<u16> {
    match raw.trim().parse::<u16>() {
        Ok(p) if p > 0 => Some(p),
        _ => {
            tracing::debug!("Skipping unusable port candidate {:?}", raw);
            None
        }
    }
}
