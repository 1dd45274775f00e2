use std::collections::HashMap;
use shared::protocol::{ENV_ENVIRONMENT, ENV_INSTANCE, ENV_PREFIX, ENV_SERVICE, ENV_TTL, HTTP_PORT};
use shared::types::{ContainerDescriptor, Defaults, ServiceRecord, Ttl};
use crate::names::{clean_image_name, remove_slash};
use super::{host, BuildError, ServiceBuilder};

/// Lets a container override its record through `DNS_*` environment variables.
/// The port is always 80.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentBuilder;

impl ServiceBuilder for EnvironmentBuilder {
    fn build(
        &self,
        container: &ContainerDescriptor,
        defaults: &Defaults,
    ) -> Result<ServiceRecord, BuildError> {
        let env = parse_environment(&container.env);
        // Blank values count as unset
        let lookup = |key: &str| {
            env.get(key)
                .map(String::as_str)
                .filter(|v| !v.trim().is_empty())
        };

        Ok(ServiceRecord {
            port: HTTP_PORT,
            environment: lookup(ENV_ENVIRONMENT)
                .unwrap_or(defaults.environment())
                .to_string(),
            ttl: lookup(ENV_TTL)
                .and_then(|raw| {
                    let ttl = Ttl::from_override(raw);
                    if ttl.is_none() {
                        tracing::debug!("Ignoring zero {} override for {}", ENV_TTL, container.name);
                    }
                    ttl
                })
                .unwrap_or(Ttl::Seconds(defaults.ttl())),
            service: lookup(ENV_SERVICE)
                .unwrap_or_else(|| clean_image_name(&container.image))
                .to_string(),
            instance: lookup(ENV_INSTANCE)
                .unwrap_or_else(|| remove_slash(&container.name))
                .to_string(),
            host: host(container)?,
        })
    }
}

/// Collects the `DNS_`-prefixed entries of a "KEY=VALUE" list.
/// Splits on the first "=" only; an entry without one gets an empty value.
/// Later duplicates win.
pub fn parse_environment<S: AsRef<str>>(entries: &[S]) -> HashMap<String, String> {
    entries
        .iter()
        .filter_map(|entry| {
            let entry: &str = entry.as_ref();
            let (key, value) = match entry.split_once('=') {
                Some((key, value)) => (key, value),
                None => {
                    tracing::debug!("Environment entry without '=': {}", entry);
                    (entry, "")
                }
            };
            key.starts_with(ENV_PREFIX)
                .then(|| (key.to_string(), value.to_string()))
        })
        .collect()
}
