pub mod environment;
pub mod ports;
pub mod plain;

use serde::Deserialize;
use thiserror::Error;
use shared::types::{ContainerDescriptor, Defaults, ServiceRecord};

pub use environment::{parse_environment, EnvironmentBuilder};
pub use ports::{select_port, ExposedPortsBuilder};
pub use plain::StaticBuilder;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    /// A field with no default was not supplied by the runtime
    #[error("container descriptor is missing {0}")]
    MissingField(&'static str),
}

/// Derives a service record from a container.
/// Implementations are pure: they read only their arguments.
pub trait ServiceBuilder: Send + Sync {
    fn build(
        &self,
        container: &ContainerDescriptor,
        defaults: &Defaults,
    ) -> Result<ServiceRecord, BuildError>;
}

/// Which builder a deployment uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Defaults plus names derived from the image and container
    #[default]
    Static,
    /// `DNS_*` environment variables override the derived values
    Environment,
    /// Port picked from the container's exposed ports
    ExposedPorts,
}

impl Strategy {
    pub fn builder(self) -> Box<dyn ServiceBuilder> {
        match self {
            Strategy::Static => Box::new(StaticBuilder),
            Strategy::Environment => Box::new(EnvironmentBuilder),
            Strategy::ExposedPorts => Box::new(ExposedPortsBuilder),
        }
    }
}

/// Host has no fallback, so an absent address fails the build
fn host(container: &ContainerDescriptor) -> Result<String, BuildError> {
    container
        .network_address
        .clone()
        .ok_or(BuildError::MissingField("network address"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use shared::types::Ttl;

    pub(crate) fn test_container() -> ContainerDescriptor {
        ContainerDescriptor {
            image: "crosbymichael/redis:latest".to_string(),
            name: "/redis1".to_string(),
            network_address: Some("192.168.1.10".to_string()),
            ..Default::default()
        }
    }

    pub(crate) fn test_defaults() -> Defaults {
        Defaults::new("production", 30, 80).unwrap()
    }

    #[test]
    fn test_strategy_selects_builder() {
        let mut container = test_container();
        container.env = vec!["DNS_SERVICE=cache".to_string()];
        container
            .exposed_ports
            .insert("6379/tcp".to_string(), vec![]);
        let defaults = test_defaults();

        let plain = Strategy::Static.builder().build(&container, &defaults).unwrap();
        assert_eq!(plain.service, "redis");
        assert_eq!(plain.port, 80);

        let env = Strategy::Environment.builder().build(&container, &defaults).unwrap();
        assert_eq!(env.service, "cache");

        let ports = Strategy::ExposedPorts.builder().build(&container, &defaults).unwrap();
        assert_eq!(ports.port, 6379);
        assert_eq!(ports.ttl, Ttl::Seconds(30));
    }

    #[test]
    fn test_strategy_from_config_name() {
        #[derive(Deserialize)]
        struct Wrapper {
            strategy: Strategy,
        }
        let parsed: Wrapper = toml::from_str(r#"strategy = "exposed-ports""#).unwrap();
        assert_eq!(parsed.strategy, Strategy::ExposedPorts);
    }

    #[test]
    fn test_zero_defaults_cannot_reach_a_record() {
        assert!(Defaults::new("dev", 0, 0).is_err());

        // The only defaults a builder can receive are checked ones
        let defaults = Defaults::new("dev", 1, 1).unwrap();
        for strategy in [Strategy::Static, Strategy::Environment, Strategy::ExposedPorts] {
            let record = strategy.builder().build(&test_container(), &defaults).unwrap();
            assert!(record.port > 0);
            assert_eq!(record.ttl, Ttl::Seconds(1));
        }
    }

    #[test]
    fn test_missing_address_fails_every_strategy() {
        let mut container = test_container();
        container.network_address = None;

        for strategy in [Strategy::Static, Strategy::Environment, Strategy::ExposedPorts] {
            let err = strategy.builder().build(&container, &test_defaults()).unwrap_err();
            assert_eq!(err, BuildError::MissingField("network address"));
        }
    }

    #[test]
    fn test_builders_are_shareable_across_threads() {
        let builder: std::sync::Arc<dyn ServiceBuilder> = Strategy::ExposedPorts.builder().into();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let builder = builder.clone();
                std::thread::spawn(move || {
                    builder.build(&test_container(), &test_defaults()).unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().host, "192.168.1.10");
        }
    }
}
