use shared::types::{ContainerDescriptor, Defaults, ServiceRecord, Ttl};
use crate::names::{clean_image_name, remove_slash};
use super::{host, BuildError, ServiceBuilder};

/// Publishes the configured defaults with names taken from the image and
/// container name
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticBuilder;

impl ServiceBuilder for StaticBuilder {
    fn build(
        &self,
        container: &ContainerDescriptor,
        defaults: &Defaults,
    ) -> Result<ServiceRecord, BuildError> {
        Ok(ServiceRecord {
            port: defaults.port(),
            environment: defaults.environment().to_string(),
            ttl: Ttl::Seconds(defaults.ttl()),
            service: clean_image_name(&container.image).to_string(),
            instance: remove_slash(&container.name).to_string(),
            host: host(container)?,
        })
    }
}
