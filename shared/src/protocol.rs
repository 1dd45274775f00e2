/// Only environment variables with this prefix are read as overrides
pub const ENV_PREFIX: &str = "DNS_";

/// Environment keys a container may set to override its record
pub const ENV_ENVIRONMENT: &str = "DNS_ENVIRONMENT";
pub const ENV_TTL: &str = "DNS_TTL";
pub const ENV_SERVICE: &str = "DNS_SERVICE";
pub const ENV_INSTANCE: &str = "DNS_INSTANCE";

/// Port published by the environment-override builder, regardless of defaults
pub const HTTP_PORT: u16 = 80;

/// Built-in defaults
pub const DEFAULT_ENVIRONMENT: &str = "dev";
pub const DEFAULT_TTL: u32 = 60;
pub const DEFAULT_PORT: u16 = 80;

/// Length of the short container id used as a registration key
pub const ID_PREFIX_LEN: usize = 10;
