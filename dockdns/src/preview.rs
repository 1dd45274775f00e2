//! Dry run of a registrar: inspect JSON in, one JSON line per record out.

use std::io::Write;
use anyhow::{Context, Result};
use serde::Serialize;
use shared::types::ServiceRecord;
use crate::config::Config;
use crate::docker;
use crate::names::truncate_id;

/// What a registrar would publish for one container
#[derive(Debug, Serialize)]
pub struct Registration<'a> {
    pub id: &'a str,
    pub name: String,
    pub target: String,
    pub record: &'a ServiceRecord,
}

/// Builds a record for every container in `input` and writes one JSON line
/// per record. Containers that fail to build are logged and skipped.
/// Returns the number of lines written.
pub fn run(config: &Config, input: &str, mut out: impl Write) -> Result<usize> {
    let defaults = config.defaults()?;
    let builder = config.builder.strategy.builder();
    tracing::info!(
        "Using {:?} builder (environment={}, ttl={}, port={})",
        config.builder.strategy,
        defaults.environment(),
        defaults.ttl(),
        defaults.port()
    );

    let containers = docker::parse_inspect(input)?;
    tracing::info!("Read {} containers", containers.len());

    let mut written = 0;
    for container in containers {
        let id = truncate_id(&container.id).to_string();
        let descriptor = container.into_descriptor();

        let record = match builder.build(&descriptor, &defaults) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping {} ({}): {}", id, descriptor.name, e);
                continue;
            }
        };

        tracing::debug!("Built {} for {} (ttl {})", record.service, id, record.ttl);

        let registration = Registration {
            id: &id,
            name: record.dns_name(&config.dns.domain),
            target: record.target(),
            record: &record,
        };
        serde_json::to_writer(&mut out, &registration).context("Failed to write record")?;
        writeln!(out).context("Failed to write record")?;
        written += 1;
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const TWO_CONTAINERS: &str = r#"[
        {
            "Id": "4fa6e0f0c6786287e131c3852c58a2e01cc697a6",
            "Name": "/redis1",
            "Config": {"Image": "crosbymichael/redis:latest", "Env": []},
            "NetworkSettings": {
                "IPAddress": "172.17.0.2",
                "Ports": {"6379/tcp": [{"HostIp": "0.0.0.0", "HostPort": "49153"}]}
            }
        },
        {
            "Id": "9bd1c0a7e2f3d4c5b6a79880",
            "Name": "/detached",
            "Config": {"Image": "busybox"}
        }
    ]"#;

    fn output_lines(config: &Config, input: &str) -> (usize, Vec<Value>) {
        let mut out = Vec::new();
        let written = run(config, input, &mut out).unwrap();
        let lines = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        (written, lines)
    }

    #[test]
    fn test_skips_container_without_address() {
        let (written, lines) = output_lines(&Config::default(), TWO_CONTAINERS);

        assert_eq!(written, 1);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["id"], "4fa6e0f0c6");
        assert_eq!(lines[0]["name"], "redis1.redis.dev.skydns.local");
        assert_eq!(lines[0]["target"], "172.17.0.2:80");
    }

    #[test]
    fn test_record_shape() {
        let (_, lines) = output_lines(&Config::default(), TWO_CONTAINERS);
        let record = &lines[0]["record"];

        assert_eq!(record["port"], 80);
        assert_eq!(record["ttl"], 60);
        assert_eq!(record["environment"], "dev");
        assert_eq!(record["service"], "redis");
        assert_eq!(record["instance"], "redis1");
        assert_eq!(record["host"], "172.17.0.2");
    }

    #[test]
    fn test_uses_configured_strategy_and_domain() {
        let config = Config::parse(
            r#"
            [builder]
            strategy = "exposed-ports"

            [dns]
            domain = "example.internal"
            "#,
        )
        .unwrap();
        let (_, lines) = output_lines(&config, TWO_CONTAINERS);

        assert_eq!(lines[0]["name"], "redis1.redis.dev.example.internal");
        assert_eq!(lines[0]["target"], "172.17.0.2:49153");
    }

    #[test]
    fn test_invalid_input_is_an_error() {
        assert!(run(&Config::default(), "[{", Vec::new()).is_err());
    }
}
