// ABOUTME: Shared test support: in-memory directory fake and fixture builders.
// ABOUTME: Used by the integration test files via `mod support;`.

// Each test binary only uses some of these helpers, so allow dead_code.
#![allow(dead_code)]

pub mod memory_directory;

pub use memory_directory::{Event, MemoryDirectory};

use metavasi::config::Config;
use metavasi::directory::{HealthState, MemberHealth, ResourceDescription, WeightedRecord, Zone};
use metavasi::types::{InstanceId, RecordName, ZoneId};
use std::collections::HashMap;
use std::time::Duration;

pub fn test_zone() -> Zone {
    Zone {
        id: ZoneId::new("Z1234567890".to_string()),
        name: RecordName::new("test.example.com.").unwrap(),
    }
}

pub fn weighted_record(name: &str, set_id: &str, weight: i64, value: &str) -> WeightedRecord {
    WeightedRecord {
        name: RecordName::new(name).unwrap(),
        set_id: set_id.to_string(),
        weight,
        value: value.to_string(),
        ttl: 60,
    }
}

pub fn member(id: &str, in_service: bool) -> MemberHealth {
    MemberHealth {
        member: InstanceId::new(id.to_string()),
        state: if in_service {
            HealthState::InService
        } else {
            HealthState::Other("OutOfService".to_string())
        },
    }
}

pub fn resource(
    name: &str,
    dns_name: &str,
    vpc_id: Option<&str>,
    members: &[&str],
) -> ResourceDescription {
    ResourceDescription {
        name: name.to_string(),
        dns_name: dns_name.to_string(),
        vpc_id: vpc_id.map(str::to_string),
        subnets: vec!["subnet-1".to_string(), "subnet-2".to_string()],
        listeners: vec![metavasi::directory::Listener {
            protocol: "HTTP".to_string(),
            port: 80,
            member_protocol: Some("HTTP".to_string()),
            member_port: 8080,
            certificate: None,
        }],
        members: members
            .iter()
            .map(|id| InstanceId::new((*id).to_string()))
            .collect(),
        health_check: None,
        tags: HashMap::new(),
    }
}

/// Config matching the fixtures above, with zero-length sleeps so the
/// polling loops run instantly under test.
pub fn test_config() -> Config {
    let mut config = Config::template();
    config.bleed.interval = Duration::ZERO;
    config.readiness.interval = Duration::ZERO;
    config.convergence.interval = Duration::ZERO;
    config.networks = serde_yaml::from_str(
        r#"
staging:
  us-west-2:
    vpc-1: [sg-1, sg-2]
"#,
    )
    .unwrap();
    config
}
