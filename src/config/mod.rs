// ABOUTME: Configuration types and parsing for metavasi.yml.
// ABOUTME: Handles YAML parsing, defaults, and validation of cutover settings.

mod network;

pub use network::NetworkMap;

use crate::error::{Error, Result};
use crate::types::RecordName;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "metavasi.yml";
pub const CONFIG_FILENAME_ALT: &str = "metavasi.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".metavasi/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// DNS name of the hosted zone holding the alias.
    #[serde(deserialize_with = "deserialize_record_name")]
    pub zone: RecordName,

    /// The weighted alias being migrated.
    #[serde(deserialize_with = "deserialize_record_name")]
    pub alias: RecordName,

    pub environment: String,

    pub region: String,

    /// Suffix appended to the source resource name (and the blue record's
    /// set identifier) to name their green counterparts.
    #[serde(default = "default_replica_suffix")]
    pub replica_suffix: String,

    #[serde(default)]
    pub bleed: BleedConfig,

    #[serde(default)]
    pub readiness: ReadinessConfig,

    #[serde(default)]
    pub convergence: ConvergenceConfig,

    #[serde(default)]
    pub networks: NetworkMap,
}

/// Traffic-shift settings: how many percentage points move per step and
/// how long to pause between steps.
#[derive(Debug, Clone, Deserialize)]
pub struct BleedConfig {
    #[serde(default = "default_bleed_step")]
    pub step: i64,

    #[serde(default = "default_bleed_interval", with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for BleedConfig {
    fn default() -> Self {
        Self {
            step: default_bleed_step(),
            interval: default_bleed_interval(),
        }
    }
}

/// Replica readiness polling: how many health checks to issue and how long
/// to wait between them before giving up on the replica.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadinessConfig {
    #[serde(default = "default_readiness_tries")]
    pub max_tries: u32,

    #[serde(default = "default_readiness_interval", with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            max_tries: default_readiness_tries(),
            interval: default_readiness_interval(),
        }
    }
}

/// Change-convergence polling: interval between status queries and the
/// bound after which a still-pending change is treated as stuck.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvergenceConfig {
    #[serde(default = "default_convergence_interval", with = "humantime_serde")]
    pub interval: Duration,

    #[serde(default = "default_convergence_polls")]
    pub max_polls: u32,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            interval: default_convergence_interval(),
            max_polls: default_convergence_polls(),
        }
    }
}

fn default_replica_suffix() -> String {
    "-r".to_string()
}

fn default_bleed_step() -> i64 {
    20
}

fn default_bleed_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_readiness_tries() -> u32 {
    40
}

fn default_readiness_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_convergence_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_convergence_polls() -> u32 {
    120
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.bleed.step) {
            return Err(Error::InvalidConfig(format!(
                "bleed step must be between 1 and 100, got {}",
                self.bleed.step
            )));
        }
        if self.readiness.max_tries == 0 {
            return Err(Error::InvalidConfig(
                "readiness max_tries must be at least 1".to_string(),
            ));
        }
        if self.convergence.max_polls == 0 {
            return Err(Error::InvalidConfig(
                "convergence max_polls must be at least 1".to_string(),
            ));
        }
        if self.replica_suffix.is_empty() {
            return Err(Error::InvalidConfig(
                "replica_suffix cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn template() -> Self {
        Config {
            zone: RecordName::new("test.example.com.").unwrap(),
            alias: RecordName::new("app.test.example.com").unwrap(),
            environment: "staging".to_string(),
            region: "us-west-2".to_string(),
            replica_suffix: default_replica_suffix(),
            bleed: BleedConfig::default(),
            readiness: ReadinessConfig::default(),
            convergence: ConvergenceConfig::default(),
            networks: NetworkMap::default(),
        }
    }
}

pub fn init_config(dir: &Path, zone: Option<&str>, alias: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(z) = zone {
        config.zone = RecordName::new(z).map_err(|e| Error::InvalidConfig(e.to_string()))?;
    }

    if let Some(a) = alias {
        config.alias = RecordName::new(a).map_err(|e| Error::InvalidConfig(e.to_string()))?;
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    format!(
        r#"zone: {}
alias: {}
environment: {}
region: {}
bleed:
  step: {}
  interval: 5s
networks:
  {}:
    {}:
      vpc-00000000: [sg-00000000]
"#,
        config.zone,
        config.alias.trimmed(),
        config.environment,
        config.region,
        config.bleed.step,
        config.environment,
        config.region,
    )
}

// Custom deserializers

fn deserialize_record_name<'de, D>(deserializer: D) -> std::result::Result<RecordName, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    RecordName::new(&s).map_err(serde::de::Error::custom)
}
