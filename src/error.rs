// ABOUTME: Application-wide error types for metavasi.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("hosted zone not found: {0}")]
    ZoneNotFound(String),

    #[error("record not found: {0}")]
    RecordNotFound(String),

    #[error("no load balancer found for record value: {0}")]
    BackendNotFound(String),

    #[error("aborted by operator")]
    Aborted,

    #[error("directory error: {0}")]
    Directory(String),

    #[error("cutover failed: {0}")]
    Cutover(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
