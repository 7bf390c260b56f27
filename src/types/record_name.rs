// ABOUTME: Validated DNS record name, normalized to its fully-qualified form.
// ABOUTME: Names are stored with a trailing dot, the way the directory returns them.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordNameError {
    #[error("record name cannot be empty")]
    Empty,

    #[error("record name exceeds maximum length of 253 characters")]
    TooLong,

    #[error("record name contains an empty label")]
    EmptyLabel,

    #[error("record name label exceeds 63 characters: '{0}'")]
    LabelTooLong(String),

    #[error("record name label cannot start or end with a hyphen: '{0}'")]
    HyphenAtLabelEdge(String),

    #[error("invalid character in record name: '{0}'")]
    InvalidChar(char),
}

/// A DNS record or zone name, e.g. `app.test.example.com.`.
///
/// DNS names compare case-insensitively, so input is folded to lowercase.
/// The trailing dot is appended if missing so that equality against
/// directory-returned names (which always carry it) just works.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordName(String);

impl RecordName {
    pub fn new(value: &str) -> Result<Self, RecordNameError> {
        let trimmed = value.strip_suffix('.').unwrap_or(value);

        if trimmed.is_empty() {
            return Err(RecordNameError::Empty);
        }

        if trimmed.len() > 253 {
            return Err(RecordNameError::TooLong);
        }

        let folded = trimmed.to_ascii_lowercase();

        for label in folded.split('.') {
            if label.is_empty() {
                return Err(RecordNameError::EmptyLabel);
            }
            if label.len() > 63 {
                return Err(RecordNameError::LabelTooLong(label.to_string()));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(RecordNameError::HyphenAtLabelEdge(label.to_string()));
            }
            for c in label.chars() {
                if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' && c != '_' {
                    return Err(RecordNameError::InvalidChar(c));
                }
            }
        }

        Ok(Self(format!("{folded}.")))
    }

    /// The fully-qualified name, trailing dot included.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name without its trailing dot, for display surfaces that
    /// expect the relative form.
    pub fn trimmed(&self) -> &str {
        self.0.strip_suffix('.').unwrap_or(&self.0)
    }
}

impl fmt::Display for RecordName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
