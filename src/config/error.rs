// BSD 3-Clause License
// Copyright (c) 2026, Autumn Team
//! Configuration error types

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unable to read config file '{}': {source}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file '{}' is not valid JSON: {source}", path.display())]
    FileMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{key} must be either \"true\" or \"false\", got '{value}'")]
    InvalidBooleanOverride { key: String, value: String },

    #[error("Missing required OpenID configuration: {}", missing.join(", "))]
    IncompleteOpenId { missing: Vec<String> },

    #[error("Invalid value for {key}: '{value}' - {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}
