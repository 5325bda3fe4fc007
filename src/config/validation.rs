// BSD 3-Clause License
// Copyright (c) 2026, Autumn Team
//
//! Configuration validation

use super::error::ConfigError;
use super::types::{Config, Issuer};

impl Config {
    /// Cross-field invariants checked once after resolution.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                key: "port".to_string(),
                value: "0".to_string(),
                reason: "Port cannot be 0".to_string(),
            });
        }

        // Env-sourced pairs cannot trigger with empty values; this
        // catches blank PEM text coming from the file layer.
        if let Some(https) = &self.https {
            if https.key.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "https.key".to_string(),
                    value: String::new(),
                    reason: "HTTPS key must be non-empty PEM text".to_string(),
                });
            }
            if https.cert.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "https.cert".to_string(),
                    value: String::new(),
                    reason: "HTTPS cert must be non-empty PEM text".to_string(),
                });
            }
        }

        if let Some(open_id) = &self.open_id {
            if let Issuer::Endpoints {
                authorization_endpoint,
                token_endpoint,
                userinfo_endpoint,
                ..
            } = &open_id.issuer
            {
                for (key, value) in [
                    ("openId.issuer.authorization_endpoint", authorization_endpoint),
                    ("openId.issuer.token_endpoint", token_endpoint),
                    ("openId.issuer.userinfo_endpoint", userinfo_endpoint),
                ] {
                    if value.trim().is_empty() {
                        return Err(ConfigError::InvalidValue {
                            key: key.to_string(),
                            value: String::new(),
                            reason: "OpenID endpoint URL must be non-empty".to_string(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
