// BSD 3-Clause License
// Copyright (c) 2026, Autumn Team
//
//! Override resolver
//!
//! Applies the environment layer on top of the merged base
//! configuration. Scalar rules live in a fixed table and run in
//! declaration order; the three compound fields (HTTPS, upload limits,
//! OpenID) replace their sub-object as a whole when triggered. Every
//! rule is idempotent and an unset or empty variable leaves the base
//! value untouched.

use std::path::PathBuf;

use super::env::{env_parse, env_set, split_list};
use super::error::ConfigError;
use super::types::{Config, EnvMap, HttpsConfig, Issuer, OpenIdConfig, UploadLimits};

/// A recognized scalar variable bound to its target-field transform.
struct ScalarRule {
    key: &'static str,
    apply: fn(&mut Config, &str) -> Result<(), ConfigError>,
}

const SCALAR_RULES: &[ScalarRule] = &[
    ScalarRule {
        key: "AUTUMN_LOGIN_METHOD",
        apply: set_login_method,
    },
    ScalarRule {
        key: "AUTUMN_MULTIUSER",
        apply: set_multiuser,
    },
    ScalarRule {
        key: "AUTUMN_TRUSTED_PROXIES",
        apply: set_trusted_proxies,
    },
    ScalarRule {
        key: "AUTUMN_HOSTNAME",
        apply: set_hostname,
    },
    ScalarRule {
        key: "AUTUMN_SERVER_FILES",
        apply: set_server_files,
    },
    ScalarRule {
        key: "AUTUMN_USER_FILES",
        apply: set_user_files,
    },
    ScalarRule {
        key: "AUTUMN_WEB_ROOT",
        apply: set_web_root,
    },
    ScalarRule {
        key: "AUTUMN_TOKEN_EXPIRATION",
        apply: set_token_expiration,
    },
];

fn set_login_method(config: &mut Config, value: &str) -> Result<(), ConfigError> {
    config.login_method = value.to_lowercase();
    Ok(())
}

fn set_multiuser(config: &mut Config, value: &str) -> Result<(), ConfigError> {
    match value.to_lowercase().as_str() {
        "true" => config.multiuser = true,
        "false" => config.multiuser = false,
        _ => {
            return Err(ConfigError::InvalidBooleanOverride {
                key: "AUTUMN_MULTIUSER".to_string(),
                value: value.to_string(),
            })
        }
    }
    Ok(())
}

fn set_trusted_proxies(config: &mut Config, value: &str) -> Result<(), ConfigError> {
    config.trusted_proxies = split_list(value);
    Ok(())
}

fn set_hostname(config: &mut Config, value: &str) -> Result<(), ConfigError> {
    config.hostname = value.to_string();
    Ok(())
}

fn set_server_files(config: &mut Config, value: &str) -> Result<(), ConfigError> {
    config.server_files = PathBuf::from(value);
    Ok(())
}

fn set_user_files(config: &mut Config, value: &str) -> Result<(), ConfigError> {
    config.user_files = PathBuf::from(value);
    Ok(())
}

fn set_web_root(config: &mut Config, value: &str) -> Result<(), ConfigError> {
    config.web_root = PathBuf::from(value);
    Ok(())
}

fn set_token_expiration(config: &mut Config, value: &str) -> Result<(), ConfigError> {
    config.token_expiration = value.to_string();
    Ok(())
}

/// Applies every environment override to `base`. Pure: the env snapshot
/// is the only input besides the base value, and on success no field is
/// left partially updated.
pub fn apply_overrides(base: Config, env: &EnvMap) -> Result<Config, ConfigError> {
    let mut config = base;

    for rule in SCALAR_RULES {
        if let Some(value) = env_set(env, rule.key) {
            (rule.apply)(&mut config, value)?;
        }
    }

    // More specific variable first, first value that parses wins.
    if let Some(port) = env_parse::<u16>(env, "AUTUMN_PORT").or_else(|| env_parse(env, "PORT")) {
        config.port = port;
    }

    config.https = resolve_https(config.https.take(), env);
    config.upload = resolve_upload(config.upload, env);
    config.open_id = resolve_open_id(config.open_id.take(), env)?;

    Ok(config)
}

/// Environment variables are single-line; PEM content needs real
/// newlines, so literal `\n` sequences are unescaped before storage.
fn unescape_newlines(value: &str) -> String {
    value.replace("\\n", "\n")
}

/// HTTPS credentials replace as a pair and only when both variables are
/// set. One variable alone narrows to the base value rather than
/// erroring.
fn resolve_https(base: Option<HttpsConfig>, env: &EnvMap) -> Option<HttpsConfig> {
    match (
        env_set(env, "AUTUMN_HTTPS_KEY"),
        env_set(env, "AUTUMN_HTTPS_CERT"),
    ) {
        (Some(key), Some(cert)) => Some(HttpsConfig {
            key: unescape_newlines(key),
            cert: unescape_newlines(cert),
        }),
        _ => base,
    }
}

/// Upload limits replace as a whole when any of the three variables is
/// set. The sync and encrypted fields fall back to the combined
/// file-size limit before keeping the base value.
fn resolve_upload(base: UploadLimits, env: &EnvMap) -> UploadLimits {
    let triggered = env_set(env, "AUTUMN_UPLOAD_FILE_SYNC_SIZE_LIMIT_MB").is_some()
        || env_set(env, "AUTUMN_UPLOAD_SYNC_ENCRYPTED_FILE_SYNC_SIZE_LIMIT_MB").is_some()
        || env_set(env, "AUTUMN_UPLOAD_FILE_SIZE_LIMIT_MB").is_some();
    if !triggered {
        return base;
    }

    let sync = env_parse::<u32>(env, "AUTUMN_UPLOAD_FILE_SYNC_SIZE_LIMIT_MB");
    let encrypted = env_parse::<u32>(env, "AUTUMN_UPLOAD_SYNC_ENCRYPTED_FILE_SYNC_SIZE_LIMIT_MB");
    let combined = env_parse::<u32>(env, "AUTUMN_UPLOAD_FILE_SIZE_LIMIT_MB");

    UploadLimits {
        file_size_sync_limit_mb: sync.or(combined).unwrap_or(base.file_size_sync_limit_mb),
        sync_encrypted_file_size_limit_mb: encrypted
            .or(combined)
            .unwrap_or(base.sync_encrypted_file_size_limit_mb),
        file_size_limit_mb: combined.unwrap_or(base.file_size_limit_mb),
    }
}

/// OpenID triggers on the discovery URL or the authorization endpoint.
/// Discovery mode needs nothing else; explicit-endpoint mode requires
/// all three endpoints and fails naming the missing variables.
/// client_id, client_secret and server_hostname override individually
/// and otherwise inherit from the base descriptor.
fn resolve_open_id(
    base: Option<OpenIdConfig>,
    env: &EnvMap,
) -> Result<Option<OpenIdConfig>, ConfigError> {
    let discovery = env_set(env, "AUTUMN_OPENID_DISCOVERY_URL");
    let authorization = env_set(env, "AUTUMN_OPENID_AUTHORIZATION_ENDPOINT");

    let issuer = match (discovery, authorization) {
        (None, None) => return Ok(base),
        (Some(url), _) => Issuer::Discovery(url.to_string()),
        (None, Some(authorization)) => {
            let token = env_set(env, "AUTUMN_OPENID_TOKEN_ENDPOINT");
            let userinfo = env_set(env, "AUTUMN_OPENID_USERINFO_ENDPOINT");
            let (Some(token), Some(userinfo)) = (token, userinfo) else {
                let mut missing = Vec::new();
                if token.is_none() {
                    missing.push("AUTUMN_OPENID_TOKEN_ENDPOINT".to_string());
                }
                if userinfo.is_none() {
                    missing.push("AUTUMN_OPENID_USERINFO_ENDPOINT".to_string());
                }
                return Err(ConfigError::IncompleteOpenId { missing });
            };
            Issuer::Endpoints {
                name: env_set(env, "AUTUMN_OPENID_PROVIDER_NAME").map(str::to_string),
                authorization_endpoint: authorization.to_string(),
                token_endpoint: token.to_string(),
                userinfo_endpoint: userinfo.to_string(),
            }
        }
    };

    Ok(Some(OpenIdConfig {
        issuer,
        client_id: env_set(env, "AUTUMN_OPENID_CLIENT_ID")
            .map(str::to_string)
            .or_else(|| base.as_ref().and_then(|b| b.client_id.clone())),
        client_secret: env_set(env, "AUTUMN_OPENID_CLIENT_SECRET")
            .map(str::to_string)
            .or_else(|| base.as_ref().and_then(|b| b.client_secret.clone())),
        server_hostname: env_set(env, "AUTUMN_OPENID_SERVER_HOSTNAME")
            .map(str::to_string)
            .or_else(|| base.as_ref().and_then(|b| b.server_hostname.clone())),
    }))
}
