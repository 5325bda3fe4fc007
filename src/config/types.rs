// BSD 3-Clause License
// Copyright (c) 2026, Autumn Team
//
//! Configuration type definitions
//! The resolved config plus the partial shapes the file and env layers feed in.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

/// Snapshot of the process environment, taken once at startup.
pub type EnvMap = BTreeMap<String, String>;

/// Fully resolved runtime configuration, immutable after `Config::load`.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub mode: Mode,
    pub login_method: String,
    pub trusted_proxies: Vec<String>,
    pub port: u16,
    pub hostname: String,
    pub web_root: PathBuf,
    pub data_dir: PathBuf,
    pub server_files: PathBuf,
    pub user_files: PathBuf,
    pub upload: UploadLimits,
    pub multiuser: bool,
    pub token_expiration: String,
    pub https: Option<HttpsConfig>,
    pub open_id: Option<OpenIdConfig>,
    pub project_root: PathBuf,
}

/// Run mode, only ever `test` or `development` at this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Test,
    Development,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "test" => Ok(Mode::Test),
            "development" | "dev" | "" => Ok(Mode::Development),
            _ => Err(format!("Unknown mode: {}", s)),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Test => write!(f, "test"),
            Mode::Development => write!(f, "development"),
        }
    }
}

/// HTTPS credential pair, PEM text. Present only when both halves are known.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct HttpsConfig {
    pub key: String,
    pub cert: String,
}

// Key and cert are secret material; Debug output stays redacted.
impl std::fmt::Debug for HttpsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpsConfig")
            .field("key", &"*".repeat(self.key.len()))
            .field("cert", &"*".repeat(self.cert.len()))
            .finish()
    }
}

/// Upload size limits in megabytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UploadLimits {
    #[serde(rename = "fileSizeSyncLimitMB")]
    pub file_size_sync_limit_mb: u32,
    #[serde(rename = "syncEncryptedFileSizeLimitMB")]
    pub sync_encrypted_file_size_limit_mb: u32,
    #[serde(rename = "fileSizeLimitMB")]
    pub file_size_limit_mb: u32,
}

impl Default for UploadLimits {
    fn default() -> Self {
        UploadLimits {
            file_size_sync_limit_mb: 20,
            sync_encrypted_file_size_limit_mb: 50,
            file_size_limit_mb: 20,
        }
    }
}

/// OpenID Connect descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OpenIdConfig {
    pub issuer: Issuer,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub server_hostname: Option<String>,
}

/// Identity provider location: a single discovery URL, or the three
/// endpoints spelled out. The JSON file format allows either shape for
/// the `issuer` key, hence the untagged representation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Issuer {
    Discovery(String),
    Endpoints {
        #[serde(default)]
        name: Option<String>,
        authorization_endpoint: String,
        token_endpoint: String,
        userinfo_endpoint: String,
    },
}

/// Partial configuration parsed from `config.json`. Every field is
/// optional and unknown keys are ignored; `mode` is not settable here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    #[serde(rename = "loginMethod")]
    pub login_method: Option<String>,
    #[serde(rename = "trustedProxies")]
    pub trusted_proxies: Option<Vec<String>>,
    pub port: Option<u16>,
    pub hostname: Option<String>,
    #[serde(rename = "webRoot")]
    pub web_root: Option<PathBuf>,
    #[serde(rename = "dataDir")]
    pub data_dir: Option<PathBuf>,
    #[serde(rename = "serverFiles")]
    pub server_files: Option<PathBuf>,
    #[serde(rename = "userFiles")]
    pub user_files: Option<PathBuf>,
    pub upload: Option<UploadLimits>,
    pub multiuser: Option<bool>,
    pub token_expiration: Option<String>,
    pub https: Option<HttpsConfig>,
    #[serde(rename = "openId")]
    pub open_id: Option<OpenIdConfig>,
}

/// Raw inputs to the resolution pipeline. The core never touches the
/// file system or the process environment; the loader fills this in.
#[derive(Debug, Clone)]
pub struct Sources {
    pub env: EnvMap,
    pub file: Option<FileConfig>,
    /// Whether the file came from an explicit `AUTUMN_CONFIG_PATH`.
    pub explicit_config_path: bool,
    pub is_test: bool,
    pub project_root: PathBuf,
    /// Conventional data directory (`/data`) when it exists on this host.
    pub platform_data_dir: Option<PathBuf>,
}
