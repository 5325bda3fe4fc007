// BSD 3-Clause License
// Copyright (c) 2026, Autumn Team
//! Configuration loading
//!
//! The I/O shell around the pure resolution core: takes the snapshot
//! of the process environment, locates and reads the JSON config file,
//! then runs the layer merger and override resolver. Executed exactly
//! once at process start; any failure here aborts startup.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::env::env_set;
use super::error::ConfigError;
use super::merge::{default_data_dir, merge_layers};
use super::overrides::apply_overrides;
use super::types::{Config, EnvMap, FileConfig, Mode, Sources};

/// Redacted configuration channel.
const TARGET: &str = "autumn::config";
/// Literal secret material only. An `EnvFilter` directive for `autumn`
/// does not match this target, so secrets stay dark unless an operator
/// opts in with `autumn_sensitive=debug`.
const TARGET_SENSITIVE: &str = "autumn_sensitive::config";

impl Config {
    /// Resolves the runtime configuration from the process environment
    /// and the conventional or explicitly named config file.
    pub fn load() -> Result<Config, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if e.not_found() {
                info!("No .env file found, using environment variables only");
            } else {
                warn!("Error loading .env file: {}", e);
            }
        }

        let env: EnvMap = env::vars().collect();
        let project_root = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        debug!(target: TARGET, "project root: '{}'", project_root.display());

        let platform_data_dir = Path::new("/data")
            .exists()
            .then(|| PathBuf::from("/data"));

        let sources = gather(env, project_root, platform_data_dir)?;
        let config = resolve(sources)?;
        log_summary(&config);
        Ok(config)
    }
}

/// Pure resolution pipeline over pre-gathered sources: layer merge,
/// environment overrides, cross-field validation. Never returns a
/// partially resolved configuration.
pub fn resolve(sources: Sources) -> Result<Config, ConfigError> {
    let base = merge_layers(&sources);
    let config = apply_overrides(base, &sources.env)?;
    config.validate()?;
    Ok(config)
}

/// Assembles the resolution inputs, reading the config file from the
/// explicit `AUTUMN_CONFIG_PATH` (any read failure is fatal) or from
/// the conventional locations (a missing file is fine, malformed JSON
/// never is).
fn gather(
    env: EnvMap,
    project_root: PathBuf,
    platform_data_dir: Option<PathBuf>,
) -> Result<Sources, ConfigError> {
    let is_test =
        env_set(&env, "AUTUMN_MODE").and_then(|v| v.parse::<Mode>().ok()) == Some(Mode::Test);

    let (file, explicit_config_path) = match env_set(&env, "AUTUMN_CONFIG_PATH") {
        Some(path) => {
            let path = PathBuf::from(path);
            debug!(
                target: TARGET,
                "loading config from AUTUMN_CONFIG_PATH: '{}'",
                path.display()
            );
            (read_config_file(&path, false)?, true)
        }
        None => {
            let data_dir = default_data_dir(&project_root, platform_data_dir.as_deref(), &env);
            let path = conventional_config_path(&project_root, &data_dir);
            debug!(
                target: TARGET,
                "loading config from default path: '{}'",
                path.display()
            );
            (read_config_file(&path, true)?, false)
        }
    };

    Ok(Sources {
        env,
        file,
        explicit_config_path,
        is_test,
        project_root,
        platform_data_dir,
    })
}

/// `<projectRoot>/config.json` when it exists, else
/// `<dataDir>/config.json`.
fn conventional_config_path(project_root: &Path, data_dir: &Path) -> PathBuf {
    let candidate = project_root.join("config.json");
    if candidate.exists() {
        candidate
    } else {
        data_dir.join("config.json")
    }
}

/// Reads and parses the JSON config file. With `allow_missing` a read
/// failure means "no file"; otherwise it is fatal. Malformed JSON is
/// fatal either way.
fn read_config_file(path: &Path, allow_missing: bool) -> Result<Option<FileConfig>, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(_) if allow_missing => {
            debug!(target: TARGET, "config file '{}' not found, ignoring", path.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(ConfigError::FileUnreadable {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let parsed = serde_json::from_str(&text).map_err(|source| ConfigError::FileMalformed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(parsed))
}

/// Debug summary of the resolved configuration. Secrets go to the
/// sensitive target only; the main target sees asterisks of matching
/// length.
fn log_summary(config: &Config) {
    debug!(target: TARGET, "using mode {}", config.mode);
    debug!(target: TARGET, "using port {}", config.port);
    debug!(target: TARGET, "using hostname {}", config.hostname);
    debug!(target: TARGET, "using data directory {}", config.data_dir.display());
    debug!(target: TARGET, "using server files directory {}", config.server_files.display());
    debug!(target: TARGET, "using user files directory {}", config.user_files.display());
    debug!(target: TARGET, "using web root directory {}", config.web_root.display());
    debug!(target: TARGET, "using login method {}", config.login_method);
    debug!(target: TARGET, "using trusted proxies {}", config.trusted_proxies.join(", "));

    if let Some(https) = &config.https {
        debug!(target: TARGET, "using https key: {}", "*".repeat(https.key.len()));
        debug!(target: TARGET_SENSITIVE, "using https key {}", https.key);
        debug!(target: TARGET, "using https cert: {}", "*".repeat(https.cert.len()));
        debug!(target: TARGET_SENSITIVE, "using https cert {}", https.cert);
    }

    debug!(target: TARGET, "using file sync limit {}mb", config.upload.file_size_sync_limit_mb);
    debug!(
        target: TARGET,
        "using sync encrypted file limit {}mb",
        config.upload.sync_encrypted_file_size_limit_mb
    );
    debug!(target: TARGET, "using file limit {}mb", config.upload.file_size_limit_mb);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> EnvMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_file_is_fatal_only_when_required() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        assert!(read_config_file(&path, true).unwrap().is_none());
        let err = read_config_file(&path, false).unwrap_err();
        assert!(matches!(err, ConfigError::FileUnreadable { .. }));
    }

    #[test]
    fn malformed_json_is_always_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{{ not json").unwrap();

        let err = read_config_file(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::FileMalformed { .. }));
    }

    #[test]
    fn file_parses_known_fields_and_ignores_unknown_ones() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "port": 8080,
                "loginMethod": "header",
                "dataDir": "/mnt/budget",
                "upload": { "fileSizeLimitMB": 30 },
                "someFutureKnob": true
            }"#,
        )
        .unwrap();

        let parsed = read_config_file(&path, false).unwrap().unwrap();
        assert_eq!(parsed.port, Some(8080));
        assert_eq!(parsed.login_method.as_deref(), Some("header"));
        assert_eq!(parsed.data_dir, Some(PathBuf::from("/mnt/budget")));
        let upload = parsed.upload.unwrap();
        assert_eq!(upload.file_size_limit_mb, 30);
        // absent sub-fields keep their defaults
        assert_eq!(upload.file_size_sync_limit_mb, 20);
    }

    #[test]
    fn issuer_accepts_both_json_shapes() {
        let discovery: FileConfig =
            serde_json::from_str(r#"{ "openId": { "issuer": "https://id.example" } }"#).unwrap();
        assert!(matches!(
            discovery.open_id.unwrap().issuer,
            super::super::types::Issuer::Discovery(_)
        ));

        let endpoints: FileConfig = serde_json::from_str(
            r#"{ "openId": { "issuer": {
                "name": "Example",
                "authorization_endpoint": "https://id.example/auth",
                "token_endpoint": "https://id.example/token",
                "userinfo_endpoint": "https://id.example/userinfo"
            }, "client_id": "autumn" } }"#,
        )
        .unwrap();
        let open_id = endpoints.open_id.unwrap();
        assert!(matches!(
            open_id.issuer,
            super::super::types::Issuer::Endpoints { .. }
        ));
        assert_eq!(open_id.client_id.as_deref(), Some("autumn"));
    }

    #[test]
    fn project_root_config_wins_over_data_dir_config() {
        let root = tempfile::tempdir().unwrap();
        let data = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("config.json"), "{}").unwrap();
        std::fs::write(data.path().join("config.json"), "{}").unwrap();

        let path = conventional_config_path(root.path(), data.path());
        assert_eq!(path, root.path().join("config.json"));
    }

    #[test]
    fn data_dir_config_used_when_project_root_has_none() {
        let root = tempfile::tempdir().unwrap();
        let data = tempfile::tempdir().unwrap();

        let path = conventional_config_path(root.path(), data.path());
        assert_eq!(path, data.path().join("config.json"));
    }

    #[test]
    fn resolve_runs_the_full_pipeline() {
        let mut e: BTreeMap<String, String> = env(&[
            ("AUTUMN_PORT", "7000"),
            ("AUTUMN_MULTIUSER", "true"),
        ]);
        e.insert("AUTUMN_DATA_DIR".to_string(), "/var/lib/autumn".to_string());
        let sources = Sources {
            env: e,
            file: Some(FileConfig {
                hostname: Some("0.0.0.0".to_string()),
                ..FileConfig::default()
            }),
            explicit_config_path: false,
            is_test: false,
            project_root: PathBuf::from("/srv/autumn"),
            platform_data_dir: None,
        };
        let config = resolve(sources).unwrap();
        assert_eq!(config.port, 7000);
        assert!(config.multiuser);
        assert_eq!(config.hostname, "0.0.0.0");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/autumn"));
        assert_eq!(
            config.server_files,
            PathBuf::from("/var/lib/autumn/server-files")
        );
    }
}
