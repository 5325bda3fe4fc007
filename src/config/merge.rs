// BSD 3-Clause License
// Copyright (c) 2026, Autumn Team
//
//! Layer merger
//!
//! Pure reduction over the first two configuration layers: built-in
//! defaults overwritten by the optional JSON file, with the data
//! directory and its derived paths resolved along the way. The
//! environment layer is applied afterwards by the override resolver.

use std::path::{Path, PathBuf};

use super::env::env_set;
use super::types::{Config, EnvMap, FileConfig, Mode, Sources, UploadLimits};

impl Config {
    /// Built-in defaults, the lowest-priority layer.
    pub fn defaults(project_root: &Path) -> Config {
        Config {
            mode: Mode::Development,
            login_method: "password".to_string(),
            // assume local networks are trusted for header authentication
            trusted_proxies: [
                "10.0.0.0/8",
                "172.16.0.0/12",
                "192.168.0.0/16",
                "fc00::/7",
                "::1/128",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            port: 5006,
            hostname: "::".to_string(),
            web_root: project_root.join("web").join("build"),
            data_dir: project_root.to_path_buf(),
            server_files: project_root.join("server-files"),
            user_files: project_root.join("user-files"),
            upload: UploadLimits::default(),
            multiuser: false,
            token_expiration: "never".to_string(),
            https: None,
            open_id: None,
            project_root: project_root.to_path_buf(),
        }
    }
}

/// Data directory before any file-layer input: the conventional
/// platform directory when it exists, else the project root, with
/// `AUTUMN_DATA_DIR` taking precedence over both.
pub(super) fn default_data_dir(
    project_root: &Path,
    platform_data_dir: Option<&Path>,
    env: &EnvMap,
) -> PathBuf {
    match env_set(env, "AUTUMN_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => platform_data_dir.unwrap_or(project_root).to_path_buf(),
    }
}

/// Merges defaults and file config into the base configuration.
///
/// In test mode `mode`, `data_dir`, `server_files` and `user_files`
/// are pinned to project-root-relative values; the file may still
/// supply every other field but cannot override the pinned four.
///
/// Outside test mode the data directory resolves as platform default →
/// `AUTUMN_DATA_DIR` → (explicit config path only) the file's
/// `dataDir`, and `server-files`/`user-files` derive from that result.
/// On the conventional path a file `dataDir` replaces only the
/// `data_dir` field afterwards; the derived directories keep the
/// pre-file base unless the file sets them too.
pub fn merge_layers(sources: &Sources) -> Config {
    let mut config = Config::defaults(&sources.project_root);

    if !sources.is_test {
        let mut data_dir = default_data_dir(
            &sources.project_root,
            sources.platform_data_dir.as_deref(),
            &sources.env,
        );
        if sources.explicit_config_path {
            if let Some(dir) = sources.file.as_ref().and_then(|f| f.data_dir.clone()) {
                data_dir = dir;
            }
        }
        config.server_files = data_dir.join("server-files");
        config.user_files = data_dir.join("user-files");
        config.data_dir = data_dir;
    }

    apply_file(&mut config, sources.file.as_ref());

    if sources.is_test {
        config.mode = Mode::Test;
        config.data_dir = sources.project_root.clone();
        config.server_files = sources.project_root.join("test-server-files");
        config.user_files = sources.project_root.join("test-user-files");
    }

    config
}

/// Field-wise overwrite of the defaults by whatever the file supplies.
fn apply_file(config: &mut Config, file: Option<&FileConfig>) {
    let Some(file) = file else { return };

    if let Some(v) = &file.login_method {
        config.login_method = v.clone();
    }
    if let Some(v) = &file.trusted_proxies {
        config.trusted_proxies = v.clone();
    }
    if let Some(v) = file.port {
        config.port = v;
    }
    if let Some(v) = &file.hostname {
        config.hostname = v.clone();
    }
    if let Some(v) = &file.web_root {
        config.web_root = v.clone();
    }
    if let Some(v) = &file.data_dir {
        config.data_dir = v.clone();
    }
    if let Some(v) = &file.server_files {
        config.server_files = v.clone();
    }
    if let Some(v) = &file.user_files {
        config.user_files = v.clone();
    }
    if let Some(v) = file.upload {
        config.upload = v;
    }
    if let Some(v) = file.multiuser {
        config.multiuser = v;
    }
    if let Some(v) = &file.token_expiration {
        config.token_expiration = v.clone();
    }
    if let Some(v) = &file.https {
        config.https = Some(v.clone());
    }
    if let Some(v) = &file.open_id {
        config.open_id = Some(v.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources() -> Sources {
        Sources {
            env: EnvMap::new(),
            file: None,
            explicit_config_path: false,
            is_test: false,
            project_root: PathBuf::from("/srv/autumn"),
            platform_data_dir: None,
        }
    }

    #[test]
    fn defaults_apply_without_file_or_env() {
        let config = merge_layers(&sources());
        assert_eq!(config.mode, Mode::Development);
        assert_eq!(config.port, 5006);
        assert_eq!(config.hostname, "::");
        assert_eq!(config.login_method, "password");
        assert_eq!(config.token_expiration, "never");
        assert!(!config.multiuser);
        assert_eq!(config.data_dir, PathBuf::from("/srv/autumn"));
        assert_eq!(config.server_files, PathBuf::from("/srv/autumn/server-files"));
        assert_eq!(config.user_files, PathBuf::from("/srv/autumn/user-files"));
        assert_eq!(config.upload, UploadLimits::default());
        assert!(config.https.is_none());
        assert!(config.open_id.is_none());
    }

    #[test]
    fn platform_data_dir_wins_over_project_root() {
        let mut s = sources();
        s.platform_data_dir = Some(PathBuf::from("/data"));
        let config = merge_layers(&s);
        assert_eq!(config.data_dir, PathBuf::from("/data"));
        assert_eq!(config.server_files, PathBuf::from("/data/server-files"));
    }

    #[test]
    fn env_data_dir_wins_over_platform_default() {
        let mut s = sources();
        s.platform_data_dir = Some(PathBuf::from("/data"));
        s.env
            .insert("AUTUMN_DATA_DIR".to_string(), "/var/lib/autumn".to_string());
        let config = merge_layers(&s);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/autumn"));
        assert_eq!(
            config.user_files,
            PathBuf::from("/var/lib/autumn/user-files")
        );
    }

    #[test]
    fn conventional_file_data_dir_replaces_field_but_not_derived_dirs() {
        let mut s = sources();
        s.file = Some(FileConfig {
            data_dir: Some(PathBuf::from("/mnt/budget")),
            ..FileConfig::default()
        });
        let config = merge_layers(&s);
        assert_eq!(config.data_dir, PathBuf::from("/mnt/budget"));
        // derived from the pre-file base, the file only set dataDir
        assert_eq!(config.server_files, PathBuf::from("/srv/autumn/server-files"));
        assert_eq!(config.user_files, PathBuf::from("/srv/autumn/user-files"));
    }

    #[test]
    fn explicit_path_file_data_dir_feeds_derivation() {
        let mut s = sources();
        s.explicit_config_path = true;
        s.file = Some(FileConfig {
            data_dir: Some(PathBuf::from("/mnt/budget")),
            ..FileConfig::default()
        });
        let config = merge_layers(&s);
        assert_eq!(config.data_dir, PathBuf::from("/mnt/budget"));
        assert_eq!(config.server_files, PathBuf::from("/mnt/budget/server-files"));
        assert_eq!(config.user_files, PathBuf::from("/mnt/budget/user-files"));
    }

    #[test]
    fn file_overrides_scalar_fields() {
        let mut s = sources();
        s.file = Some(FileConfig {
            port: Some(8080),
            hostname: Some("0.0.0.0".to_string()),
            multiuser: Some(true),
            ..FileConfig::default()
        });
        let config = merge_layers(&s);
        assert_eq!(config.port, 8080);
        assert_eq!(config.hostname, "0.0.0.0");
        assert!(config.multiuser);
    }

    #[test]
    fn test_mode_pins_dirs_regardless_of_file_and_env() {
        let mut s = sources();
        s.is_test = true;
        s.platform_data_dir = Some(PathBuf::from("/data"));
        s.env
            .insert("AUTUMN_DATA_DIR".to_string(), "/elsewhere".to_string());
        s.file = Some(FileConfig {
            data_dir: Some(PathBuf::from("/mnt/budget")),
            server_files: Some(PathBuf::from("/mnt/budget/sf")),
            user_files: Some(PathBuf::from("/mnt/budget/uf")),
            ..FileConfig::default()
        });
        let config = merge_layers(&s);
        assert_eq!(config.mode, Mode::Test);
        assert_eq!(config.data_dir, PathBuf::from("/srv/autumn"));
        assert_eq!(
            config.server_files,
            PathBuf::from("/srv/autumn/test-server-files")
        );
        assert_eq!(
            config.user_files,
            PathBuf::from("/srv/autumn/test-user-files")
        );
    }

    #[test]
    fn test_mode_still_merges_other_file_fields() {
        let mut s = sources();
        s.is_test = true;
        s.file = Some(FileConfig {
            login_method: Some("openid".to_string()),
            port: Some(9000),
            ..FileConfig::default()
        });
        let config = merge_layers(&s);
        assert_eq!(config.login_method, "openid");
        assert_eq!(config.port, 9000);
        assert_eq!(config.mode, Mode::Test);
    }
}
