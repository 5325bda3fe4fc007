// BSD 3-Clause License
// Copyright (c) 2026, Autumn Team
//
//! Operator tool: resolve the runtime configuration the same way the
//! server does at startup, validate it, and log a redacted summary.
//! Exits non-zero when resolution fails.
//!
//! Run with `RUST_LOG=autumn=debug` for the full field-by-field
//! summary; add `autumn_sensitive=debug` to see literal HTTPS PEM
//! material.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,autumn=debug")),
        )
        .init();

    info!(
        "autumn-config-check {} (built {}, {})",
        autumn::VERSION,
        autumn::BUILD_TIME,
        autumn::GIT_HASH
    );

    let config = autumn::Config::load()?;

    info!("configuration resolved");
    info!("mode: {}", config.mode);
    info!("listening on {}:{}", config.hostname, config.port);
    info!("data directory: {}", config.data_dir.display());
    info!(
        "https: {}",
        if config.https.is_some() {
            "enabled"
        } else {
            "disabled"
        }
    );
    info!(
        "openid: {}",
        if config.open_id.is_some() {
            "configured"
        } else {
            "not configured"
        }
    );

    Ok(())
}
