// BSD 3-Clause License
// Copyright (c) 2026, Autumn Team
//
//! Autumn Configuration Module
//! Resolves the runtime configuration once at startup from three
//! layered sources in ascending priority: built-in defaults, an
//! optional JSON config file, and `AUTUMN_*` environment variables.

mod env;
mod error;
mod loader;
mod merge;
mod overrides;
mod types;
mod validation;

pub use error::ConfigError;
pub use loader::resolve;
pub use merge::merge_layers;
pub use overrides::apply_overrides;
pub use types::{
    Config, EnvMap, FileConfig, HttpsConfig, Issuer, Mode, OpenIdConfig, Sources, UploadLimits,
};
