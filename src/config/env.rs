// BSD 3-Clause License
// Copyright (c) 2026, Autumn Team
//! Environment snapshot helpers
//!
//! All lookups run against an immutable snapshot of the process
//! environment so the resolution core stays pure and testable. An
//! empty-string value counts as unset for override purposes.

use super::types::EnvMap;

/// Returns the value of `key` when it is set and non-empty.
pub fn env_set<'a>(env: &'a EnvMap, key: &str) -> Option<&'a str> {
    env.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

/// Parses `key` as `T`, silently skipping unset, empty, or unparseable
/// values. Overrides with multiple source variables take the first
/// value that parses.
pub fn env_parse<T: std::str::FromStr>(env: &EnvMap, key: &str) -> Option<T> {
    env_set(env, key).and_then(|v| v.parse().ok())
}

/// Splits a comma-separated override value into trimmed, non-empty
/// entries.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
