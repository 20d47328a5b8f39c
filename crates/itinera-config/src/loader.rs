// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./itinera.toml` > `~/.config/itinera/itinera.toml`
//! > `/etc/itinera/itinera.toml` with environment variable overrides via
//! `ITINERA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ItineraConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/itinera/itinera.toml` (system-wide)
/// 3. `~/.config/itinera/itinera.toml` (user XDG config)
/// 4. `./itinera.toml` (local directory)
/// 5. `ITINERA_*` environment variables
pub fn load_config() -> Result<ItineraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ItineraConfig::default()))
        .merge(Toml::file("/etc/itinera/itinera.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("itinera/itinera.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("itinera.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<ItineraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ItineraConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ItineraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ItineraConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `ITINERA_MEMORY_PERSISTENCE_THRESHOLD`
/// must map to `memory.persistence_threshold`, not `memory.persistence.threshold`.
fn env_provider() -> Env {
    Env::prefixed("ITINERA_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: ITINERA_STORAGE_DATABASE_PATH -> "storage_database_path"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("storage_", "storage.", 1)
            .replacen("memory_", "memory.", 1)
            .replacen("classifier_", "classifier.", 1)
            .replacen("embedding_", "embedding.", 1);
        mapped.into()
    })
}
