// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Itinera fusion engine.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides.

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    ClassifierConfig, EmbeddingConfig, ItineraConfig, MemoryConfig, StorageConfig,
};

use itinera_core::ItineraError;

/// Load configuration from the XDG hierarchy and validate it.
#[allow(clippy::result_large_err)]
pub fn load_and_validate() -> Result<ItineraConfig, ItineraError> {
    let config = loader::load_config()
        .map_err(|e| ItineraError::Config(e.to_string()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<ItineraConfig, ItineraError> {
    let config = loader::load_config_from_str(toml_content)
        .map_err(|e| ItineraError::Config(e.to_string()))?;
    validation::validate_config(&config)?;
    Ok(config)
}
