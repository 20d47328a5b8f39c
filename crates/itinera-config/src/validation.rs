// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation of configuration values.

use itinera_core::ItineraError;

use crate::model::ItineraConfig;

/// Validate value ranges that serde cannot express.
pub fn validate_config(config: &ItineraConfig) -> Result<(), ItineraError> {
    if !(0.0..=1.0).contains(&config.memory.persistence_threshold) {
        return Err(ItineraError::Config(format!(
            "memory.persistence_threshold must be within 0.0..=1.0, got {}",
            config.memory.persistence_threshold
        )));
    }

    if config.memory.retrieval_k == 0 {
        return Err(ItineraError::Config(
            "memory.retrieval_k must be at least 1".into(),
        ));
    }

    if config.memory.collaborator_timeout_secs == 0 {
        return Err(ItineraError::Config(
            "memory.collaborator_timeout_secs must be at least 1".into(),
        ));
    }

    if config.memory.embedding_dimensions == 0 {
        return Err(ItineraError::Config(
            "memory.embedding_dimensions must be at least 1".into(),
        ));
    }

    Ok(())
}
