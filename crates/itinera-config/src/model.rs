// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Itinera fusion engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Itinera configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ItineraConfig {
    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Memory fusion engine settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Persistence classifier service settings.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Embedding service settings.
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("itinera").join("itinera.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("itinera.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Memory fusion engine configuration.
///
/// Controls persistence tagging, retrieval fan-out, and collaborator
/// deadlines.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Enable the memory system. When false, no memory operations occur.
    #[serde(default = "default_memory_enabled")]
    pub enabled: bool,

    /// Classifier score at or above which a phrase is tagged persistent.
    #[serde(default = "default_persistence_threshold")]
    pub persistence_threshold: f64,

    /// Number of retrieved-memory results included in a context bundle.
    #[serde(default = "default_retrieval_k")]
    pub retrieval_k: usize,

    /// Deadline in seconds for classifier and embedding collaborator calls.
    /// Calls exceeding it are treated as soft failures (vector update skipped).
    #[serde(default = "default_collaborator_timeout_secs")]
    pub collaborator_timeout_secs: u64,

    /// Expected embedding dimensionality; vectors of other lengths are ignored.
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_memory_enabled(),
            persistence_threshold: default_persistence_threshold(),
            retrieval_k: default_retrieval_k(),
            collaborator_timeout_secs: default_collaborator_timeout_secs(),
            embedding_dimensions: default_embedding_dimensions(),
        }
    }
}

fn default_memory_enabled() -> bool {
    true
}

fn default_persistence_threshold() -> f64 {
    0.7
}

fn default_retrieval_k() -> usize {
    3
}

fn default_collaborator_timeout_secs() -> u64 {
    15
}

fn default_embedding_dimensions() -> usize {
    1024
}

/// Persistence classifier service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Classifier endpoint URL. `None` disables classification (and with
    /// it all vector updates).
    #[serde(default)]
    pub endpoint: Option<String>,

    /// API key sent as a bearer token. `None` sends no Authorization header.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier forwarded to the classifier service.
    #[serde(default = "default_classifier_model")]
    pub model: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            model: default_classifier_model(),
        }
    }
}

fn default_classifier_model() -> String {
    "gpt-4".to_string()
}

/// Embedding service configuration.
///
/// The same model must be used for stored phrases and queries; it is
/// therefore part of static configuration, not a per-call parameter.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingConfig {
    /// Embedding endpoint URL. `None` disables semantic recall.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// API key sent as a bearer token. `None` sends no Authorization header.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Embedding model identifier.
    #[serde(default = "default_embedding_model")]
    pub model: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            model: default_embedding_model(),
        }
    }
}

fn default_embedding_model() -> String {
    "llama-text-embed-v2".to_string()
}
