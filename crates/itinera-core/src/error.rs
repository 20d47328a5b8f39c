// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Itinera fusion engine.

use thiserror::Error;

/// The primary error type used across all Itinera adapter traits and core operations.
///
/// Collaborator errors (classifier, embedding, vector index) are recoverable
/// by design: callers log them and degrade to an empty result rather than
/// aborting the surrounding request.
#[derive(Debug, Error)]
pub enum ItineraError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Persistence classifier errors (HTTP failure, malformed response).
    #[error("classifier error: {message}")]
    Classifier {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Embedding service errors (HTTP failure, dimension mismatch).
    #[error("embedding error: {message}")]
    Embedding {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Vector index errors (upsert or query failure).
    #[error("vector index error: {message}")]
    VectorIndex {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A collaborator call exceeded its deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
