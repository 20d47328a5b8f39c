// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vector memory index trait.

use async_trait::async_trait;

use crate::error::ItineraError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{MemoryVector, RetrievedMemory};

/// Adapter for the vector memory index.
///
/// Stores embeddings namespaced by owner, session, and tier, and answers
/// nearest-neighbor queries over the combined filter
/// `(persistent AND owner = user)` OR
/// `(temporary AND owner = user AND session = session)`.
/// Implementations embed `query_text` through the same embedding
/// collaborator used for stored phrases.
#[async_trait]
pub trait VectorIndexAdapter: PluginAdapter {
    /// Upserts vectors by their deterministic ids; existing ids are
    /// overwritten. Returns the number of vectors actually stored, which
    /// may be less than `vectors.len()` when the implementation rejects
    /// individual entries.
    async fn upsert(&self, vectors: &[MemoryVector]) -> Result<usize, ItineraError>;

    /// Returns up to `k` results for `query_text`, temporary matches first.
    async fn query(
        &self,
        user_id: &str,
        session_id: &str,
        query_text: &str,
        k: usize,
    ) -> Result<Vec<RetrievedMemory>, ItineraError>;
}
