// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vector memory index over the tiered storage backing table.
//!
//! Upserts embed phrase texts and write rows keyed by deterministic id;
//! queries embed the query text, rank the candidate set by cosine
//! similarity in process, and apply the tier composition policy.

use std::sync::Arc;

use async_trait::async_trait;
use itinera_core::types::{
    EmbeddingInput, MemoryVector, RetrievedMemory, cosine_similarity,
};
use itinera_core::{
    AdapterType, EmbeddingAdapter, HealthStatus, ItineraError, MemoryTier, PluginAdapter,
    VectorIndexAdapter,
};
use itinera_storage::{CandidateVector, TieredStorage};
use tracing::{debug, warn};

/// Vector index storing embeddings in SQLite and scoring in process.
pub struct VectorMemoryIndex {
    storage: Arc<TieredStorage>,
    embedder: Arc<dyn EmbeddingAdapter>,
    /// Expected embedding dimensionality; vectors of other lengths are
    /// dropped before storage rather than written.
    dimensions: usize,
}

impl VectorMemoryIndex {
    pub fn new(
        storage: Arc<TieredStorage>,
        embedder: Arc<dyn EmbeddingAdapter>,
        dimensions: usize,
    ) -> Self {
        Self {
            storage,
            embedder,
            dimensions,
        }
    }
}

#[async_trait]
impl PluginAdapter for VectorMemoryIndex {
    fn name(&self) -> &str {
        "sqlite-vector-index"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::VectorIndex
    }

    async fn health_check(&self) -> Result<HealthStatus, ItineraError> {
        self.storage.health_check().await
    }

    async fn shutdown(&self) -> Result<(), ItineraError> {
        Ok(())
    }
}

#[async_trait]
impl VectorIndexAdapter for VectorMemoryIndex {
    async fn upsert(&self, vectors: &[MemoryVector]) -> Result<usize, ItineraError> {
        if vectors.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = vectors.iter().map(|v| v.text.clone()).collect();
        let output = self.embedder.embed(EmbeddingInput::passages(texts)).await?;

        if output.embeddings.len() != vectors.len() {
            return Err(ItineraError::VectorIndex {
                message: format!(
                    "embedding count mismatch: {} vectors, {} embeddings",
                    vectors.len(),
                    output.embeddings.len()
                ),
                source: None,
            });
        }

        let rows: Vec<MemoryVector> = vectors
            .iter()
            .zip(output.embeddings)
            .filter_map(|(v, embedding)| {
                if embedding.len() != self.dimensions {
                    warn!(
                        id = %v.id,
                        got = embedding.len(),
                        expected = self.dimensions,
                        "dropping vector with unexpected dimensions"
                    );
                    return None;
                }
                Some(MemoryVector {
                    embedding,
                    ..v.clone()
                })
            })
            .collect();

        let stored = rows.len();
        debug!(count = stored, "upserting memory vectors");
        self.storage.upsert_vectors(rows).await?;
        Ok(stored)
    }

    async fn query(
        &self,
        user_id: &str,
        session_id: &str,
        query_text: &str,
        k: usize,
    ) -> Result<Vec<RetrievedMemory>, ItineraError> {
        let output = self.embedder.embed(EmbeddingInput::query(query_text)).await?;
        let Some(query_embedding) = output.embeddings.into_iter().next() else {
            return Err(ItineraError::VectorIndex {
                message: "embedding service returned no vector for the query".to_string(),
                source: None,
            });
        };

        let candidates = self.storage.candidate_vectors(user_id, session_id).await?;
        let ranked = rank_candidates(candidates, &query_embedding, k * 2);

        let (temporary, persistent): (Vec<_>, Vec<_>) = ranked
            .into_iter()
            .partition(|m| m.tier == MemoryTier::Temporary);

        Ok(select_top_k(temporary, persistent, k))
    }
}

/// Rank candidates by cosine similarity, descending, keeping the `fetch`
/// best. Candidates whose embedding length does not match the query are
/// skipped rather than scored.
fn rank_candidates(
    candidates: Vec<CandidateVector>,
    query_embedding: &[f32],
    fetch: usize,
) -> Vec<RetrievedMemory> {
    let mut scored: Vec<(f32, RetrievedMemory)> = candidates
        .into_iter()
        .filter_map(|c| {
            if c.embedding.len() != query_embedding.len() {
                warn!(id = %c.id, "skipping vector with mismatched dimensions");
                return None;
            }
            let score = cosine_similarity(&c.embedding, query_embedding);
            Some((
                score,
                RetrievedMemory {
                    text: c.text,
                    tier: c.tier,
                },
            ))
        })
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().take(fetch).map(|(_, m)| m).collect()
}

/// Tier composition policy over ranked partitions.
///
/// Session-specific matches outrank raw similarity: when at least `k`
/// temporary matches exist, persistent matches are suppressed entirely.
/// Otherwise temporary matches come first, then persistent, truncated to
/// `k` total. Similarity order is preserved within each partition.
pub fn select_top_k(
    temporary: Vec<RetrievedMemory>,
    persistent: Vec<RetrievedMemory>,
    k: usize,
) -> Vec<RetrievedMemory> {
    if temporary.len() >= k {
        temporary.into_iter().take(k).collect()
    } else {
        temporary.into_iter().chain(persistent).take(k).collect()
    }
}
