// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fusion engine: per-message ingestion and per-response composition.
//!
//! Ingestion runs within one request-scoped unit of work. Tier writes
//! happen first and their errors propagate; the classifier and vector
//! index are reached only afterwards, under a deadline, and their
//! failures soft-fail by skipping the vector update. Cancellation at a
//! collaborator boundary therefore leaves no partial tier writes.

use std::sync::Arc;
use std::time::Duration;

use itinera_config::{ItineraConfig, MemoryConfig};
use itinera_core::types::{ClassifiedPhrase, MemoryVector, vector_id};
use itinera_core::{ClassifierAdapter, ItineraError, MemoryTier, VectorIndexAdapter};
use itinera_storage::TieredStorage;
use metrics::counter;
use tracing::{debug, warn};

use crate::bundle::ContextBundle;
use crate::classifier::HttpClassifier;
use crate::composer::ContextComposer;
use crate::embedder::HttpEmbedder;
use crate::extractor::extract_fields;
use crate::fields::{PreferenceField, SessionField};
use crate::index::VectorMemoryIndex;
use crate::merge::resolve;

/// Summary of one ingested message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestOutcome {
    /// Persistent fields written.
    pub preference_updates: usize,
    /// Temporary fields written.
    pub session_updates: usize,
    /// Vectors upserted into the memory index.
    pub vectors_stored: usize,
    /// True when the classifier or index soft-failed and the vector
    /// update was skipped or truncated.
    pub classifier_soft_failed: bool,
}

/// Orchestrates extraction, merging, classification, and composition.
pub struct FusionEngine {
    storage: Arc<TieredStorage>,
    classifier: Arc<dyn ClassifierAdapter>,
    index: Arc<dyn VectorIndexAdapter>,
    composer: ContextComposer,
    config: MemoryConfig,
}

impl FusionEngine {
    pub fn new(
        storage: Arc<TieredStorage>,
        classifier: Arc<dyn ClassifierAdapter>,
        index: Arc<dyn VectorIndexAdapter>,
        config: MemoryConfig,
    ) -> Self {
        let composer = ContextComposer::new(storage.clone(), index.clone(), config.retrieval_k);
        Self {
            storage,
            classifier,
            index,
            composer,
            config,
        }
    }

    /// Wire the engine from configuration with the shipped adapters:
    /// SQLite tiered storage, HTTP classifier and embedder, and the
    /// SQLite-backed vector index.
    pub fn from_config(config: &ItineraConfig) -> Result<Self, ItineraError> {
        let storage = Arc::new(TieredStorage::new(config.storage.clone()));
        let timeout = Duration::from_secs(config.memory.collaborator_timeout_secs);
        let classifier = Arc::new(HttpClassifier::from_config(&config.classifier, timeout)?);
        let embedder = Arc::new(HttpEmbedder::from_config(&config.embedding, timeout)?);
        let index = Arc::new(VectorMemoryIndex::new(
            storage.clone(),
            embedder,
            config.memory.embedding_dimensions,
        ));
        Ok(Self::new(storage, classifier, index, config.memory.clone()))
    }

    /// Process one inbound message: extract facts into both tiers, then
    /// classify and store memory vectors.
    pub async fn ingest(
        &self,
        user_id: &str,
        session_id: &str,
        message: &str,
    ) -> Result<IngestOutcome, ItineraError> {
        let mut outcome = IngestOutcome::default();
        if !self.config.enabled {
            return Ok(outcome);
        }

        for (field, raw_value) in extract_fields::<PreferenceField>(message) {
            let key = field.to_string();
            let existing = self.storage.get_persistent(user_id, &key).await?;
            let merged = resolve(field, existing.as_deref(), &raw_value);
            self.storage.put_persistent(user_id, &key, &merged).await?;
            counter!("itinera_preference_updates_total").increment(1);
            outcome.preference_updates += 1;
        }

        for (field, raw_value) in extract_fields::<SessionField>(message) {
            let key = field.to_string();
            let existing = self.storage.get_temporary(session_id, &key).await?;
            let merged = resolve(field, existing.as_deref(), &raw_value);
            self.storage.put_temporary(session_id, &key, &merged).await?;
            counter!("itinera_session_updates_total").increment(1);
            outcome.session_updates += 1;
        }

        let deadline = Duration::from_secs(self.config.collaborator_timeout_secs);
        let phrases = match tokio::time::timeout(deadline, self.classifier.classify(message)).await
        {
            Ok(Ok(phrases)) => phrases,
            Ok(Err(e)) => {
                warn!(error = %e, "classifier failed, skipping vector update");
                counter!("itinera_classifier_soft_fails_total").increment(1);
                outcome.classifier_soft_failed = true;
                Vec::new()
            }
            Err(_) => {
                warn!(timeout_secs = deadline.as_secs(), "classifier timed out");
                counter!("itinera_classifier_soft_fails_total").increment(1);
                outcome.classifier_soft_failed = true;
                Vec::new()
            }
        };

        let vectors = build_vectors(
            user_id,
            session_id,
            self.config.persistence_threshold,
            &phrases,
        );
        if !vectors.is_empty() {
            match tokio::time::timeout(deadline, self.index.upsert(&vectors)).await {
                Ok(Ok(stored)) => {
                    counter!("itinera_vectors_stored_total").increment(stored as u64);
                    outcome.vectors_stored = stored;
                }
                Ok(Err(e)) => {
                    warn!(error = %e, "vector upsert failed, skipping");
                    counter!("itinera_classifier_soft_fails_total").increment(1);
                    outcome.classifier_soft_failed = true;
                }
                Err(_) => {
                    warn!(timeout_secs = deadline.as_secs(), "vector upsert timed out");
                    counter!("itinera_classifier_soft_fails_total").increment(1);
                    outcome.classifier_soft_failed = true;
                }
            }
        }

        debug!(
            user_id,
            session_id,
            preference_updates = outcome.preference_updates,
            session_updates = outcome.session_updates,
            vectors_stored = outcome.vectors_stored,
            "message ingested"
        );
        Ok(outcome)
    }

    /// Compose the context bundle for one outbound response.
    pub async fn compose(
        &self,
        user_id: &str,
        session_id: &str,
        query_text: &str,
    ) -> Result<ContextBundle, ItineraError> {
        if !self.config.enabled {
            return Ok(ContextBundle::default());
        }
        self.composer.compose(user_id, session_id, query_text).await
    }
}

/// Tag phrases at the persistence threshold and address each with a
/// deterministic vector id, sequence-numbered across the whole message.
pub(crate) fn build_vectors(
    user_id: &str,
    session_id: &str,
    threshold: f64,
    phrases: &[ClassifiedPhrase],
) -> Vec<MemoryVector> {
    phrases
        .iter()
        .enumerate()
        .map(|(seq, p)| {
            let tier = if p.score >= threshold {
                MemoryTier::Persistent
            } else {
                MemoryTier::Temporary
            };
            MemoryVector {
                id: vector_id(user_id, session_id, tier, seq),
                user_id: user_id.to_string(),
                session_id: (tier == MemoryTier::Temporary).then(|| session_id.to_string()),
                tier,
                text: p.phrase.clone(),
                score: p.score,
                embedding: Vec::new(),
            }
        })
        .collect()
}
