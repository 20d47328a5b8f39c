// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end engine tests over a real on-disk SQLite database, with
//! in-process stand-ins for the classifier and embedding collaborators.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use itinera_config::{MemoryConfig, StorageConfig};
use itinera_core::types::{
    ClassifiedPhrase, EmbeddingInput, EmbeddingOutput, Session, User,
};
use itinera_core::{
    AdapterType, ClassifierAdapter, EmbeddingAdapter, HealthStatus, ItineraError, MemoryTier,
    PluginAdapter,
};
use itinera_memory::{FusionEngine, VectorMemoryIndex};
use itinera_storage::TieredStorage;
use tempfile::TempDir;

const DIMS: usize = 4;

/// Classifier stand-in returning a fixed phrase list.
struct StubClassifier {
    phrases: Vec<ClassifiedPhrase>,
}

#[async_trait]
impl PluginAdapter for StubClassifier {
    fn name(&self) -> &str {
        "stub-classifier"
    }
    fn version(&self) -> semver::Version {
        semver::Version::new(0, 0, 0)
    }
    fn adapter_type(&self) -> AdapterType {
        AdapterType::Classifier
    }
    async fn health_check(&self) -> Result<HealthStatus, ItineraError> {
        Ok(HealthStatus::Healthy)
    }
    async fn shutdown(&self) -> Result<(), ItineraError> {
        Ok(())
    }
}

#[async_trait]
impl ClassifierAdapter for StubClassifier {
    async fn classify(&self, _text: &str) -> Result<Vec<ClassifiedPhrase>, ItineraError> {
        Ok(self.phrases.clone())
    }
}

/// Classifier stand-in that always fails at the transport level.
struct FailingClassifier;

#[async_trait]
impl PluginAdapter for FailingClassifier {
    fn name(&self) -> &str {
        "failing-classifier"
    }
    fn version(&self) -> semver::Version {
        semver::Version::new(0, 0, 0)
    }
    fn adapter_type(&self) -> AdapterType {
        AdapterType::Classifier
    }
    async fn health_check(&self) -> Result<HealthStatus, ItineraError> {
        Ok(HealthStatus::Unhealthy("always fails".to_string()))
    }
    async fn shutdown(&self) -> Result<(), ItineraError> {
        Ok(())
    }
}

#[async_trait]
impl ClassifierAdapter for FailingClassifier {
    async fn classify(&self, _text: &str) -> Result<Vec<ClassifiedPhrase>, ItineraError> {
        Err(ItineraError::Classifier {
            message: "service unreachable".to_string(),
            source: None,
        })
    }
}

/// Deterministic in-process embedder: same text, same vector.
struct StubEmbedder;

fn embed_text(text: &str) -> Vec<f32> {
    let mut v = vec![0.0_f32; DIMS];
    for (i, b) in text.bytes().enumerate() {
        v[i % DIMS] += f32::from(b) / 255.0;
    }
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
    v.iter().map(|x| x / norm).collect()
}

#[async_trait]
impl PluginAdapter for StubEmbedder {
    fn name(&self) -> &str {
        "stub-embedder"
    }
    fn version(&self) -> semver::Version {
        semver::Version::new(0, 0, 0)
    }
    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }
    async fn health_check(&self) -> Result<HealthStatus, ItineraError> {
        Ok(HealthStatus::Healthy)
    }
    async fn shutdown(&self) -> Result<(), ItineraError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for StubEmbedder {
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, ItineraError> {
        Ok(EmbeddingOutput {
            embeddings: input.texts.iter().map(|t| embed_text(t)).collect(),
            dimensions: DIMS,
        })
    }
}

struct Harness {
    _dir: TempDir,
    storage: Arc<TieredStorage>,
    engine: FusionEngine,
}

async fn harness_with(classifier: Arc<dyn ClassifierAdapter>, config: MemoryConfig) -> Harness {
    harness_with_embedder(classifier, Arc::new(StubEmbedder), config).await
}

async fn harness_with_embedder(
    classifier: Arc<dyn ClassifierAdapter>,
    embedder: Arc<dyn EmbeddingAdapter>,
    config: MemoryConfig,
) -> Harness {
    let dir = TempDir::new().unwrap();
    let storage = Arc::new(TieredStorage::new(StorageConfig {
        database_path: dir
            .path()
            .join("engine-test.db")
            .to_string_lossy()
            .into_owned(),
        wal_mode: true,
    }));
    let index = Arc::new(VectorMemoryIndex::new(storage.clone(), embedder, DIMS));
    let engine = FusionEngine::new(storage.clone(), classifier, index, config);

    let user = User {
        id: "u1".to_string(),
        username: "traveller".to_string(),
        created_at: itinera_core::types::now_iso8601(),
    };
    storage.create_user(user).await.unwrap();
    storage
        .create_session(Session {
            id: "s1".to_string(),
            user_id: "u1".to_string(),
            created_at: itinera_core::types::now_iso8601(),
        })
        .await
        .unwrap();

    Harness {
        _dir: dir,
        storage,
        engine,
    }
}

fn scored_phrases() -> Vec<ClassifiedPhrase> {
    vec![
        ClassifiedPhrase {
            phrase: "I always travel vegetarian".to_string(),
            score: 0.9,
        },
        ClassifiedPhrase {
            phrase: "this trip has a $2000 budget".to_string(),
            score: 0.2,
        },
    ]
}

#[tokio::test]
async fn ingest_writes_both_tiers_and_stores_vectors() {
    let h = harness_with(
        Arc::new(StubClassifier {
            phrases: scored_phrases(),
        }),
        MemoryConfig::default(),
    )
    .await;

    let message = "I'm departing from Chicago, budget is $2000";
    let outcome = h.engine.ingest("u1", "s1", message).await.unwrap();

    // "budget" hits travel_style on the persistent table and max_budget
    // plus "departing from" on the session table.
    assert_eq!(outcome.preference_updates, 1);
    assert_eq!(outcome.session_updates, 2);
    assert_eq!(outcome.vectors_stored, 2);
    assert!(!outcome.classifier_soft_failed);

    assert_eq!(
        h.storage
            .get_persistent("u1", "travel_style")
            .await
            .unwrap()
            .as_deref(),
        Some(message)
    );
    assert_eq!(
        h.storage
            .get_temporary("s1", "trip_origin")
            .await
            .unwrap()
            .as_deref(),
        Some(message)
    );
    assert_eq!(
        h.storage
            .count_vectors("u1", MemoryTier::Persistent)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        h.storage
            .count_vectors("u1", MemoryTier::Temporary)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn ingest_outcome_counts_only_vectors_that_pass_the_dimension_check() {
    /// Embedder stand-in returning a wrong-length vector for every other
    /// text, as a misconfigured embedding service would.
    struct RaggedEmbedder;

    #[async_trait]
    impl PluginAdapter for RaggedEmbedder {
        fn name(&self) -> &str {
            "ragged-embedder"
        }
        fn version(&self) -> semver::Version {
            semver::Version::new(0, 0, 0)
        }
        fn adapter_type(&self) -> AdapterType {
            AdapterType::Embedding
        }
        async fn health_check(&self) -> Result<HealthStatus, ItineraError> {
            Ok(HealthStatus::Healthy)
        }
        async fn shutdown(&self) -> Result<(), ItineraError> {
            Ok(())
        }
    }

    #[async_trait]
    impl EmbeddingAdapter for RaggedEmbedder {
        async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, ItineraError> {
            Ok(EmbeddingOutput {
                embeddings: input
                    .texts
                    .iter()
                    .enumerate()
                    .map(|(i, t)| {
                        if i % 2 == 0 {
                            embed_text(t)
                        } else {
                            vec![0.5; DIMS + 1]
                        }
                    })
                    .collect(),
                dimensions: DIMS,
            })
        }
    }

    let h = harness_with_embedder(
        Arc::new(StubClassifier {
            phrases: scored_phrases(),
        }),
        Arc::new(RaggedEmbedder),
        MemoryConfig::default(),
    )
    .await;

    let outcome = h
        .engine
        .ingest("u1", "s1", "budget is $2000")
        .await
        .unwrap();

    // Two phrases were classified, but only the first embedding had the
    // expected dimensionality; the outcome reflects what was stored.
    assert_eq!(outcome.vectors_stored, 1);
    assert_eq!(
        h.storage
            .count_vectors("u1", MemoryTier::Persistent)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        h.storage
            .count_vectors("u1", MemoryTier::Temporary)
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn reingesting_the_same_message_does_not_duplicate() {
    let h = harness_with(
        Arc::new(StubClassifier {
            phrases: scored_phrases(),
        }),
        MemoryConfig::default(),
    )
    .await;

    let message = "I'm departing from Chicago, budget is $2000";
    h.engine.ingest("u1", "s1", message).await.unwrap();
    h.engine.ingest("u1", "s1", message).await.unwrap();

    assert_eq!(h.storage.list_persistent("u1").await.unwrap().len(), 1);
    assert_eq!(h.storage.list_temporary("s1").await.unwrap().len(), 2);
    assert_eq!(
        h.storage
            .count_vectors("u1", MemoryTier::Persistent)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn later_contradicting_statement_replaces_the_stored_fact() {
    let h = harness_with(
        Arc::new(StubClassifier {
            phrases: Vec::new(),
        }),
        MemoryConfig::default(),
    )
    .await;

    h.engine
        .ingest("u1", "s1", "I want a budget trip")
        .await
        .unwrap();
    h.engine
        .ingest("u1", "s1", "now I want luxury")
        .await
        .unwrap();

    assert_eq!(
        h.storage
            .get_persistent("u1", "travel_style")
            .await
            .unwrap()
            .as_deref(),
        Some("now I want luxury")
    );
}

#[tokio::test]
async fn classifier_failure_skips_vectors_but_keeps_tier_writes() {
    let h = harness_with(Arc::new(FailingClassifier), MemoryConfig::default()).await;

    let outcome = h
        .engine
        .ingest("u1", "s1", "I'm departing from Chicago, budget is $2000")
        .await
        .unwrap();

    assert!(outcome.classifier_soft_failed);
    assert_eq!(outcome.vectors_stored, 0);
    assert_eq!(outcome.session_updates, 2);
    assert!(
        h.storage
            .get_temporary("s1", "max_budget")
            .await
            .unwrap()
            .is_some()
    );
    assert_eq!(
        h.storage
            .count_vectors("u1", MemoryTier::Temporary)
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn classifier_timeout_is_a_soft_failure() {
    struct SlowClassifier;

    #[async_trait]
    impl PluginAdapter for SlowClassifier {
        fn name(&self) -> &str {
            "slow-classifier"
        }
        fn version(&self) -> semver::Version {
            semver::Version::new(0, 0, 0)
        }
        fn adapter_type(&self) -> AdapterType {
            AdapterType::Classifier
        }
        async fn health_check(&self) -> Result<HealthStatus, ItineraError> {
            Ok(HealthStatus::Healthy)
        }
        async fn shutdown(&self) -> Result<(), ItineraError> {
            Ok(())
        }
    }

    #[async_trait]
    impl ClassifierAdapter for SlowClassifier {
        async fn classify(&self, _text: &str) -> Result<Vec<ClassifiedPhrase>, ItineraError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Vec::new())
        }
    }

    let config = MemoryConfig {
        collaborator_timeout_secs: 1,
        ..MemoryConfig::default()
    };
    let h = harness_with(Arc::new(SlowClassifier), config).await;

    let outcome = h
        .engine
        .ingest("u1", "s1", "budget is $2000")
        .await
        .unwrap();
    assert!(outcome.classifier_soft_failed);
    assert_eq!(outcome.vectors_stored, 0);
}

#[tokio::test]
async fn compose_renders_all_three_sections() {
    let h = harness_with(
        Arc::new(StubClassifier {
            phrases: scored_phrases(),
        }),
        MemoryConfig::default(),
    )
    .await;

    h.engine
        .ingest("u1", "s1", "I'm departing from Chicago, budget is $2000")
        .await
        .unwrap();

    let bundle = h
        .engine
        .compose("u1", "s1", "what do you know about my trip?")
        .await
        .unwrap();
    let rendered = bundle.render();

    assert!(rendered.contains("--- Persistent Storage ---"));
    assert!(rendered.contains("travel_style: I'm departing from Chicago, budget is $2000"));
    assert!(rendered.contains("--- Temporary Storage ---"));
    assert!(rendered.contains("trip_origin:"));
    assert!(rendered.contains("--- Retrieved Memories ---"));
    assert!(rendered.contains("Memory 1:"));

    // Fixed section order.
    let persistent_at = rendered.find("--- Persistent Storage ---").unwrap();
    let temporary_at = rendered.find("--- Temporary Storage ---").unwrap();
    let retrieved_at = rendered.find("--- Retrieved Memories ---").unwrap();
    assert!(persistent_at < temporary_at && temporary_at < retrieved_at);
}

#[tokio::test]
async fn compose_for_unknown_scopes_renders_fallback() {
    let h = harness_with(
        Arc::new(StubClassifier {
            phrases: Vec::new(),
        }),
        MemoryConfig::default(),
    )
    .await;

    let bundle = h
        .engine
        .compose("nobody", "no-session", "anything stored?")
        .await
        .unwrap();
    assert!(bundle.is_empty());
    assert_eq!(bundle.render(), "No user context available.");
}

#[tokio::test]
async fn disabled_memory_short_circuits() {
    let config = MemoryConfig {
        enabled: false,
        ..MemoryConfig::default()
    };
    let h = harness_with(
        Arc::new(StubClassifier {
            phrases: scored_phrases(),
        }),
        config,
    )
    .await;

    let outcome = h
        .engine
        .ingest("u1", "s1", "budget is $2000")
        .await
        .unwrap();
    assert_eq!(outcome, itinera_memory::IngestOutcome::default());
    assert!(h.storage.list_persistent("u1").await.unwrap().is_empty());

    let bundle = h.engine.compose("u1", "s1", "anything?").await.unwrap();
    assert!(bundle.is_empty());
}

#[tokio::test]
async fn recall_prefers_session_scoped_memories() {
    // Store one persistent and two temporary vectors, then query with
    // k = 2: both temporary memories must win even if the persistent one
    // is more similar.
    let h = harness_with(
        Arc::new(StubClassifier {
            phrases: vec![
                ClassifiedPhrase {
                    phrase: "I always fly from Chicago".to_string(),
                    score: 0.9,
                },
                ClassifiedPhrase {
                    phrase: "this trip is to Rome".to_string(),
                    score: 0.1,
                },
                ClassifiedPhrase {
                    phrase: "hotel near the Colosseum".to_string(),
                    score: 0.2,
                },
            ],
        }),
        MemoryConfig {
            retrieval_k: 2,
            ..MemoryConfig::default()
        },
    )
    .await;

    h.engine
        .ingest("u1", "s1", "planning a trip")
        .await
        .unwrap();

    let bundle = h
        .engine
        .compose("u1", "s1", "I always fly from Chicago")
        .await
        .unwrap();
    let rendered = bundle.render();

    assert!(rendered.contains("--- Retrieved Memories ---"));
    assert!(rendered.contains("this trip is to Rome"));
    assert!(rendered.contains("hotel near the Colosseum"));
    assert!(
        !rendered.contains("I always fly from Chicago"),
        "persistent memory must be suppressed when k temporary matches exist, got:\n{rendered}"
    );
    assert!(!rendered.contains("Memory 3"));
}
