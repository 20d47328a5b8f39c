// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common domain types used across adapter traits and the fusion engine.

use serde::{Deserialize, Serialize};

/// Which tier a fact or vector belongs to.
///
/// Persistent facts are scoped to a user and survive across sessions;
/// temporary facts are scoped to a single session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryTier {
    /// Scoped to a user, survives across sessions.
    Persistent,
    /// Scoped to one session.
    Temporary,
}

impl MemoryTier {
    /// Convert to string for SQLite storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryTier::Persistent => "persistent",
            MemoryTier::Temporary => "temporary",
        }
    }

    /// Parse from SQLite string.
    pub fn from_str_value(s: &str) -> Self {
        match s {
            "persistent" => MemoryTier::Persistent,
            _ => MemoryTier::Temporary,
        }
    }
}

/// A phrase extracted by the persistence classifier with its score.
///
/// `score` is the classifier-assigned persistence score in `[0, 1]`:
/// 1 means the phrase should be remembered across all sessions, 0 means
/// it is only relevant to the current session. The upstream wire format
/// names this field `persistence`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClassifiedPhrase {
    /// The extracted phrase as a standalone statement.
    pub phrase: String,
    /// Persistence score in `[0, 1]`.
    #[serde(alias = "persistence")]
    pub score: f64,
}

/// A classified phrase embedded and addressed for the vector index.
///
/// Vector ids are deterministic: re-storing the same `(scope, sequence)`
/// overwrites the existing vector rather than duplicating it, which makes
/// ingestion idempotent on retry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryVector {
    /// Deterministic vector id (see [`vector_id`]).
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Owning session for temporary vectors; `None` for persistent vectors.
    pub session_id: Option<String>,
    /// Which tier this vector belongs to.
    pub tier: MemoryTier,
    /// The phrase text this vector embeds.
    pub text: String,
    /// Persistence score assigned by the classifier.
    pub score: f64,
    /// Embedding vector for semantic search.
    #[serde(skip)]
    pub embedding: Vec<f32>,
}

/// Build the deterministic id for a vector at `seq` within a message.
///
/// Persistent vectors are keyed by `(user, seq)`, temporary vectors by
/// `(user, session, seq)`.
pub fn vector_id(user_id: &str, session_id: &str, tier: MemoryTier, seq: usize) -> String {
    match tier {
        MemoryTier::Persistent => format!("{user_id}-persistent-{seq}"),
        MemoryTier::Temporary => format!("{user_id}-{session_id}-temp-{seq}"),
    }
}

/// A single result returned by a vector index query.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedMemory {
    /// The stored phrase text.
    pub text: String,
    /// Which tier the match came from.
    pub tier: MemoryTier,
}

/// Whether an embedding request is for stored passages or a search query.
///
/// Some embedding models produce asymmetric vectors; the service is told
/// which side of the search this text sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingKind {
    Passage,
    Query,
}

impl EmbeddingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingKind::Passage => "passage",
            EmbeddingKind::Query => "query",
        }
    }
}

/// Input for an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    pub texts: Vec<String>,
    pub kind: EmbeddingKind,
}

impl EmbeddingInput {
    /// Input for embedding stored phrases.
    pub fn passages(texts: Vec<String>) -> Self {
        Self {
            texts,
            kind: EmbeddingKind::Passage,
        }
    }

    /// Input for embedding a single search query.
    pub fn query(text: impl Into<String>) -> Self {
        Self {
            texts: vec![text.into()],
            kind: EmbeddingKind::Query,
        }
    }
}

/// Output from an embedding adapter.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    pub embeddings: Vec<Vec<f32>>,
    pub dimensions: usize,
}

/// Identifies the type of adapter behind a collaborator seam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdapterType {
    Storage,
    Embedding,
    Classifier,
    VectorIndex,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

// --- Canonical storage rows ---

/// Current UTC time as an ISO 8601 string with millisecond precision,
/// matching the format the database writes.
pub fn now_iso8601() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// A chat user, identity scope for persistent facts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

impl User {
    /// New user with a random id and the current timestamp.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.into(),
            created_at: now_iso8601(),
        }
    }
}

/// A conversation session, identity scope for temporary facts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}

impl Session {
    /// New session with a random id and the current timestamp.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            created_at: now_iso8601(),
        }
    }
}

/// A durable user fact: at most one row per `(user_id, field)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub user_id: String,
    pub field: String,
    pub value: String,
    /// ISO 8601 timestamp, refreshed on every upsert.
    pub updated_at: String,
}

/// A session-scoped fact: at most one row per `(session_id, field)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContextRecord {
    pub session_id: String,
    pub field: String,
    pub value: String,
    /// ISO 8601 timestamp, refreshed on every upsert.
    pub updated_at: String,
}

/// Convert f32 vector to bytes for SQLite BLOB storage.
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    vec.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert SQLite BLOB back to f32 vector.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes(chunk.try_into().unwrap()))
        .collect()
}

/// Compute cosine similarity between two vectors.
///
/// Inputs are not assumed L2-normalized. Zero-magnitude vectors have no
/// direction and score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "vectors must have same length");
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm = a.iter().map(|x| x * x).sum::<f32>().sqrt()
        * b.iter().map(|y| y * y).sum::<f32>().sqrt();
    if norm == 0.0 {
        return 0.0;
    }
    dot / norm
}
