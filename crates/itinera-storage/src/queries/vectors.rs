// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory vector queries.
//!
//! Embeddings are stored as little-endian f32 BLOBs; similarity scoring
//! happens in process after candidates are loaded.

use itinera_core::{ItineraError, MemoryTier, types};
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::{CandidateVector, MemoryVector};

/// Insert or overwrite a batch of vectors in one transaction.
///
/// Ids are deterministic per `(scope, sequence)`, so replaying the same
/// message overwrites instead of duplicating.
pub async fn upsert_vectors(db: &Database, vectors: Vec<MemoryVector>) -> Result<(), ItineraError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            for v in &vectors {
                tx.execute(
                    "INSERT OR REPLACE INTO memory_vectors \
                     (id, user_id, session_id, tier, content, score, embedding, updated_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))",
                    params![
                        v.id,
                        v.user_id,
                        v.session_id,
                        v.tier.as_str(),
                        v.text,
                        v.score,
                        types::vec_to_blob(&v.embedding),
                    ],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Load the candidate set for a query: all persistent vectors of the user
/// plus all temporary vectors of the given session.
pub async fn candidate_vectors(
    db: &Database,
    user_id: &str,
    session_id: &str,
) -> Result<Vec<CandidateVector>, ItineraError> {
    let user_id = user_id.to_string();
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, tier, content, embedding FROM memory_vectors \
                 WHERE (tier = 'persistent' AND user_id = ?1) \
                    OR (tier = 'temporary' AND user_id = ?1 AND session_id = ?2)",
            )?;
            let rows = stmt.query_map(params![user_id, session_id], |row| {
                let tier: String = row.get(1)?;
                let blob: Vec<u8> = row.get(3)?;
                Ok(CandidateVector {
                    id: row.get(0)?,
                    tier: MemoryTier::from_str_value(&tier),
                    text: row.get(2)?,
                    embedding: types::blob_to_vec(&blob),
                })
            })?;
            let mut candidates = Vec::new();
            for row in rows {
                candidates.push(row?);
            }
            Ok(candidates)
        })
        .await
        .map_err(map_tr_err)
}

/// Count stored vectors for a user, split by tier. Used by health checks
/// and tests.
pub async fn count_vectors(
    db: &Database,
    user_id: &str,
    tier: MemoryTier,
) -> Result<u64, ItineraError> {
    let user_id = user_id.to_string();
    let tier = tier.as_str();
    db.connection()
        .call(move |conn| {
            let count: u64 = conn.query_row(
                "SELECT COUNT(*) FROM memory_vectors WHERE user_id = ?1 AND tier = ?2",
                params![user_id, tier],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(map_tr_err)
}
