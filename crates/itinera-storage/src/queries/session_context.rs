// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temporary-tier fact queries, one row per `(session_id, field)`.

use itinera_core::ItineraError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::SessionContextRecord;

/// Insert or overwrite the value for `(session_id, field)`.
pub async fn upsert_session_context(
    db: &Database,
    session_id: &str,
    field: &str,
    value: &str,
) -> Result<(), ItineraError> {
    let session_id = session_id.to_string();
    let field = field.to_string();
    let value = value.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO session_context (session_id, field, value, updated_at) \
                 VALUES (?1, ?2, ?3, strftime('%Y-%m-%dT%H:%M:%fZ', 'now')) \
                 ON CONFLICT(session_id, field) DO UPDATE SET \
                 value = excluded.value, updated_at = excluded.updated_at",
                params![session_id, field, value],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch the stored value for `(session_id, field)`, if any.
pub async fn get_session_context(
    db: &Database,
    session_id: &str,
    field: &str,
) -> Result<Option<SessionContextRecord>, ItineraError> {
    let session_id = session_id.to_string();
    let field = field.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT session_id, field, value, updated_at FROM session_context \
                 WHERE session_id = ?1 AND field = ?2",
            )?;
            let mut rows = stmt.query_map(params![session_id, field], |row| {
                Ok(SessionContextRecord {
                    session_id: row.get(0)?,
                    field: row.get(1)?,
                    value: row.get(2)?,
                    updated_at: row.get(3)?,
                })
            })?;
            match rows.next() {
                Some(row) => Ok(Some(row?)),
                None => Ok(None),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// List every stored fact for a session, ordered by field name for
/// deterministic composition.
pub async fn list_session_context(
    db: &Database,
    session_id: &str,
) -> Result<Vec<SessionContextRecord>, ItineraError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT session_id, field, value, updated_at FROM session_context \
                 WHERE session_id = ?1 ORDER BY field ASC",
            )?;
            let rows = stmt.query_map(params![session_id], |row| {
                Ok(SessionContextRecord {
                    session_id: row.get(0)?,
                    field: row.get(1)?,
                    value: row.get(2)?,
                    updated_at: row.get(3)?,
                })
            })?;
            let mut records = Vec::new();
            for row in rows {
                records.push(row?);
            }
            Ok(records)
        })
        .await
        .map_err(map_tr_err)
}
