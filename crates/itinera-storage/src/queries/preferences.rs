// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent-tier fact queries, one row per `(user_id, field)`.

use itinera_core::ItineraError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::PreferenceRecord;

/// Insert or overwrite the value for `(user_id, field)`.
///
/// Last write wins; `updated_at` is refreshed by the database.
pub async fn upsert_preference(
    db: &Database,
    user_id: &str,
    field: &str,
    value: &str,
) -> Result<(), ItineraError> {
    let user_id = user_id.to_string();
    let field = field.to_string();
    let value = value.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO preferences (user_id, field, value, updated_at) \
                 VALUES (?1, ?2, ?3, strftime('%Y-%m-%dT%H:%M:%fZ', 'now')) \
                 ON CONFLICT(user_id, field) DO UPDATE SET \
                 value = excluded.value, updated_at = excluded.updated_at",
                params![user_id, field, value],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch the stored value for `(user_id, field)`, if any.
pub async fn get_preference(
    db: &Database,
    user_id: &str,
    field: &str,
) -> Result<Option<PreferenceRecord>, ItineraError> {
    let user_id = user_id.to_string();
    let field = field.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, field, value, updated_at FROM preferences \
                 WHERE user_id = ?1 AND field = ?2",
            )?;
            let mut rows = stmt.query_map(params![user_id, field], |row| {
                Ok(PreferenceRecord {
                    user_id: row.get(0)?,
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

/// List every stored fact for a user, ordered by field name for
/// deterministic composition.
pub async fn list_preferences(
    db: &Database,
    user_id: &str,
) -> Result<Vec<PreferenceRecord>, ItineraError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT user_id, field, value, updated_at FROM preferences \
                 WHERE user_id = ?1 ORDER BY field ASC",
            )?;
            let rows = stmt.query_map(params![user_id], |row| {
                Ok(PreferenceRecord {
                    user_id: row.get(0)?,
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
