// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session row queries.

use itinera_core::ItineraError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::Session;

/// Insert a new session.
pub async fn create_session(db: &Database, session: Session) -> Result<(), ItineraError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sessions (id, user_id, created_at) VALUES (?1, ?2, ?3)",
                params![session.id, session.user_id, session.created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch a session by id.
pub async fn get_session(
    db: &Database,
    session_id: &str,
) -> Result<Option<Session>, ItineraError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare("SELECT id, user_id, created_at FROM sessions WHERE id = ?1")?;
            let mut rows = stmt.query_map(params![session_id], |row| {
                Ok(Session {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    created_at: row.get(2)?,
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

/// List all sessions belonging to a user, most recent first.
pub async fn list_sessions_for_user(
    db: &Database,
    user_id: &str,
) -> Result<Vec<Session>, ItineraError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, created_at FROM sessions \
                 WHERE user_id = ?1 ORDER BY created_at DESC",
            )?;
            let rows = stmt.query_map(params![user_id], |row| {
                Ok(Session {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })?;
            let mut sessions = Vec::new();
            for row in rows {
                sessions.push(row?);
            }
            Ok(sessions)
        })
        .await
        .map_err(map_tr_err)
}
