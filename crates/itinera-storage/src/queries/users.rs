// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User row queries.

use itinera_core::ItineraError;
use rusqlite::params;

use crate::database::{Database, map_tr_err};
use crate::models::User;

/// Insert a new user. Fails if the id or username already exists.
pub async fn create_user(db: &Database, user: User) -> Result<(), ItineraError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (id, username, created_at) VALUES (?1, ?2, ?3)",
                params![user.id, user.username, user.created_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch a user by id.
pub async fn get_user(db: &Database, user_id: &str) -> Result<Option<User>, ItineraError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare("SELECT id, username, created_at FROM users WHERE id = ?1")?;
            let mut rows = stmt.query_map(params![user_id], |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
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

/// Fetch a user by username.
pub async fn get_user_by_username(
    db: &Database,
    username: &str,
) -> Result<Option<User>, ItineraError> {
    let username = username.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare("SELECT id, username, created_at FROM users WHERE username = ?1")?;
            let mut rows = stmt.query_map(params![username], |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
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
