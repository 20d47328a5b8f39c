// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Async SQLite database handle.
//!
//! Wraps a [`tokio_rusqlite::Connection`] so blocking SQLite work runs on a
//! dedicated thread instead of a tokio worker. Migrations run on a short-lived
//! blocking connection before the async handle opens.

use std::path::Path;

use itinera_core::ItineraError;
use tokio_rusqlite::Connection;
use tracing::debug;

const PRAGMAS_WAL: &str = "PRAGMA journal_mode = WAL;\n\
     PRAGMA synchronous = NORMAL;\n\
     PRAGMA foreign_keys = ON;\n\
     PRAGMA busy_timeout = 5000;";

const PRAGMAS_PLAIN: &str = "PRAGMA foreign_keys = ON;\n\
     PRAGMA busy_timeout = 5000;";

/// Convert a `tokio_rusqlite::Error` into our storage error.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> ItineraError {
    ItineraError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the Itinera SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if necessary) the database at `path` and run migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, ItineraError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ItineraError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let pragmas = if wal_mode { PRAGMAS_WAL } else { PRAGMAS_PLAIN };

        // Migrations want an exclusive `&mut rusqlite::Connection`, so run them
        // on a blocking connection before the async handle opens.
        let migrate_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), ItineraError> {
            let mut conn =
                rusqlite::Connection::open(&migrate_path).map_err(|e| ItineraError::Storage {
                    source: Box::new(e),
                })?;
            conn.execute_batch(pragmas)
                .map_err(|e| ItineraError::Storage {
                    source: Box::new(e),
                })?;
            crate::migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| ItineraError::Internal(format!("migration task panicked: {e}")))??;

        // `Connection::open` surfaces the underlying `rusqlite::Error`.
        let conn = Connection::open(path.to_string())
            .await
            .map_err(|e| ItineraError::Storage {
                source: Box::new(e),
            })?;
        conn.call(move |conn| {
            conn.execute_batch(pragmas)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// Access the underlying async connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and flush before shutdown.
    pub async fn close(&self) -> Result<(), ItineraError> {
        self.conn
            .call(|conn| {
                // No-op when the database is not in WAL mode.
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("database checkpointed");
        Ok(())
    }
}
