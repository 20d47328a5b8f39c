// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The tiered storage gateway.
//!
//! [`TieredStorage`] is the single write/read path for both fact tiers and
//! the vector backing table. The database is opened lazily on first use so
//! the gateway can be constructed synchronously from config.

use async_trait::async_trait;
use itinera_config::StorageConfig;
use itinera_core::{
    AdapterType, HealthStatus, ItineraError, MemoryTier, PluginAdapter, StorageAdapter,
};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::database::{Database, map_tr_err};
use crate::models::{
    CandidateVector, MemoryVector, PreferenceRecord, Session, SessionContextRecord, User,
};
use crate::queries;

/// SQLite-backed storage gateway for both fact tiers.
pub struct TieredStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl TieredStorage {
    /// Create a gateway from config. No I/O happens until first use.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Get the database handle, opening it on first call.
    async fn db(&self) -> Result<&Database, ItineraError> {
        self.db
            .get_or_try_init(|| async {
                Database::open(&self.config.database_path, self.config.wal_mode).await
            })
            .await
    }

    // --- Identity scopes ---

    pub async fn create_user(&self, user: User) -> Result<(), ItineraError> {
        queries::users::create_user(self.db().await?, user).await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, ItineraError> {
        queries::users::get_user(self.db().await?, user_id).await
    }

    pub async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, ItineraError> {
        queries::users::get_user_by_username(self.db().await?, username).await
    }

    pub async fn create_session(&self, session: Session) -> Result<(), ItineraError> {
        queries::sessions::create_session(self.db().await?, session).await
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Option<Session>, ItineraError> {
        queries::sessions::get_session(self.db().await?, session_id).await
    }

    pub async fn list_sessions_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Session>, ItineraError> {
        queries::sessions::list_sessions_for_user(self.db().await?, user_id).await
    }

    // --- Tiered facts ---

    /// Write one persistent fact for a user. Put is an upsert; there is
    /// no delete.
    pub async fn put_persistent(
        &self,
        user_id: &str,
        field: &str,
        value: &str,
    ) -> Result<(), ItineraError> {
        queries::preferences::upsert_preference(self.db().await?, user_id, field, value).await
    }

    /// Read one persistent fact, if present.
    pub async fn get_persistent(
        &self,
        user_id: &str,
        field: &str,
    ) -> Result<Option<String>, ItineraError> {
        Ok(
            queries::preferences::get_preference(self.db().await?, user_id, field)
                .await?
                .map(|r| r.value),
        )
    }

    /// List all persistent facts for a user, ordered by field.
    pub async fn list_persistent(
        &self,
        user_id: &str,
    ) -> Result<Vec<PreferenceRecord>, ItineraError> {
        queries::preferences::list_preferences(self.db().await?, user_id).await
    }

    /// Write one temporary fact for a session. Put is an upsert; there is
    /// no delete.
    pub async fn put_temporary(
        &self,
        session_id: &str,
        field: &str,
        value: &str,
    ) -> Result<(), ItineraError> {
        queries::session_context::upsert_session_context(self.db().await?, session_id, field, value)
            .await
    }

    /// Read one temporary fact, if present.
    pub async fn get_temporary(
        &self,
        session_id: &str,
        field: &str,
    ) -> Result<Option<String>, ItineraError> {
        Ok(
            queries::session_context::get_session_context(self.db().await?, session_id, field)
                .await?
                .map(|r| r.value),
        )
    }

    /// List all temporary facts for a session, ordered by field.
    pub async fn list_temporary(
        &self,
        session_id: &str,
    ) -> Result<Vec<SessionContextRecord>, ItineraError> {
        queries::session_context::list_session_context(self.db().await?, session_id).await
    }

    // --- Vectors ---

    pub async fn upsert_vectors(&self, vectors: Vec<MemoryVector>) -> Result<(), ItineraError> {
        queries::vectors::upsert_vectors(self.db().await?, vectors).await
    }

    pub async fn candidate_vectors(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Vec<CandidateVector>, ItineraError> {
        queries::vectors::candidate_vectors(self.db().await?, user_id, session_id).await
    }

    pub async fn count_vectors(
        &self,
        user_id: &str,
        tier: MemoryTier,
    ) -> Result<u64, ItineraError> {
        queries::vectors::count_vectors(self.db().await?, user_id, tier).await
    }
}

#[async_trait]
impl PluginAdapter for TieredStorage {
    fn name(&self) -> &str {
        "sqlite-tiered-storage"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, ItineraError> {
        let db = match self.db().await {
            Ok(db) => db,
            Err(e) => {
                warn!(error = %e, "storage health check failed to open database");
                return Ok(HealthStatus::Unhealthy(e.to_string()));
            }
        };
        let result = db
            .connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err);
        match result {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), ItineraError> {
        self.close().await
    }
}

#[async_trait]
impl StorageAdapter for TieredStorage {
    async fn initialize(&self) -> Result<(), ItineraError> {
        self.db().await?;
        debug!("tiered storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), ItineraError> {
        if let Some(db) = self.db.get() {
            db.close().await?;
        }
        Ok(())
    }
}
