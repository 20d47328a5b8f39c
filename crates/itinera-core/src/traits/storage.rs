// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persistence backends.

use async_trait::async_trait;

use crate::error::ItineraError;
use crate::traits::adapter::PluginAdapter;

/// Adapter lifecycle for storage and persistence backends.
///
/// Storage adapters manage database connections and provide the tiered
/// key-value foundation for user preferences and session context.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), ItineraError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), ItineraError>;
}
