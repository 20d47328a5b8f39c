// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that all collaborator adapters implement.

use async_trait::async_trait;

use crate::error::ItineraError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for all Itinera collaborator adapters.
///
/// Every adapter (storage, embedding, classifier, vector index) implements
/// this trait, which provides identity, lifecycle, and health check
/// capabilities. Adapters are passed into the engine at construction time,
/// never held as global state.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the type of adapter (storage, embedding, etc.).
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, ItineraError>;

    /// Gracefully shuts down the adapter, releasing any held resources.
    async fn shutdown(&self) -> Result<(), ItineraError>;
}
