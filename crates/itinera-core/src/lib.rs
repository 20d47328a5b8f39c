// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Itinera context & preference fusion engine.
//!
//! This crate provides the foundational trait definitions, error type, and
//! common domain types used throughout the Itinera workspace. External
//! collaborators (relational store, embedding service, persistence
//! classifier, vector search) are reached through the adapter traits
//! defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ItineraError;
pub use types::{AdapterType, HealthStatus, MemoryTier};

// Re-export all adapter traits at crate root.
pub use traits::{
    ClassifierAdapter, EmbeddingAdapter, PluginAdapter, StorageAdapter, VectorIndexAdapter,
};
