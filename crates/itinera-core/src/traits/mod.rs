// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for Itinera collaborator seams.

pub mod adapter;
pub mod classifier;
pub mod embedding;
pub mod storage;
pub mod vector;

pub use adapter::PluginAdapter;
pub use classifier::ClassifierAdapter;
pub use embedding::EmbeddingAdapter;
pub use storage::StorageAdapter;
pub use vector::VectorIndexAdapter;
