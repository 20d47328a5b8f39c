// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory fusion for the Itinera engine.
//!
//! Turns inbound chat messages into tiered facts and memory vectors, and
//! composes a ranked context bundle for each outbound response:
//!
//! - [`extractor`] scans messages against per-tier keyword tables.
//! - [`merge`] resolves candidate facts against stored values.
//! - [`classifier`] / [`embedder`] reach the external scoring and
//!   embedding services.
//! - [`index`] stores and recalls memory vectors.
//! - [`composer`] assembles the context bundle.
//! - [`engine`] orchestrates the whole flow per message.

pub mod bundle;
pub mod classifier;
pub mod composer;
pub mod embedder;
pub mod engine;
pub mod extractor;
pub mod fields;
pub mod index;
pub mod merge;

pub use bundle::{ContextBundle, ContextSection, NO_CONTEXT_FALLBACK, SectionKind};
pub use classifier::HttpClassifier;
pub use composer::ContextComposer;
pub use embedder::HttpEmbedder;
pub use engine::{FusionEngine, IngestOutcome};
pub use extractor::extract_fields;
pub use fields::{ContextField, MergeKind, PreferenceField, SessionField};
pub use index::{VectorMemoryIndex, select_top_k};
pub use merge::resolve;
