// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types stored by this crate.
//!
//! The shared row structs live in `itinera-core` so adapters and callers can
//! exchange them without depending on the storage crate.

pub use itinera_core::types::{
    MemoryVector, PreferenceRecord, Session, SessionContextRecord, User,
};

/// A stored vector row loaded for similarity scoring.
///
/// The embedding blob is decoded eagerly; scoring happens in process.
#[derive(Debug, Clone)]
pub struct CandidateVector {
    pub id: String,
    pub tier: itinera_core::MemoryTier,
    pub text: String,
    pub embedding: Vec<f32>,
}
