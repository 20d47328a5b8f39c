// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite tiered storage for the Itinera fusion engine.
//!
//! One database file holds both fact tiers (user preferences and session
//! context), the identity scopes they hang off, and the vector backing
//! table for semantic recall. All SQLite work runs through an async
//! connection wrapper so it never blocks a tokio worker thread.

pub mod database;
pub mod gateway;
pub mod migrations;
pub mod models;
pub mod queries;

pub use database::Database;
pub use gateway::TieredStorage;
pub use models::CandidateVector;
