// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQL query functions, one module per table.

pub mod preferences;
pub mod session_context;
pub mod sessions;
pub mod users;
pub mod vectors;
