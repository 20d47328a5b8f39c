// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence classifier trait.

use async_trait::async_trait;

use crate::error::ItineraError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ClassifiedPhrase;

/// Adapter for the external persistence classifier service.
///
/// Given free-form message text, returns zero or more phrases each tagged
/// with a persistence score in `[0, 1]`. An empty list is a normal outcome
/// (nothing in the message worth remembering). Implementations must fail
/// soft on malformed upstream responses: return an empty list rather than
/// an error for schema violations, reserving `Err` for transport failures.
#[async_trait]
pub trait ClassifierAdapter: PluginAdapter {
    /// Extracts scored phrases from the given message text.
    async fn classify(&self, text: &str) -> Result<Vec<ClassifiedPhrase>, ItineraError>;
}
