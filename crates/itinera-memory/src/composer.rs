// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context composition: builds the ranked context bundle for a query.

use std::sync::Arc;

use itinera_core::{ItineraError, VectorIndexAdapter};
use itinera_storage::TieredStorage;
use tracing::{debug, warn};

use crate::bundle::{ContextBundle, ContextSection, SectionKind};

/// Composes the per-query context bundle from both fact tiers and the
/// vector memory index.
pub struct ContextComposer {
    storage: Arc<TieredStorage>,
    index: Arc<dyn VectorIndexAdapter>,
    retrieval_k: usize,
}

impl ContextComposer {
    pub fn new(
        storage: Arc<TieredStorage>,
        index: Arc<dyn VectorIndexAdapter>,
        retrieval_k: usize,
    ) -> Self {
        Self {
            storage,
            index,
            retrieval_k,
        }
    }

    /// Build the context bundle for one outbound response.
    ///
    /// Sections appear in fixed order: persistent facts, temporary facts,
    /// retrieved memories. A scope with no stored records yields no
    /// section, not an error. Memory recall failures are soft: the
    /// retrieved section is omitted and composition continues.
    pub async fn compose(
        &self,
        user_id: &str,
        session_id: &str,
        query_text: &str,
    ) -> Result<ContextBundle, ItineraError> {
        let mut bundle = ContextBundle::default();

        let preferences = self.storage.list_persistent(user_id).await?;
        if !preferences.is_empty() {
            bundle.sections.push(ContextSection {
                kind: SectionKind::Persistent,
                lines: preferences
                    .iter()
                    .map(|r| format!("{}: {}", r.field, r.value))
                    .collect(),
            });
        }

        let session_facts = self.storage.list_temporary(session_id).await?;
        if !session_facts.is_empty() {
            bundle.sections.push(ContextSection {
                kind: SectionKind::Temporary,
                lines: session_facts
                    .iter()
                    .map(|r| format!("{}: {}", r.field, r.value))
                    .collect(),
            });
        }

        match self
            .index
            .query(user_id, session_id, query_text, self.retrieval_k)
            .await
        {
            Ok(memories) if !memories.is_empty() => {
                bundle.sections.push(ContextSection {
                    kind: SectionKind::Retrieved,
                    lines: memories
                        .iter()
                        .enumerate()
                        .map(|(i, m)| format!("Memory {}: {}", i + 1, m.text))
                        .collect(),
                });
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "memory recall failed, omitting retrieved section");
            }
        }

        debug!(
            user_id,
            session_id,
            sections = bundle.sections.len(),
            "composed context bundle"
        );
        Ok(bundle)
    }
}
