// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merge resolution for candidate facts against stored values.
//!
//! Pure functions; the engine reads the existing value, resolves, and
//! writes the result back. Rule order matters and is fixed:
//!
//! 1. no stored value: store the incoming value
//! 2. contradiction override: latest contradicting statement wins
//! 3. single-valued fields: replace
//! 4. multi-valued fields: sorted, deduplicated comma-space union

use std::collections::BTreeSet;

use crate::fields::{ContextField, MergeKind};

/// Opposite-concept pairs. If the stored value contains the left word and
/// the incoming value contains the right word, the incoming value replaces
/// the stored one wholesale, regardless of merge kind.
const CONTRADICTIONS: &[(&str, &str)] = &[
    ("cheap", "expensive"),
    ("budget", "luxury"),
    ("economy", "first class"),
    ("short trip", "long vacation"),
    ("direct flight", "layover"),
    ("basic", "premium"),
];

/// Separator for multi-valued lists. Values holding other separators are
/// treated as one opaque token rather than rejected.
const LIST_SEPARATOR: &str = ", ";

/// Resolve the value to store for `field` given the stored and incoming
/// values.
pub fn resolve<F: ContextField>(field: F, existing: Option<&str>, incoming: &str) -> String {
    let Some(existing) = existing else {
        return incoming.to_string();
    };

    for (stored_word, incoming_word) in CONTRADICTIONS {
        if existing.contains(stored_word) && incoming.contains(incoming_word) {
            return incoming.to_string();
        }
    }

    match field.merge_kind() {
        MergeKind::Single => incoming.to_string(),
        MergeKind::Multi => {
            let mut tokens: BTreeSet<&str> = existing.split(LIST_SEPARATOR).collect();
            tokens.extend(incoming.split(LIST_SEPARATOR));
            tokens.into_iter().collect::<Vec<_>>().join(LIST_SEPARATOR)
        }
    }
}
