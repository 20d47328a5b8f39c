// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword-driven fact extraction.
//!
//! Extraction is deliberately coarse: a keyword hit maps the field to the
//! entire original message, not the matched span. The surrounding context
//! of the utterance is worth more than span precision here; the merge
//! resolver and classifier refine from there.

use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use crate::fields::ContextField;

/// Scan `message` against the trigger table of field type `F`.
///
/// Matching is case-insensitive substring search; the first trigger hit
/// claims the field and its remaining triggers are skipped. Fields with no
/// hit are absent from the result. Empty or whitespace-only input yields
/// an empty map.
pub fn extract_fields<F>(message: &str) -> BTreeMap<F, String>
where
    F: ContextField + IntoEnumIterator,
{
    let mut extracted = BTreeMap::new();
    if message.trim().is_empty() {
        return extracted;
    }

    let lowered = message.to_lowercase();
    for field in F::iter() {
        if field.triggers().iter().any(|kw| lowered.contains(kw)) {
            extracted.insert(field, message.to_string());
        }
    }
    extracted
}
