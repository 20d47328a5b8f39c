// SPDX-FileCopyrightText: 2026 Itinera Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context bundle types and rendering.
//!
//! A bundle is an ordered list of sections, each a header plus plain
//! `field: value` or numbered memory lines, rendered as the system-side
//! context block for the language model.

/// Fallback line when no section has any content.
pub const NO_CONTEXT_FALLBACK: &str = "No user context available.";

/// Which part of memory a section was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Persistent,
    Temporary,
    Retrieved,
}

impl SectionKind {
    /// Header line introducing the section in rendered output.
    pub fn header(&self) -> &'static str {
        match self {
            SectionKind::Persistent => "--- Persistent Storage ---",
            SectionKind::Temporary => "--- Temporary Storage ---",
            SectionKind::Retrieved => "--- Retrieved Memories ---",
        }
    }
}

/// One section of composed context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSection {
    pub kind: SectionKind,
    pub lines: Vec<String>,
}

/// Composed context for one query, in fixed section order: persistent,
/// then temporary, then retrieved memories. Durable facts carry the most
/// weight, loosely-related recalled snippets the least.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextBundle {
    pub sections: Vec<ContextSection>,
}

impl ContextBundle {
    /// True when no section carries any content.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Render to the textual block handed to the language model.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return NO_CONTEXT_FALLBACK.to_string();
        }

        let mut out = Vec::new();
        for section in &self.sections {
            out.push(section.kind.header().to_string());
            out.extend(section.lines.iter().cloned());
        }
        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bundle_renders_fallback_line() {
        let bundle = ContextBundle::default();
        assert_eq!(bundle.render(), "No user context available.");
    }

    #[test]
    fn sections_render_in_insertion_order_with_headers() {
        let bundle = ContextBundle {
            sections: vec![
                ContextSection {
                    kind: SectionKind::Persistent,
                    lines: vec!["home_airport: ORD".to_string()],
                },
                ContextSection {
                    kind: SectionKind::Temporary,
                    lines: vec!["trip_destination: going to Rome".to_string()],
                },
                ContextSection {
                    kind: SectionKind::Retrieved,
                    lines: vec!["Memory 1: I love window seats".to_string()],
                },
            ],
        };

        let rendered = bundle.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "--- Persistent Storage ---",
                "home_airport: ORD",
                "--- Temporary Storage ---",
                "trip_destination: going to Rome",
                "--- Retrieved Memories ---",
                "Memory 1: I love window seats",
            ]
        );
    }
}
