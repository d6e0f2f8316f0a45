//! Structured warnings raised while parsing, filtering and ranking.
//!
//! The engine never fails a request over a single bad line, field or plan
//! entry. It records a [`Diagnostic`] instead and keeps going, so callers
//! (and tests) can inspect what was degraded.

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnterminatedQuote,
    ExtraValues,
    BlankLine,
    UnknownFilterField,
    InvalidPattern,
    UnknownRankField,
    UnknownTieBreaker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// 1-based line number within the source CSV, for parse diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
            field: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn for_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// Append-only collector. Identical diagnostics are kept once.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        if self.entries.contains(&diagnostic) {
            return;
        }
        warn!(kind = ?diagnostic.kind, line = ?diagnostic.line, field = ?diagnostic.field, "{}", diagnostic.message);
        self.entries.push(diagnostic);
    }

    #[cfg(test)]
    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_diagnostics_recorded_once() {
        let mut diags = Diagnostics::new();
        for _ in 0..3 {
            diags.record(
                Diagnostic::new(DiagnosticKind::InvalidPattern, "bad pattern '('").for_field("title"),
            );
        }
        assert_eq!(diags.len(), 1);
        assert!(diags.has(DiagnosticKind::InvalidPattern));
        assert!(!diags.has(DiagnosticKind::BlankLine));
    }

    #[test]
    fn test_distinct_lines_are_separate_entries() {
        let mut diags = Diagnostics::new();
        diags.record(Diagnostic::new(DiagnosticKind::BlankLine, "blank").at_line(3));
        diags.record(Diagnostic::new(DiagnosticKind::BlankLine, "blank").at_line(7));
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn test_serializes_as_flat_list() {
        let mut diags = Diagnostics::new();
        diags.record(Diagnostic::new(DiagnosticKind::UnknownRankField, "no such field").for_field("age"));
        let json = serde_json::to_value(&diags).unwrap();
        assert_eq!(json[0]["kind"], "unknown_rank_field");
        assert_eq!(json[0]["field"], "age");
        assert!(json[0].get("line").is_none());
    }
}
