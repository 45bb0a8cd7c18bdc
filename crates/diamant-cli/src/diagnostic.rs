// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error rendering with miette.
//!
//! Converts diamant-core diagnostics into miette-formatted errors with
//! source context and an arrow at the diagnostic's position.

use diamant_core::source_analysis::{Diagnostic as CoreDiagnostic, Severity};
use miette::{Diagnostic, SourceSpan};

/// A compilation diagnostic with rich formatting.
#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("{message}")]
#[diagnostic(code(diamant::compile))]
pub struct CompileDiagnostic {
    /// Error or warning
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Source code for context
    #[source_code]
    pub src: miette::NamedSource<String>,
    /// Location of the diagnostic
    #[label("{label}")]
    pub span: SourceSpan,
    /// Label for the span
    pub label: String,
}

impl CompileDiagnostic {
    /// Creates a rendered diagnostic from a diamant-core diagnostic.
    pub fn from_core(diagnostic: &CoreDiagnostic, source_path: &str, source: &str) -> Self {
        let label = match diagnostic.severity {
            Severity::Error => "error here",
            Severity::Warning => "warning here",
        };

        Self {
            severity: diagnostic.severity,
            message: diagnostic.message.to_string(),
            src: miette::NamedSource::new(source_path, source.to_string()),
            span: diagnostic.position.into(),
            label: label.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diamant_core::source_analysis::Position;

    #[test]
    fn from_core_diagnostic() {
        let core = CoreDiagnostic::error("Unexpected eof. Expecting ).", Position::new(3, 1, 4));
        let diag = CompileDiagnostic::from_core(&core, "test.di", "f(1");

        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "Unexpected eof. Expecting ).");
        assert_eq!(diag.span.offset(), 3);
    }
}
