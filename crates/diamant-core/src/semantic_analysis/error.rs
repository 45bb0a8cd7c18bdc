// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Semantic analysis error types.

use ecow::EcoString;
use thiserror::Error;

use crate::source_analysis::{Diagnostic, Position};

/// A semantic error discovered during annotation.
///
/// The annotator is fail-fast: the first error aborts the pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct SemanticError {
    /// The category of semantic error.
    #[source]
    pub kind: SemanticErrorKind,
    /// Source location where the error was detected.
    pub position: Position,
}

/// Types of semantic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticErrorKind {
    /// Variable referenced before it is bound, or a closure used before all
    /// of its captured variables are bound.
    #[error("Undefined variable {name}")]
    UndefinedVariable {
        /// The undefined variable name.
        name: EcoString,
    },

    /// A pattern tried to bind or match against a function name.
    #[error("Pattern matching on functions not supported")]
    PatternMatchOnFunction,

    /// A node kind that cannot occur in pattern position reached the
    /// annotator (the parser's validation normally rejects these).
    #[error("Invalid pattern {op}")]
    InvalidPattern {
        /// The offending node's syntax tag.
        op: EcoString,
    },

    /// The annotator was handed something other than a top-level block.
    #[error("Unexpected parse tree. A block is expected on top level.")]
    ExpectedTopLevelBlock,
}

impl SemanticError {
    /// Creates a new semantic error.
    #[must_use]
    pub fn new(kind: SemanticErrorKind, position: Position) -> Self {
        Self { kind, position }
    }

    /// Converts the error into a plain diagnostic.
    #[must_use]
    pub fn into_diagnostic(self) -> Diagnostic {
        Diagnostic::error(self.kind.to_string(), self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_reporting_format() {
        let err = SemanticError::new(
            SemanticErrorKind::UndefinedVariable { name: "z".into() },
            Position::new(9, 1, 10),
        );
        assert_eq!(err.to_string(), "Undefined variable z");
        assert_eq!(err.into_diagnostic().to_string(), "1:10: Undefined variable z");
    }

    #[test]
    fn pattern_match_on_function_message() {
        let err = SemanticError::new(
            SemanticErrorKind::PatternMatchOnFunction,
            Position::start(),
        );
        assert_eq!(err.to_string(), "Pattern matching on functions not supported");
    }
}
