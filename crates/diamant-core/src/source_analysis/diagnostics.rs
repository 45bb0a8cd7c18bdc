// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Diagnostic messages with source locations.
//!
//! The front-end is fail-fast: lexing and parsing return the first error as
//! a [`Diagnostic`], and the annotator converts its typed errors into one at
//! the API boundary. Warnings (currently only unused variables) are collected
//! and do not stop processing.

use ecow::EcoString;

use super::Position;

/// A diagnostic message (error or warning) with a source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The severity of the diagnostic.
    pub severity: Severity,
    /// The message text.
    pub message: EcoString,
    /// Where in the source the diagnostic points.
    pub position: Position,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    #[must_use]
    pub fn error(message: impl Into<EcoString>, position: Position) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            position,
        }
    }

    /// Creates a new warning diagnostic.
    #[must_use]
    pub fn warning(message: impl Into<EcoString>, position: Position) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            position,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.message)
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// An error that terminates compilation.
    Error,
    /// A warning; processing continues.
    Warning,
}
