// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source location tracking.
//!
//! Every token and AST node carries a `Position` indicating where it starts
//! in the source file. Lines and columns are 1-based; the column treats a tab
//! as advancing to the next multiple-of-eight-plus-one stop, so reported
//! columns match what an editor with 8-column tabs displays.

/// A source position: byte offset plus 1-based line and column.
///
/// The byte offset is kept alongside the human-readable line/column so
/// diagnostics can point into the source text without re-scanning it.
///
/// # Examples
///
/// ```
/// use diamant_core::source_analysis::Position;
///
/// let pos = Position::new(4, 2, 1);
/// assert_eq!(pos.line(), 2);
/// assert_eq!(pos.column(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    offset: u32,
    line: u32,
    column: u32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(offset: u32, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// The position of the first byte of a source file.
    #[must_use]
    pub const fn start() -> Self {
        Self::new(0, 1, 1)
    }

    /// Returns the byte offset into the source text.
    #[must_use]
    pub const fn offset(self) -> u32 {
        self.offset
    }

    /// Returns the 1-based line number.
    #[must_use]
    pub const fn line(self) -> u32 {
        self.line
    }

    /// Returns the 1-based column number (tab stops every 8 columns).
    #[must_use]
    pub const fn column(self) -> u32 {
        self.column
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl From<Position> for miette::SourceSpan {
    fn from(pos: Position) -> Self {
        (pos.offset as usize, 0).into()
    }
}
