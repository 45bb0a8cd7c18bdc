// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source analysis: positions, tokens, the layout-aware lexer, and the
//! parser.
//!
//! # Lexical analysis
//!
//! The [`Lexer`] converts source text into [`Token`]s one at a time. It
//! implements the off-side rule: `do`, `of`, `let` and `where` open layout
//! blocks, and `;`/`end`/`in` tokens are synthesized from indentation (see
//! [`lexer`](self) for the exact rule). Regex literals and the division
//! operator are disambiguated from the previous token.
//!
//! ```
//! use diamant_core::source_analysis::lex;
//!
//! let tokens = lex("x / 2 ; y = /a*/").unwrap();
//! assert_eq!(tokens[1].kind().op(), "/");
//! assert_eq!(tokens[6].kind().op(), "regex");
//! ```
//!
//! # Parsing
//!
//! [`parse`] builds the typed AST of [`crate::ast`] from the pulled token
//! stream and validates expression/pattern contexts. The whole file is an
//! implicit `do` block.
//!
//! # Error handling
//!
//! Lexing and parsing are fail-fast: the first problem is returned as a
//! [`Diagnostic`] carrying the source [`Position`].

mod diagnostics;
mod lexer;
mod parser;
mod position;
mod token;

#[cfg(test)]
mod lexer_property_tests;

pub use diagnostics::{Diagnostic, Severity};
pub use lexer::{Lexer, lex, lex_with_eof};
pub use parser::parse;
pub use position::Position;
pub use token::{Literal, Token, TokenKind};
