// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Diamant compiler front-end.
//!
//! This crate contains the front-end of the Diamant compiler:
//! - Lexical analysis with the layout (off-side) rule
//! - Parsing to a typed AST with expression/pattern validation
//! - Semantic annotation: scoping, closure environments, access liveness
//! - Unparsing (AST back to source text)
//!
//! The pipeline is strictly sequential and fail-fast: each stage consumes
//! the previous stage's output and the first diagnostic terminates
//! processing.
//!
//! ```
//! use diamant_core::semantic_analysis::annotate;
//! use diamant_core::source_analysis::parse;
//!
//! let tree = parse("x = 1\nx + 1").unwrap();
//! let annotated = annotate(tree).unwrap();
//! assert!(annotated.warnings.is_empty());
//! ```

#![doc = include_str!("../../../README.md")]

pub mod ast;
pub mod semantic_analysis;
pub mod source_analysis;
pub mod unparse;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::{BinOp, Block, Clause, Entry, Expr, ExprKind, FunctionDef, UnOp};
    pub use crate::semantic_analysis::{Action, Annotated, SemanticError, VarSet, annotate};
    pub use crate::source_analysis::{
        Diagnostic, Lexer, Literal, Position, Severity, Token, TokenKind, parse,
    };
    pub use crate::unparse::unparse;
}
