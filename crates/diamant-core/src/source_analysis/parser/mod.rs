// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for Diamant source code.
//!
//! The parser pulls tokens from the [`Lexer`] on demand with a single token
//! of lookahead and builds the typed AST of [`crate::ast`]. It is
//! fail-fast: the first error is returned as a [`Diagnostic`].
//!
//! # Grammar
//!
//! Precedence levels, loosest first:
//!
//! | Level | Construct | Associativity |
//! |-------|-----------|---------------|
//! | 1 | `=` | Right |
//! | 2 | `and` `or` | Left |
//! | 3 | `<` `>` `=<` `>=` `==` `!=` | Left |
//! | 4 | `+` `-` `~` `@` | Left |
//! | 5 | `*` `/` `div` `mod` | Left |
//! | 6 | application `e(args)`, dict update `e{entries}` | Left |
//! | 7 | `-e`, `not e`, `case`, `do`, `if`, `[…]`, `{…}`, atoms | — |
//!
//! # Top level
//!
//! The lexer treats the whole file as an implicit `do` block, so the entry
//! point parses a `;`-separated body terminated by the flushed `end`, then
//! expects `eof`. The result is the top-level `do` node whose `seq` is the
//! source file.
//!
//! # Blocks and definitions
//!
//! A block body is a `;`-separated sequence of expressions and
//! `=`-bindings. Entries whose left side is a call with a plain function
//! name — `f(pats…) = body` — are lifted out of the sequence into the
//! block's function definitions, grouped by name with their clauses in
//! source order. All clauses of one function must share an arity.
//!
//! Because the layout rule inserts `;` before an explicit `end` written at
//! the item column, block bodies and case alternatives tolerate a trailing
//! separator.
//!
//! # Validation
//!
//! After parsing, two recursive walks check every node against its
//! context: expression positions reject `=` and `regex`; pattern positions
//! reject computation (`apply`, `if`, `case`, `do`, logical, relational and
//! arithmetic operators). See [`validate`](self) for the exact partition.

mod expressions;
mod validate;

#[cfg(test)]
mod property_tests;

use crate::ast::{Block, Clause, Expr, ExprKind, FunctionDef};
use crate::source_analysis::{Diagnostic, Lexer, Position, Token, TokenKind};

/// Parses source text into the top-level `do` expression.
///
/// # Errors
///
/// Returns the first lexical, syntactic, or context-validation error.
///
/// # Examples
///
/// ```
/// use diamant_core::ast::ExprKind;
/// use diamant_core::source_analysis::parse;
///
/// let tree = parse("x = 1\nx + 1").unwrap();
/// assert!(matches!(tree.kind, ExprKind::Do(_)));
/// ```
pub fn parse(source: &str) -> Result<Expr, Diagnostic> {
    let mut parser = Parser::new(source)?;
    let program = parser.parse_program()?;
    validate::program(&program)?;
    Ok(program)
}

/// The parser state: the lexer and one token of lookahead.
pub(crate) struct Parser<'src> {
    lexer: Lexer<'src>,
    token: Token,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Result<Self, Diagnostic> {
        let mut lexer = Lexer::new(source);
        let token = lexer.next_token()?;
        Ok(Self { lexer, token })
    }

    // ========================================================================
    // Token management
    // ========================================================================

    /// The current lookahead token.
    pub(crate) fn current(&self) -> &TokenKind {
        self.token.kind()
    }

    /// Consumes the current token and returns it.
    pub(crate) fn advance(&mut self) -> Result<Token, Diagnostic> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.token, next))
    }

    /// Consumes the current token if it matches, returning its position.
    pub(crate) fn try_eat(&mut self, kind: &TokenKind) -> Result<Option<Position>, Diagnostic> {
        if self.current() == kind {
            Ok(Some(self.advance()?.position()))
        } else {
            Ok(None)
        }
    }

    /// Consumes the current token, requiring it to match.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> Result<Position, Diagnostic> {
        if self.current() == kind {
            Ok(self.advance()?.position())
        } else {
            Err(Diagnostic::error(
                format!("Unexpected {}. Expecting {}.", self.current().op(), kind.op()),
                self.token.position(),
            ))
        }
    }

    /// An error for a token that fits no rule.
    pub(crate) fn unexpected(&self, rule: &str) -> Diagnostic {
        Diagnostic::error(
            format!("Unexpected {}, parsing {}", self.current().op(), rule),
            self.token.position(),
        )
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    /// Parses the whole file as the implicit top-level block.
    fn parse_program(&mut self) -> Result<Expr, Diagnostic> {
        let position = self.token.position();
        let block = self.parse_block_body()?;
        self.eat(&TokenKind::Eof)?;
        Ok(Expr::new(ExprKind::Do(block), position))
    }

    /// Parses a `;`-separated body up to and including its `end`, then
    /// lifts function definitions out of the sequence.
    pub(crate) fn parse_block_body(&mut self) -> Result<Block, Diagnostic> {
        let mut seq = Vec::new();
        loop {
            if self.current() == &TokenKind::End {
                break;
            }
            seq.push(self.parse_expr()?);
            if self.try_eat(&TokenKind::Semicolon)?.is_none() {
                break;
            }
        }
        self.eat(&TokenKind::End)?;
        partition_definitions(seq)
    }
}

/// Splits a block sequence into body entries and function definitions.
///
/// An entry is a definition clause when it is `=` with a call on the left
/// whose function position is a plain name. Clauses accumulate per name;
/// every clause of one function must have the same arity.
fn partition_definitions(seq: Vec<Expr>) -> Result<Block, Diagnostic> {
    let mut body = Vec::new();
    let mut defs: Vec<FunctionDef> = Vec::new();

    for entry in seq {
        if !is_definition(&entry) {
            body.push(entry);
            continue;
        }
        let position = entry.position;
        let ExprKind::Match { pattern, value } = entry.kind else {
            unreachable!("is_definition checked the entry shape");
        };
        let ExprKind::Apply { func, args } = pattern.kind else {
            unreachable!("is_definition checked the entry shape");
        };
        let name = match func.kind {
            ExprKind::Var { name, .. } => name,
            _ => {
                return Err(Diagnostic::error(
                    "Function name expected in definition",
                    func.position,
                ));
            }
        };
        let arity = args.len();
        let clause = Clause::new(args, *value);
        match defs.iter_mut().find(|d| d.name == name) {
            Some(def) => {
                if def.arity != arity {
                    return Err(Diagnostic::error(
                        format!("Function {name} is defined with different arities"),
                        position,
                    ));
                }
                def.clauses.push(clause);
            }
            None => defs.push(FunctionDef {
                name,
                arity,
                clauses: vec![clause],
                env: crate::semantic_analysis::VarSet::new(),
                position,
            }),
        }
    }

    Ok(Block { seq: body, defs })
}

/// Returns `true` for `name(…) = …` entries (including a malformed
/// function position, which [`partition_definitions`] reports).
fn is_definition(e: &Expr) -> bool {
    match &e.kind {
        ExprKind::Match { pattern, .. } => matches!(&pattern.kind, ExprKind::Apply { .. }),
        _ => false,
    }
}
