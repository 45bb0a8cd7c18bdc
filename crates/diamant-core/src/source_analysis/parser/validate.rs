// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Context validation: the expression/pattern partition.
//!
//! The grammar parses patterns and expressions with the same rules; these
//! walks reject nodes that are illegal for the position they ended up in.
//!
//! | Node | Expression | Pattern |
//! |------|------------|---------|
//! | `lit`, `var`, `array`, `dict`, `dictup`, `~`, `@` | yes | yes |
//! | `regex` | no | yes |
//! | `=` | block bodies only | yes (nested match) |
//! | `apply`, `case`, `if`, `do` | yes | no |
//! | logical, relational, arithmetic operators, unary | yes | no |

use crate::ast::{Block, Clause, Entry, Expr, ExprKind};
use crate::source_analysis::Diagnostic;

/// Validates the top-level block produced by the parser.
pub(super) fn program(e: &Expr) -> Result<(), Diagnostic> {
    match &e.kind {
        ExprKind::Do(block) => block_body(block),
        _ => expr(e),
    }
}

fn block_body(block: &Block) -> Result<(), Diagnostic> {
    for def in &block.defs {
        for clause in &def.clauses {
            clause_parts(clause)?;
        }
    }
    for entry in &block.seq {
        // A `=` entry binds: its left side is a pattern.
        if let ExprKind::Match { pattern: p, value } = &entry.kind {
            pattern(p)?;
            expr(value)?;
        } else {
            expr(entry)?;
        }
    }
    Ok(())
}

fn clause_parts(clause: &Clause) -> Result<(), Diagnostic> {
    for pat in &clause.pats {
        pattern(pat)?;
    }
    expr(&clause.body)
}

fn entries_expr(entries: &[Entry]) -> Result<(), Diagnostic> {
    for entry in entries {
        expr(&entry.key)?;
        expr(&entry.value)?;
    }
    Ok(())
}

fn entries_pattern(entries: &[Entry]) -> Result<(), Diagnostic> {
    for entry in entries {
        pattern(&entry.key)?;
        pattern(&entry.value)?;
    }
    Ok(())
}

fn expr(e: &Expr) -> Result<(), Diagnostic> {
    match &e.kind {
        ExprKind::Lit(_) | ExprKind::Var { .. } => Ok(()),
        ExprKind::Regex(_) | ExprKind::Match { .. } => Err(Diagnostic::error(
            format!("Unexpected {} in expression context.", e.op()),
            e.position,
        )),
        ExprKind::Array(elems) => elems.iter().try_for_each(expr),
        ExprKind::Dict(entries) => entries_expr(entries),
        ExprKind::DictUpdate { subj, entries } => {
            expr(subj)?;
            entries_expr(entries)
        }
        ExprKind::Apply { func, args } => {
            expr(func)?;
            args.iter().try_for_each(expr)
        }
        ExprKind::Case { subj, clauses } => {
            expr(subj)?;
            clauses.iter().try_for_each(clause_parts)
        }
        ExprKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            expr(cond)?;
            expr(then_branch)?;
            expr(else_branch)
        }
        ExprKind::Do(block) => block_body(block),
        ExprKind::Binary { left, right, .. } => {
            expr(left)?;
            expr(right)
        }
        ExprKind::Unary { operand, .. } => expr(operand),
    }
}

fn pattern(e: &Expr) -> Result<(), Diagnostic> {
    match &e.kind {
        ExprKind::Lit(_) | ExprKind::Var { .. } | ExprKind::Regex(_) => Ok(()),
        ExprKind::Array(elems) => elems.iter().try_for_each(pattern),
        ExprKind::Dict(entries) => entries_pattern(entries),
        ExprKind::DictUpdate { subj, entries } => {
            pattern(subj)?;
            entries_pattern(entries)
        }
        ExprKind::Binary { op, left, right } if op.is_pattern_op() => {
            pattern(left)?;
            pattern(right)
        }
        ExprKind::Match { pattern: p, value } => {
            // Nested match: both sides are patterns.
            pattern(p)?;
            pattern(value)
        }
        ExprKind::Apply { .. }
        | ExprKind::Case { .. }
        | ExprKind::If { .. }
        | ExprKind::Do(_)
        | ExprKind::Binary { .. }
        | ExprKind::Unary { .. } => Err(Diagnostic::error(
            format!("Unexpected {} in pattern context.", e.op()),
            e.position,
        )),
    }
}
