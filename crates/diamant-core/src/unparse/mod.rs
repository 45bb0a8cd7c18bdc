// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! AST unparser: converts Diamant AST nodes back to source text.
//!
//! Drives the `pp` CLI command. The output leans on the layout rule rather
//! than explicit terminators: `do` bodies and `case` alternatives are
//! emitted indented, so re-lexing the output synthesizes the `;` and `end`
//! tokens again. Binary operator applications are fully parenthesized, so
//! precedence survives the round trip regardless of the original spelling.
//!
//! Function definitions are printed before the rest of a block's body, one
//! clause per line; their position in the original sequence is not
//! preserved (definition order is scoping-irrelevant).

use std::fmt::Write as _;

use crate::ast::{Block, Clause, Entry, Expr, ExprKind, FunctionDef};

/// Indentation per block level.
const STEP: usize = 4;

/// Unparses a whole program (the top-level `do` expression) to source
/// text.
#[must_use]
pub fn unparse(program: &Expr) -> String {
    let mut out = String::new();
    match &program.kind {
        ExprKind::Do(block) => block_items(block, 0, &mut out),
        _ => expr(program, 0, &mut out),
    }
    out.push('\n');
    out
}

fn indent_to(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push(' ');
    }
}

fn block_items(block: &Block, indent: usize, out: &mut String) {
    let mut first = true;
    for def in &block.defs {
        if !first {
            out.push('\n');
            indent_to(out, indent);
        }
        function_def(def, indent, out);
        first = false;
    }
    for e in &block.seq {
        if !first {
            out.push('\n');
            indent_to(out, indent);
        }
        expr(e, indent, out);
        first = false;
    }
}

fn function_def(def: &FunctionDef, indent: usize, out: &mut String) {
    let mut first = true;
    for clause in &def.clauses {
        if !first {
            out.push('\n');
            indent_to(out, indent);
        }
        let _ = write!(out, "{}(", def.name);
        exprs_inline(&clause.pats, indent, out);
        out.push_str(") = ");
        expr(&clause.body, indent + STEP, out);
        first = false;
    }
}

fn exprs_inline(es: &[Expr], indent: usize, out: &mut String) {
    for (i, e) in es.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        expr(e, indent, out);
    }
}

fn entries_inline(entries: &[Entry], indent: usize, out: &mut String) {
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        expr(&entry.key, indent, out);
        out.push_str(": ");
        expr(&entry.value, indent, out);
    }
}

fn clause(c: &Clause, indent: usize, out: &mut String) {
    exprs_inline(&c.pats, indent, out);
    out.push_str(" -> ");
    expr(&c.body, indent + STEP, out);
}

fn expr(e: &Expr, indent: usize, out: &mut String) {
    match &e.kind {
        ExprKind::Lit(value) => {
            let _ = write!(out, "{value}");
        }
        ExprKind::Var { name, .. } => out.push_str(name),
        ExprKind::Regex(pattern) => {
            out.push('/');
            for c in pattern.chars() {
                if c == '/' {
                    out.push('\\');
                }
                out.push(c);
            }
            out.push('/');
        }
        ExprKind::Array(elems) => {
            out.push('[');
            exprs_inline(elems, indent, out);
            out.push(']');
        }
        ExprKind::Dict(entries) => {
            out.push('{');
            entries_inline(entries, indent, out);
            out.push('}');
        }
        ExprKind::DictUpdate { subj, entries } => {
            expr(subj, indent, out);
            out.push('{');
            entries_inline(entries, indent, out);
            out.push('}');
        }
        ExprKind::Apply { func, args } => {
            expr(func, indent, out);
            out.push('(');
            exprs_inline(args, indent, out);
            out.push(')');
        }
        ExprKind::Case { subj, clauses } => {
            out.push_str("case ");
            expr(subj, indent, out);
            out.push_str(" of");
            for c in clauses {
                out.push('\n');
                indent_to(out, indent + STEP);
                clause(c, indent + STEP, out);
            }
            out.push('\n');
            indent_to(out, indent);
        }
        ExprKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            out.push_str("if ");
            expr(cond, indent, out);
            out.push('\n');
            indent_to(out, indent + STEP);
            out.push_str("then ");
            expr(then_branch, indent + STEP, out);
            out.push('\n');
            indent_to(out, indent + STEP);
            out.push_str("else ");
            expr(else_branch, indent + STEP, out);
        }
        ExprKind::Do(block) => {
            out.push_str("do\n");
            indent_to(out, indent + STEP);
            block_items(block, indent + STEP, out);
            out.push('\n');
            indent_to(out, indent);
        }
        ExprKind::Binary { op, left, right } => {
            out.push('(');
            expr(left, indent, out);
            let _ = write!(out, " {} ", op.symbol());
            expr(right, indent, out);
            out.push(')');
        }
        ExprKind::Unary { op, operand } => {
            out.push_str(op.symbol());
            if matches!(op, crate::ast::UnOp::Not) {
                out.push(' ');
            }
            expr(operand, indent, out);
        }
        ExprKind::Match { pattern, value } => {
            expr(pattern, indent, out);
            out.push_str(" = ");
            expr(value, indent, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::parse;

    fn roundtrip(source: &str) -> String {
        unparse(&parse(source).expect("parse failed"))
    }

    #[test]
    fn literals_render_in_source_form() {
        assert_eq!(roundtrip("42"), "42\n");
        assert_eq!(roundtrip("\"a\\nb\""), "\"a\\nb\"\n");
        assert_eq!(roundtrip("true ; null"), "true\nnull\n");
    }

    #[test]
    fn binary_operators_are_parenthesized() {
        assert_eq!(roundtrip("a + b * c"), "(a + (b * c))\n");
        assert_eq!(roundtrip("a <= b"), "(a =< b)\n");
    }

    #[test]
    fn bindings_and_collections() {
        assert_eq!(roundtrip("x = [1, 2]"), "x = [1, 2]\n");
        assert_eq!(roundtrip("d{a: 1}"), "d{a: 1}\n");
        assert_eq!(roundtrip("{}"), "{}\n");
    }

    #[test]
    fn case_uses_layout() {
        assert_eq!(
            roundtrip("case x of 0 -> a ; n -> b end"),
            "case x of\n    0 -> a\n    n -> b\n\n"
        );
    }

    #[test]
    fn function_definitions_render_one_clause_per_line() {
        assert_eq!(
            roundtrip("f(0) = 42 ; f(n) = n - 1"),
            "f(0) = 42\nf(n) = (n - 1)\n"
        );
    }

    #[test]
    fn regex_interior_slash_is_escaped() {
        assert_eq!(roundtrip("x = /a\\/b/"), "x = /a\\/b/\n");
    }

    #[test]
    fn unparsed_output_reparses() {
        let source = "do\n  x = 1\n  f(x) = x + 1\n  f(x)\n";
        let once = roundtrip(source);
        let twice = unparse(&parse(&once).expect("unparsed output parses"));
        assert_eq!(once, twice);
    }
}
