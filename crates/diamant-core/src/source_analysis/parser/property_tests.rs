// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the Diamant parser.
//!
//! 1. **Parser never panics** — arbitrary input yields a tree or an error
//! 2. **Parser is deterministic**
//! 3. **Valid programs parse** — generated well-formed sources succeed
//! 4. **Pattern/expression disjointness** — in a validated tree, every
//!    node in pattern position has a pattern-legal kind and `=`/`regex`
//!    never appear in plain expression position

use proptest::prelude::*;

use crate::ast::{Block, Expr, ExprKind};
use crate::source_analysis::parse;

/// Small building blocks combined into programs by the generator.
const ATOMS: &[&str] = &["0", "42", "x", "\"s\"", "true", "null", "[x, 1]", "{a: x}"];
const BINOPS: &[&str] = &["+", "-", "*", "and", "==", "~", "@", "div", "mod"];

fn atom() -> impl Strategy<Value = String> {
    prop::sample::select(ATOMS).prop_map(str::to_owned)
}

fn binop() -> impl Strategy<Value = String> {
    prop::sample::select(BINOPS).prop_map(str::to_owned)
}

/// A generated well-formed program: a binding, a definition, and a use.
fn valid_program() -> impl Strategy<Value = String> {
    (atom(), binop(), atom(), binop(), atom()).prop_map(|(a, op1, b, op2, c)| {
        format!("x = {a}\nf(p) = p {op1} {b}\ny = x {op2} {c}\nf(y)")
    })
}

fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(256),
        ..default
    }
}

/// Asserts the pattern/expression partition over a validated tree.
fn assert_contexts(e: &Expr, is_pattern: bool) {
    match &e.kind {
        ExprKind::Lit(_) | ExprKind::Var { .. } => {}
        ExprKind::Regex(_) => {
            assert!(is_pattern, "regex in expression position");
        }
        ExprKind::Array(elems) => {
            for elem in elems {
                assert_contexts(elem, is_pattern);
            }
        }
        ExprKind::Dict(entries) => {
            for entry in entries {
                assert_contexts(&entry.key, is_pattern);
                assert_contexts(&entry.value, is_pattern);
            }
        }
        ExprKind::DictUpdate { subj, entries } => {
            assert_contexts(subj, is_pattern);
            for entry in entries {
                assert_contexts(&entry.key, is_pattern);
                assert_contexts(&entry.value, is_pattern);
            }
        }
        ExprKind::Binary { op, left, right } => {
            assert!(
                !is_pattern || op.is_pattern_op(),
                "operator {} in pattern position",
                op.symbol()
            );
            assert_contexts(left, is_pattern);
            assert_contexts(right, is_pattern);
        }
        ExprKind::Unary { operand, .. } => {
            assert!(!is_pattern, "unary operator in pattern position");
            assert_contexts(operand, false);
        }
        ExprKind::Apply { func, args } => {
            assert!(!is_pattern, "apply in pattern position");
            assert_contexts(func, false);
            for arg in args {
                assert_contexts(arg, false);
            }
        }
        ExprKind::Case { subj, clauses } => {
            assert!(!is_pattern, "case in pattern position");
            assert_contexts(subj, false);
            for clause in clauses {
                for pat in &clause.pats {
                    assert_contexts(pat, true);
                }
                assert_contexts(&clause.body, false);
            }
        }
        ExprKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            assert!(!is_pattern, "if in pattern position");
            assert_contexts(cond, false);
            assert_contexts(then_branch, false);
            assert_contexts(else_branch, false);
        }
        ExprKind::Do(block) => {
            assert!(!is_pattern, "do in pattern position");
            assert_block_contexts(block);
        }
        ExprKind::Match { pattern, value } => {
            assert_contexts(pattern, true);
            if is_pattern {
                assert_contexts(value, true);
            } else {
                assert_contexts(value, false);
            }
        }
    }
}

fn assert_block_contexts(block: &Block) {
    for def in &block.defs {
        for clause in &def.clauses {
            for pat in &clause.pats {
                assert_contexts(pat, true);
            }
            assert_contexts(&clause.body, false);
        }
    }
    for entry in &block.seq {
        assert_contexts(entry, false);
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Property 1: parsing arbitrary input never panics.
    #[test]
    fn parser_never_panics(input in "\\PC{0,200}") {
        let _result = parse(&input);
    }

    /// Property 2: parsing is deterministic.
    #[test]
    fn parser_deterministic(input in "\\PC{0,150}") {
        let first = parse(&input);
        let second = parse(&input);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            (a, b) => prop_assert!(false, "diverging results: {a:?} vs {b:?}"),
        }
    }

    /// Property 3: generated well-formed programs parse.
    #[test]
    fn valid_programs_parse(source in valid_program()) {
        let tree = parse(&source);
        prop_assert!(tree.is_ok(), "failed to parse {source:?}: {tree:?}");
    }

    /// Property 4: a validated tree respects the pattern/expression
    /// partition everywhere.
    #[test]
    fn contexts_are_disjoint(source in valid_program()) {
        let tree = parse(&source).expect("valid program parses");
        let ExprKind::Do(block) = &tree.kind else {
            panic!("top level is not a block");
        };
        assert_block_contexts(block);
    }
}
