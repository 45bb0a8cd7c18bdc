// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! First/last access marking.
//!
//! When a scope closes, every name it bound is walked through the closing
//! construct to refine `var` actions:
//!
//! - The **last** pass walks backwards (sequences in reverse, binary
//!   operators preferring `right`, `case` clauses before the scrutinee) and
//!   turns the latest `access` into `last`. Landing on a `bind` that was
//!   never read turns it into `discard` and emits an unused-variable warning
//!   unless the name starts with `_`. Both branches of an `if` are marked,
//!   so whichever branch runs performs the final access.
//!
//! - The **first** pass is the forward mirror: sequences scan forward,
//!   binary operators prefer `left`, `if` marks its condition or otherwise
//!   requires the name in both branches. The earliest `access` becomes
//!   `first`; a node already marked `last` becomes `only`.
//!
//! A variable whose only accesses happen through a closure is marked inside
//! the capturing function's definition: when the backward walk reaches a
//! `var` node naming a function whose environment contains the target, it
//! resolves the definition through the enclosing blocks' `defs` and marks
//! the last access there, updating the definition's `env` entry to `last`.
//! The forward pass never descends into closures, so closure-mediated
//! accesses never receive `first` or `only`.

use ecow::EcoString;

use crate::ast::{Block, Clause, Entry, Expr, ExprKind, FunctionDef};
use crate::source_analysis::Diagnostic;

use super::Action;

/// Runs the marking passes and collects unused-variable warnings.
pub(crate) struct Marker<'w> {
    warnings: &'w mut Vec<Diagnostic>,
}

/// One level of the `defs` chain the backward walk threads through nested
/// blocks, used to resolve a closure reference to its definition.
struct Frames<'d, 'p> {
    defs: &'d mut Vec<FunctionDef>,
    parent: Option<&'p mut dyn CaptureSite>,
}

/// Resolution of closure-mediated accesses against a chain of `defs`.
trait CaptureSite {
    /// Marks the last access of `name` inside the definition of `func`,
    /// searching this level and then the enclosing ones. Returns `false`
    /// when the definition cannot be found or contains no access.
    fn mark_capture_last(&mut self, marker: &mut Marker<'_>, func: &str, name: &str) -> bool;
}

impl CaptureSite for Frames<'_, '_> {
    fn mark_capture_last(&mut self, marker: &mut Marker<'_>, func: &str, name: &str) -> bool {
        if let Some(idx) = self.defs.iter().position(|d| d.name == func) {
            let parent: Option<&mut dyn CaptureSite> = match self.parent {
                Some(ref mut p) => Some(&mut **p),
                None => None,
            };
            mark_last_in_def(self.defs, parent, idx, name, marker)
        } else if let Some(parent) = self.parent.as_mut() {
            parent.mark_capture_last(marker, func, name)
        } else {
            false
        }
    }
}

/// Marks the last access of `name` inside `defs[idx]` and refines that
/// definition's `env` entry. The definition is taken out of the vector
/// while its clauses are walked so the walk can keep resolving sibling
/// definitions through the same level.
fn mark_last_in_def(
    defs: &mut Vec<FunctionDef>,
    parent: Option<&mut dyn CaptureSite>,
    idx: usize,
    name: &str,
    marker: &mut Marker<'_>,
) -> bool {
    let mut def = std::mem::take(&mut defs[idx]);
    let mut found = false;
    {
        let mut frames = Frames {
            defs: &mut *defs,
            parent,
        };
        for clause in def.clauses.iter_mut().rev() {
            if clause.varset.contains(name)
                && marker.mark_last_in_clause(clause, name, &mut frames)
            {
                found = true;
                break;
            }
        }
    }
    if found {
        def.env.insert(EcoString::from(name), Action::Last);
    }
    defs[idx] = def;
    found
}

impl<'w> Marker<'w> {
    pub(crate) fn new(warnings: &'w mut Vec<Diagnostic>) -> Self {
        Self { warnings }
    }

    /// Marks the last access of a block-scoped `name` when its block
    /// closes. Searches the body first, then definitions whose environment
    /// captured the name. Returns `false` if no access or binding site was
    /// found (an entirely unused function).
    pub(crate) fn mark_last_in_block(&mut self, block: &mut Block, name: &str) -> bool {
        let mut no_defs = Vec::new();
        let mut root = Frames {
            defs: &mut no_defs,
            parent: None,
        };
        self.mark_last_in_block_with(block, name, &mut root)
    }

    /// Marks the last access of a clause-local `name` when its clause
    /// closes: the body is searched first, then the patterns in reverse.
    pub(crate) fn mark_last_in_clause_parts(
        &mut self,
        pats: &mut [Expr],
        body: &mut Expr,
        name: &str,
    ) -> bool {
        let mut no_defs = Vec::new();
        let mut root = Frames {
            defs: &mut no_defs,
            parent: None,
        };
        self.mark_last_in_parts(pats, body, name, &mut root)
    }

    fn mark_last_in_block_with(
        &mut self,
        block: &mut Block,
        name: &str,
        frames: &mut Frames<'_, '_>,
    ) -> bool {
        let Block { seq, defs } = block;
        {
            let mut child = Frames {
                defs: &mut *defs,
                parent: Some(frames),
            };
            for e in seq.iter_mut().rev() {
                if e.varset.contains(name) && self.mark_last(e, name, &mut child) {
                    return true;
                }
            }
        }
        // Not in the body: the only accesses live inside definitions.
        for idx in (0..defs.len()).rev() {
            if defs[idx].env.contains(name)
                && mark_last_in_def(defs, Some(&mut *frames), idx, name, self)
            {
                return true;
            }
        }
        false
    }

    fn mark_last_in_clause(
        &mut self,
        clause: &mut Clause,
        name: &str,
        frames: &mut Frames<'_, '_>,
    ) -> bool {
        let Clause { pats, body, .. } = clause;
        self.mark_last_in_parts(pats, body, name, frames)
    }

    fn mark_last_in_parts(
        &mut self,
        pats: &mut [Expr],
        body: &mut Expr,
        name: &str,
        frames: &mut Frames<'_, '_>,
    ) -> bool {
        if body.varset.contains(name) && self.mark_last(body, name, frames) {
            return true;
        }
        for pat in pats.iter_mut().rev() {
            if pat.varset.contains(name) && self.mark_last(pat, name, frames) {
                return true;
            }
        }
        false
    }

    fn mark_last_in_seq(
        &mut self,
        seq: &mut [Expr],
        name: &str,
        frames: &mut Frames<'_, '_>,
    ) -> bool {
        for e in seq.iter_mut().rev() {
            if e.varset.contains(name) && self.mark_last(e, name, frames) {
                return true;
            }
        }
        false
    }

    fn mark_last_in_entries(
        &mut self,
        entries: &mut [Entry],
        name: &str,
        frames: &mut Frames<'_, '_>,
    ) -> bool {
        for entry in entries.iter_mut().rev() {
            if entry.varset.contains(name) {
                if self.mark_last(&mut entry.value, name, frames) {
                    return true;
                }
                if self.mark_last(&mut entry.key, name, frames) {
                    return true;
                }
            }
        }
        false
    }

    /// Marks the last access of `name` within `e`. Returns `false` when the
    /// subtree contains no markable access.
    fn mark_last(&mut self, e: &mut Expr, name: &str, frames: &mut Frames<'_, '_>) -> bool {
        if !e.varset.contains(name) {
            return false;
        }
        let position = e.position;
        match &mut e.kind {
            ExprKind::Var {
                name: var_name,
                action,
            } => {
                if var_name.as_str() == name {
                    match action {
                        Some(Action::Access) => {
                            *action = Some(Action::Last);
                        }
                        Some(Action::Bind) => {
                            if !name.starts_with('_') {
                                self.warnings.push(Diagnostic::warning(
                                    format!("Unused variable '{name}'"),
                                    position,
                                ));
                            }
                            *action = Some(Action::Discard);
                        }
                        // Already refined by an earlier name's walk.
                        _ => {}
                    }
                    true
                } else {
                    // The target is reached through this closure.
                    let func = var_name.clone();
                    frames.mark_capture_last(self, &func, name)
                }
            }
            ExprKind::Match { pattern, value } => {
                self.mark_last(pattern, name, frames) || self.mark_last(value, name, frames)
            }
            ExprKind::Binary { left, right, .. } => {
                self.mark_last(right, name, frames) || self.mark_last(left, name, frames)
            }
            ExprKind::Unary { operand, .. } => self.mark_last(operand, name, frames),
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                // Both branches are marked: whichever runs does the final
                // access. Only when neither branch uses the name can the
                // condition hold the last access.
                let in_then = self.mark_last(then_branch, name, frames);
                let in_else = self.mark_last(else_branch, name, frames);
                if in_then || in_else {
                    true
                } else {
                    self.mark_last(cond, name, frames)
                }
            }
            ExprKind::Case { subj, clauses } => {
                for clause in clauses.iter_mut().rev() {
                    if clause.varset.contains(name)
                        && self.mark_last_in_clause(clause, name, frames)
                    {
                        return true;
                    }
                }
                self.mark_last(subj, name, frames)
            }
            ExprKind::Apply { func, args } => {
                self.mark_last_in_seq(args, name, frames) || self.mark_last(func, name, frames)
            }
            ExprKind::Array(elems) => self.mark_last_in_seq(elems, name, frames),
            ExprKind::Dict(entries) => self.mark_last_in_entries(entries, name, frames),
            ExprKind::DictUpdate { subj, entries } => {
                self.mark_last_in_entries(entries, name, frames)
                    || self.mark_last(subj, name, frames)
            }
            ExprKind::Do(block) => self.mark_last_in_block_with(block, name, frames),
            ExprKind::Lit(_) | ExprKind::Regex(_) => false,
        }
    }
}

// ============================================================================
// First-access pass (forward mirror, no closure descent)
// ============================================================================

/// Marks the first access of a block-scoped `name` in the closing block's
/// body.
pub(crate) fn mark_first_in_block(block: &mut Block, name: &str) -> bool {
    mark_first_in_seq(&mut block.seq, name)
}

/// Marks the first access of a clause-local `name`: patterns first (binds
/// are skipped), then the body.
pub(crate) fn mark_first_in_clause_parts(pats: &mut [Expr], body: &mut Expr, name: &str) -> bool {
    for pat in pats.iter_mut() {
        if pat.varset.contains(name) && mark_first(pat, name) {
            return true;
        }
    }
    mark_first(body, name)
}

fn mark_first_in_seq(seq: &mut [Expr], name: &str) -> bool {
    for e in seq.iter_mut() {
        if e.varset.contains(name) && mark_first(e, name) {
            return true;
        }
    }
    false
}

fn mark_first_in_entries(entries: &mut [Entry], name: &str) -> bool {
    for entry in entries.iter_mut() {
        if entry.varset.contains(name) {
            if mark_first(&mut entry.key, name) {
                return true;
            }
            if mark_first(&mut entry.value, name) {
                return true;
            }
        }
    }
    false
}

fn mark_first(e: &mut Expr, name: &str) -> bool {
    if !e.varset.contains(name) {
        return false;
    }
    match &mut e.kind {
        ExprKind::Var {
            name: var_name,
            action,
        } => {
            if var_name.as_str() != name {
                // Closure-mediated; never first.
                return false;
            }
            match action {
                Some(Action::Access) => {
                    *action = Some(Action::First);
                    true
                }
                Some(Action::Last) => {
                    *action = Some(Action::Only);
                    true
                }
                // A bind or discard is not a read.
                Some(Action::Bind | Action::Discard) => false,
                _ => true,
            }
        }
        ExprKind::Match { pattern, value } => {
            // The right side is evaluated before the left binds.
            mark_first(value, name) || mark_first(pattern, name)
        }
        ExprKind::Binary { left, right, .. } => {
            mark_first(left, name) || mark_first(right, name)
        }
        ExprKind::Unary { operand, .. } => mark_first(operand, name),
        ExprKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            if cond.varset.contains(name) {
                mark_first(cond, name)
            } else if then_branch.varset.contains(name) && else_branch.varset.contains(name) {
                // A name read in only one branch has no guaranteed first
                // access; it keeps the plain access tag.
                let in_then = mark_first(then_branch, name);
                let in_else = mark_first(else_branch, name);
                in_then || in_else
            } else {
                false
            }
        }
        ExprKind::Case { subj, clauses } => {
            if mark_first(subj, name) {
                return true;
            }
            for clause in clauses.iter_mut() {
                if clause.varset.contains(name) {
                    let Clause { pats, body, .. } = clause;
                    if mark_first_in_clause_parts(pats, body, name) {
                        return true;
                    }
                }
            }
            false
        }
        ExprKind::Apply { func, args } => {
            mark_first(func, name) || mark_first_in_seq(args, name)
        }
        ExprKind::Array(elems) => mark_first_in_seq(elems, name),
        ExprKind::Dict(entries) => mark_first_in_entries(entries, name),
        ExprKind::DictUpdate { subj, entries } => {
            mark_first(subj, name) || mark_first_in_entries(entries, name)
        }
        ExprKind::Do(block) => mark_first_in_seq(&mut block.seq, name),
        ExprKind::Lit(_) | ExprKind::Regex(_) => false,
    }
}
