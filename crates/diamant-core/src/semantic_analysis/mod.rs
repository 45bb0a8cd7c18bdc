// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Semantic analysis: scoping, closure environments, and access liveness.
//!
//! [`annotate`] walks a parsed tree and fills in the semantic fields in
//! place:
//!
//! - **Scoping.** Every `do` block opens a scope. Function definitions are
//!   pre-bound so they can be defined in any order and be mutually
//!   recursive; ordinary variables bind at their `=`-pattern and must be
//!   bound before use. An unresolvable reference raises
//!   `Undefined variable`.
//! - **Closure environments.** A function definition's `env` is the merged
//!   varset of its clauses minus its parameters: the free variables it
//!   captures. Using a function counts as accessing every variable in its
//!   environment, transitively, so a closure cannot be used before all of
//!   its captures are bound. Inside function bodies, unresolved names are
//!   provisionally treated as captures; they are checked at each use site.
//! - **Varsets.** Every container node receives the union of its children's
//!   varsets; closing constructs subtract their local names.
//! - **Liveness.** When a scope closes, the [`liveness`] passes refine the
//!   actions of the scope's names: `access` becomes `first`/`last`/`only`
//!   where guaranteed, and an unread binding becomes `discard` with an
//!   unused-variable warning (names starting with `_` are exempt).
//!
//! The pass is fail-fast: the first [`SemanticError`] aborts annotation.
//! Warnings are collected and returned alongside the annotated tree.

mod error;
mod liveness;
mod scope;
mod varset;


pub use error::{SemanticError, SemanticErrorKind};
pub use scope::{Scope, ScopeStack, ScopeValue};
pub use varset::{Action, VarSet};

use ecow::EcoString;

use crate::ast::{Block, Clause, Entry, Expr, ExprKind, FunctionDef};
use crate::source_analysis::{Diagnostic, Position};

use liveness::Marker;

/// The result of a successful annotation.
#[derive(Debug, Clone)]
pub struct Annotated {
    /// The annotated tree.
    pub ast: Expr,
    /// Unused-variable warnings, in scope-closing order.
    pub warnings: Vec<Diagnostic>,
}

/// Annotates a parse tree with varsets, access actions, and closure
/// environments.
///
/// The tree must be the top-level `do` expression produced by
/// [`parse`](crate::source_analysis::parse).
///
/// # Errors
///
/// Returns the first [`SemanticError`]: an undefined variable (including a
/// closure used before its captures are bound) or a pattern binding a
/// function name.
pub fn annotate(mut ast: Expr) -> Result<Annotated, SemanticError> {
    let position = ast.position;
    let ExprKind::Do(block) = &mut ast.kind else {
        return Err(SemanticError::new(
            SemanticErrorKind::ExpectedTopLevelBlock,
            position,
        ));
    };
    let mut annotator = Annotator::default();
    let varset = annotator.block(block)?;
    ast.varset = varset;
    Ok(Annotated {
        ast,
        warnings: annotator.warnings,
    })
}

/// How a name resolved in the nested scope.
enum Resolution {
    Unbound,
    Variable,
    Function,
}

#[derive(Default)]
struct Annotator {
    scopes: ScopeStack,
    warnings: Vec<Diagnostic>,
    /// Nesting depth of function-definition bodies. Inside one, unresolved
    /// names become provisional captures instead of immediate errors; they
    /// are validated wherever the closure is used.
    fn_depth: usize,
}

impl Annotator {
    /// Annotates a block: definitions first (pre-bound for out-of-order
    /// use), then the body in textual order. Returns the block's varset:
    /// the accesses of variables bound outside it.
    fn block(&mut self, block: &mut Block) -> Result<VarSet, SemanticError> {
        let mut scope = Scope::new();
        for def in &block.defs {
            scope.define(def.name.clone(), ScopeValue::Function(VarSet::new()));
        }
        self.scopes.push(scope);

        for idx in 0..block.defs.len() {
            self.function_def(&mut block.defs[idx])?;
            // Publish the environment so later uses can verify that every
            // captured variable is bound before the closure is touched.
            let name = block.defs[idx].name.clone();
            let env = block.defs[idx].env.clone();
            self.scopes.define(name, ScopeValue::Function(env));
        }

        for entry in &mut block.seq {
            self.binding_or_expr(entry)?;
        }

        let scope = self.scopes.pop();
        for name in scope.names() {
            let mut marker = Marker::new(&mut self.warnings);
            if marker.mark_last_in_block(block, name) {
                liveness::mark_first_in_block(block, name);
            } else if !name.starts_with('_') {
                // A function nobody referenced: no access site exists.
                if let Some(def) = block.def(name) {
                    let position = def.position;
                    self.warnings.push(Diagnostic::warning(
                        format!("Unused function '{name}'"),
                        position,
                    ));
                }
            }
        }

        let mut varset = VarSet::new();
        for e in &block.seq {
            varset.union(&e.varset);
        }
        for def in &block.defs {
            varset.union(&def.env);
        }
        for name in scope.names() {
            varset.remove(name);
        }
        Ok(varset)
    }

    fn function_def(&mut self, def: &mut FunctionDef) -> Result<(), SemanticError> {
        self.fn_depth += 1;
        let result = self.clauses(&mut def.clauses);
        self.fn_depth -= 1;
        result?;
        let mut env = VarSet::new();
        for clause in &def.clauses {
            env.union(&clause.varset);
        }
        def.env = env;
        Ok(())
    }

    /// Annotates case alternatives or function clauses. Patterns bind into
    /// a fresh scope; the clause's exposed varset excludes those locals.
    fn clauses(&mut self, clauses: &mut [Clause]) -> Result<(), SemanticError> {
        for clause in clauses {
            self.scopes.push(Scope::new());
            for pat in &mut clause.pats {
                self.pattern(pat)?;
            }
            self.expr(&mut clause.body)?;
            let local = self.scopes.pop();

            let mut varset = VarSet::new();
            for pat in &clause.pats {
                varset.union(&pat.varset);
            }
            varset.union(&clause.body.varset);
            clause.varset = varset;

            for name in local.names() {
                let mut marker = Marker::new(&mut self.warnings);
                if marker.mark_last_in_clause_parts(&mut clause.pats, &mut clause.body, name) {
                    liveness::mark_first_in_clause_parts(
                        &mut clause.pats,
                        &mut clause.body,
                        name,
                    );
                }
            }
            for name in local.names() {
                clause.varset.remove(name);
            }
        }
        Ok(())
    }

    /// A `=` entry in a block body: the right side is annotated in the
    /// current scope first (there is no `letrec`), then the left side binds
    /// as a pattern.
    fn binding_or_expr(&mut self, e: &mut Expr) -> Result<(), SemanticError> {
        if let ExprKind::Match { pattern, value } = &mut e.kind {
            self.expr(value)?;
            self.pattern(pattern)?;
            let mut varset = pattern.varset.clone();
            varset.union(&value.varset);
            e.varset = varset;
            Ok(())
        } else {
            self.expr(e)
        }
    }

    fn exprs(&mut self, es: &mut [Expr]) -> Result<VarSet, SemanticError> {
        let mut varset = VarSet::new();
        for e in es.iter_mut() {
            self.expr(e)?;
            varset.union(&e.varset);
        }
        Ok(varset)
    }

    fn entries(
        &mut self,
        entries: &mut [Entry],
        as_pattern: bool,
    ) -> Result<VarSet, SemanticError> {
        let mut varset = VarSet::new();
        for entry in entries.iter_mut() {
            if as_pattern {
                self.pattern(&mut entry.key)?;
                self.pattern(&mut entry.value)?;
            } else {
                self.expr(&mut entry.key)?;
                self.expr(&mut entry.value)?;
            }
            let mut entry_varset = entry.key.varset.clone();
            entry_varset.union(&entry.value.varset);
            entry.varset = entry_varset;
            varset.union(&entry.varset);
        }
        Ok(varset)
    }

    fn expr(&mut self, e: &mut Expr) -> Result<(), SemanticError> {
        let position = e.position;
        let varset = match &mut e.kind {
            ExprKind::Lit(_) | ExprKind::Regex(_) => return Ok(()),
            ExprKind::Var { name, action } => {
                let varset = self.resolve(name, position)?;
                *action = Some(Action::Access);
                varset
            }
            ExprKind::Binary { left, right, .. } => {
                self.expr(right)?;
                self.expr(left)?;
                let mut varset = left.varset.clone();
                varset.union(&right.varset);
                varset
            }
            ExprKind::Unary { operand, .. } => {
                self.expr(operand)?;
                operand.varset.clone()
            }
            ExprKind::Apply { func, args } => {
                self.expr(func)?;
                let mut varset = func.varset.clone();
                varset.union(&self.exprs(args)?);
                varset
            }
            ExprKind::Case { subj, clauses } => {
                self.expr(subj)?;
                self.clauses(clauses)?;
                let mut varset = subj.varset.clone();
                for clause in clauses.iter() {
                    varset.union(&clause.varset);
                }
                varset
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.expr(cond)?;
                self.expr(then_branch)?;
                self.expr(else_branch)?;
                let mut varset = cond.varset.clone();
                varset.union(&then_branch.varset);
                varset.union(&else_branch.varset);
                varset
            }
            ExprKind::Array(elems) => self.exprs(elems)?,
            ExprKind::Dict(entries) => self.entries(entries, false)?,
            ExprKind::DictUpdate { subj, entries } => {
                self.expr(subj)?;
                let mut varset = subj.varset.clone();
                varset.union(&self.entries(entries, false)?);
                varset
            }
            ExprKind::Do(block) => self.block(block)?,
            ExprKind::Match { .. } => {
                // Only reachable for trees that skipped parser validation;
                // treat like a block-body binding.
                return self.binding_or_expr(e);
            }
        };
        e.varset = varset;
        Ok(())
    }

    fn pattern(&mut self, e: &mut Expr) -> Result<(), SemanticError> {
        let position = e.position;
        let op = e.op();
        let varset = match &mut e.kind {
            ExprKind::Var { name, action } => {
                if name.as_str() == "_" {
                    // Match-all; binds nothing.
                    return Ok(());
                }
                let resolution = match self.scopes.lookup(name) {
                    None => Resolution::Unbound,
                    Some(ScopeValue::Variable) => Resolution::Variable,
                    Some(ScopeValue::Function(_)) => Resolution::Function,
                };
                match resolution {
                    Resolution::Unbound => {
                        self.scopes.define(name.clone(), ScopeValue::Variable);
                        *action = Some(Action::Bind);
                        VarSet::singleton(name.clone(), Action::Bind)
                    }
                    Resolution::Variable => {
                        // Already bound: the pattern matches its value.
                        *action = Some(Action::Access);
                        VarSet::singleton(name.clone(), Action::Access)
                    }
                    Resolution::Function => {
                        return Err(SemanticError::new(
                            SemanticErrorKind::PatternMatchOnFunction,
                            position,
                        ));
                    }
                }
            }
            ExprKind::Lit(_) | ExprKind::Regex(_) => return Ok(()),
            ExprKind::Array(elems) => {
                let mut varset = VarSet::new();
                for elem in elems.iter_mut() {
                    self.pattern(elem)?;
                    varset.union(&elem.varset);
                }
                varset
            }
            ExprKind::Dict(entries) => self.entries(entries, true)?,
            ExprKind::DictUpdate { subj, entries } => {
                self.pattern(subj)?;
                let mut varset = subj.varset.clone();
                varset.union(&self.entries(entries, true)?);
                varset
            }
            ExprKind::Binary { op, left, right } if op.is_pattern_op() => {
                self.pattern(left)?;
                self.pattern(right)?;
                let mut varset = left.varset.clone();
                varset.union(&right.varset);
                varset
            }
            ExprKind::Match { pattern, value } => {
                // Nested match: both sides are patterns.
                self.pattern(pattern)?;
                self.pattern(value)?;
                let mut varset = pattern.varset.clone();
                varset.union(&value.varset);
                varset
            }
            _ => {
                return Err(SemanticError::new(
                    SemanticErrorKind::InvalidPattern { op: op.into() },
                    position,
                ));
            }
        };
        e.varset = varset;
        Ok(())
    }

    /// Resolves a variable reference, transitively resolving the captured
    /// environment of any function it denotes. Every transitively captured
    /// name is recorded as an access.
    fn resolve(&self, name: &EcoString, position: Position) -> Result<VarSet, SemanticError> {
        let mut acc = VarSet::new();
        self.resolve_into(name, position, &mut acc)?;
        Ok(acc)
    }

    fn resolve_into(
        &self,
        name: &EcoString,
        position: Position,
        acc: &mut VarSet,
    ) -> Result<(), SemanticError> {
        if acc.contains(name) {
            return Ok(()); // already explored (cycles between closures)
        }
        match self.scopes.lookup(name) {
            None => {
                if self.fn_depth > 0 {
                    // Inside a function body an unresolved name may be bound
                    // later in the enclosing block; record it as a capture
                    // and let the use site validate it.
                    acc.insert(name.clone(), Action::Access);
                    Ok(())
                } else {
                    Err(SemanticError::new(
                        SemanticErrorKind::UndefinedVariable { name: name.clone() },
                        position,
                    ))
                }
            }
            Some(ScopeValue::Variable) => {
                acc.insert(name.clone(), Action::Access);
                Ok(())
            }
            Some(ScopeValue::Function(env)) => {
                acc.insert(name.clone(), Action::Access);
                for captured in env.names() {
                    self.resolve_into(captured, position, acc)?;
                }
                Ok(())
            }
        }
    }
}
