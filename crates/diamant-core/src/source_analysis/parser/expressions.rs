// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing: the precedence chain and the atoms.
//!
//! Each level parses the next-tighter level and folds matching operators
//! left-associatively. `=` is the loosest level and right-associative; the
//! unified grammar parses patterns with the same functions and leaves the
//! context check to the validation walk.

use crate::ast::{BinOp, Clause, Entry, Expr, ExprKind, UnOp};
use crate::source_analysis::{Diagnostic, TokenKind};

use super::Parser;

impl Parser<'_> {
    /// Level 1: `=`, right-associative.
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, Diagnostic> {
        let left = self.parse_logical()?;
        if let Some(position) = self.try_eat(&TokenKind::Equals)? {
            let right = self.parse_expr()?;
            return Ok(Expr::new(
                ExprKind::Match {
                    pattern: Box::new(left),
                    value: Box::new(right),
                },
                position,
            ));
        }
        Ok(left)
    }

    /// Level 2: `and`, `or`.
    fn parse_logical(&mut self) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.current() {
                TokenKind::And => BinOp::And,
                TokenKind::Or => BinOp::Or,
                _ => break,
            };
            let position = self.advance()?.position();
            let right = self.parse_relational()?;
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                position,
            );
        }
        Ok(left)
    }

    /// Level 3: relational operators.
    fn parse_relational(&mut self) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.current() {
                TokenKind::Less => BinOp::Less,
                TokenKind::Greater => BinOp::Greater,
                TokenKind::LessEq => BinOp::LessEq,
                TokenKind::GreaterEq => BinOp::GreaterEq,
                TokenKind::EqEq => BinOp::Equal,
                TokenKind::NotEq => BinOp::NotEqual,
                _ => break,
            };
            let position = self.advance()?.position();
            let right = self.parse_additive()?;
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                position,
            );
        }
        Ok(left)
    }

    /// Level 4: `+`, `-`, `~`, `@`.
    fn parse_additive(&mut self) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Subtract,
                TokenKind::Tilde => BinOp::Tilde,
                TokenKind::At => BinOp::At,
                _ => break,
            };
            let position = self.advance()?.position();
            let right = self.parse_multiplicative()?;
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                position,
            );
        }
        Ok(left)
    }

    /// Level 5: `*`, `/`, `div`, `mod`.
    fn parse_multiplicative(&mut self) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_postfix()?;
        loop {
            let op = match self.current() {
                TokenKind::Star => BinOp::Multiply,
                TokenKind::Slash => BinOp::Divide,
                TokenKind::Div => BinOp::IntDivide,
                TokenKind::Mod => BinOp::Modulo,
                _ => break,
            };
            let position = self.advance()?.position();
            let right = self.parse_postfix()?;
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                position,
            );
        }
        Ok(left)
    }

    /// Level 6: function application `e(args)` and dict update
    /// `e{entries}`, repeatable.
    fn parse_postfix(&mut self) -> Result<Expr, Diagnostic> {
        let mut e = self.parse_primary()?;
        loop {
            if let Some(position) = self.try_eat(&TokenKind::LeftParen)? {
                let mut args = Vec::new();
                if self.try_eat(&TokenKind::RightParen)?.is_none() {
                    loop {
                        args.push(self.parse_expr()?);
                        if self.try_eat(&TokenKind::Comma)?.is_none() {
                            break;
                        }
                    }
                    self.eat(&TokenKind::RightParen)?;
                }
                e = Expr::new(
                    ExprKind::Apply {
                        func: Box::new(e),
                        args,
                    },
                    position,
                );
            } else if let Some(position) = self.try_eat(&TokenKind::LeftBrace)? {
                let entries = self.parse_entries()?;
                e = Expr::new(
                    ExprKind::DictUpdate {
                        subj: Box::new(e),
                        entries,
                    },
                    position,
                );
            } else {
                return Ok(e);
            }
        }
    }

    /// Level 7: prefix operators and atoms.
    fn parse_primary(&mut self) -> Result<Expr, Diagnostic> {
        match self.current() {
            TokenKind::Case => {
                let position = self.advance()?.position();
                let subj = self.parse_expr()?;
                self.eat(&TokenKind::Of)?;
                let clauses = self.parse_case_alts()?;
                Ok(Expr::new(
                    ExprKind::Case {
                        subj: Box::new(subj),
                        clauses,
                    },
                    position,
                ))
            }
            TokenKind::Do => {
                let position = self.advance()?.position();
                let block = self.parse_block_body()?;
                Ok(Expr::new(ExprKind::Do(block), position))
            }
            TokenKind::If => {
                let position = self.advance()?.position();
                let cond = self.parse_expr()?;
                self.eat(&TokenKind::Then)?;
                let then_branch = self.parse_expr()?;
                self.try_eat(&TokenKind::Semicolon)?; // optional before else
                self.eat(&TokenKind::Else)?;
                let else_branch = self.parse_expr()?;
                Ok(Expr::new(
                    ExprKind::If {
                        cond: Box::new(cond),
                        then_branch: Box::new(then_branch),
                        else_branch: Box::new(else_branch),
                    },
                    position,
                ))
            }
            TokenKind::LeftBracket => {
                let position = self.advance()?.position();
                let mut elems = Vec::new();
                if self.try_eat(&TokenKind::RightBracket)?.is_none() {
                    loop {
                        elems.push(self.parse_expr()?);
                        if self.try_eat(&TokenKind::Comma)?.is_none() {
                            break;
                        }
                    }
                    self.eat(&TokenKind::RightBracket)?;
                }
                Ok(Expr::new(ExprKind::Array(elems), position))
            }
            TokenKind::LeftBrace => {
                let position = self.advance()?.position();
                let entries = self.parse_entries()?;
                Ok(Expr::new(ExprKind::Dict(entries), position))
            }
            TokenKind::Ident(_) => {
                let token = self.advance()?;
                let position = token.position();
                let TokenKind::Ident(name) = token.into_kind() else {
                    unreachable!("current() matched an identifier");
                };
                Ok(Expr::new(ExprKind::Var { name, action: None }, position))
            }
            TokenKind::Lit(_) => {
                let token = self.advance()?;
                let position = token.position();
                let TokenKind::Lit(value) = token.into_kind() else {
                    unreachable!("current() matched a literal");
                };
                Ok(Expr::new(ExprKind::Lit(value), position))
            }
            TokenKind::Regex(_) => {
                let token = self.advance()?;
                let position = token.position();
                let TokenKind::Regex(pattern) = token.into_kind() else {
                    unreachable!("current() matched a regex");
                };
                Ok(Expr::new(ExprKind::Regex(pattern), position))
            }
            TokenKind::Minus => {
                let position = self.advance()?.position();
                let operand = self.parse_expr()?;
                Ok(Expr::new(
                    ExprKind::Unary {
                        op: UnOp::Negate,
                        operand: Box::new(operand),
                    },
                    position,
                ))
            }
            TokenKind::Not => {
                let position = self.advance()?.position();
                let operand = self.parse_expr()?;
                Ok(Expr::new(
                    ExprKind::Unary {
                        op: UnOp::Not,
                        operand: Box::new(operand),
                    },
                    position,
                ))
            }
            TokenKind::LeftParen => {
                self.advance()?;
                let e = self.parse_expr()?;
                self.eat(&TokenKind::RightParen)?;
                Ok(e)
            }
            _ => Err(self.unexpected("expr")),
        }
    }

    /// Case alternatives: `pat -> expr`, `;`-separated, ended by `end`.
    fn parse_case_alts(&mut self) -> Result<Vec<Clause>, Diagnostic> {
        let mut clauses = Vec::new();
        loop {
            let pat = self.parse_expr()?;
            self.eat(&TokenKind::Arrow)?;
            let body = self.parse_expr()?;
            clauses.push(Clause::new(vec![pat], body));
            if self.try_eat(&TokenKind::Semicolon)?.is_none() {
                break;
            }
            if self.current() == &TokenKind::End {
                break; // trailing separator before an explicit end
            }
        }
        self.eat(&TokenKind::End)?;
        Ok(clauses)
    }

    /// Key-value entries after a consumed `{`, up to and including `}`.
    fn parse_entries(&mut self) -> Result<Vec<Entry>, Diagnostic> {
        let mut entries = Vec::new();
        if self.try_eat(&TokenKind::RightBrace)?.is_some() {
            return Ok(entries);
        }
        loop {
            let key = self.parse_expr()?;
            self.eat(&TokenKind::Colon)?;
            let value = self.parse_expr()?;
            entries.push(Entry::new(key, value));
            if self.try_eat(&TokenKind::Comma)?.is_none() {
                break;
            }
        }
        self.eat(&TokenKind::RightBrace)?;
        Ok(entries)
    }
}
