// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Diamant source code.
//!
//! This module converts source text into a stream of [`Token`]s. The lexer
//! is hand-written and pull-based: the parser requests one token at a time.
//!
//! # Layout (off-side) rule
//!
//! The keywords `do`, `of`, `let` and `where` open a layout block whose
//! indentation level is the column of the next token. That column is pushed
//! onto a layout stack, and before each subsequent token the lexer compares
//! the token's column `c` against the innermost frame's column `L`:
//!
//! - `c > L` — the token continues the current item; nothing is synthesized.
//! - `c == L` — a `;` token is synthesized (unless one was just emitted).
//! - `c < L` — an `end` token is synthesized (`in` if the frame was opened
//!   by `let`), the frame is popped, and the comparison repeats against the
//!   next frame.
//!
//! End of input flushes all remaining frames as their closers before `eof`.
//! Explicit `end`/`in` tokens in the source pop the frame they close.
//!
//! The lexer starts with a pending frame as if the file were preceded by
//! `do`, so a source file is an implicit top-level block: its first token's
//! column becomes the top-level indentation level.
//!
//! # Regex vs. division
//!
//! `/` after an identifier, a literal, or a closing bracket is the division
//! operator; anywhere else it starts a regex literal.

use std::iter::Peekable;
use std::str::CharIndices;

use ecow::EcoString;

use super::{Diagnostic, Literal, Position, Token, TokenKind};

/// Tab stops are every eight columns.
const TAB_WIDTH: u32 = 8;

/// The keyword that opened a layout frame.
///
/// `let` frames close with `in`; all others close with `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LayoutOpener {
    Do,
    Of,
    Let,
    Where,
}

impl LayoutOpener {
    fn closer(self) -> TokenKind {
        match self {
            Self::Let => TokenKind::In,
            Self::Do | Self::Of | Self::Where => TokenKind::End,
        }
    }
}

/// A layout frame: the opening keyword and the column of the first token
/// that followed it.
#[derive(Debug, Clone, Copy)]
struct LayoutFrame {
    opener: LayoutOpener,
    column: u32,
}

/// A lexer that tokenizes Diamant source code.
///
/// Produces tokens one at a time via [`Lexer::next_token`]. The previous
/// token is tracked internally; it drives regex/division disambiguation,
/// layout-frame opening, and `;`-synthesis suppression.
///
/// # Examples
///
/// ```
/// use diamant_core::source_analysis::{Lexer, TokenKind};
///
/// let mut lexer = Lexer::new("x + 1");
/// assert!(matches!(lexer.next_token().unwrap().kind(), TokenKind::Ident(_)));
/// assert!(matches!(lexer.next_token().unwrap().kind(), TokenKind::Plus));
/// ```
pub struct Lexer<'src> {
    /// The source text being lexed.
    source: &'src str,
    /// Character iterator with byte positions.
    chars: Peekable<CharIndices<'src>>,
    /// Current byte position in source.
    offset: usize,
    /// Current 1-based line.
    line: u32,
    /// Current 1-based column (tab stops every 8).
    column: u32,
    /// Stack of open layout frames, innermost last.
    layout: Vec<LayoutFrame>,
    /// The kind of the most recently emitted token.
    prev: Option<TokenKind>,
    /// Set when the previous token was a layout opener; the next real token
    /// pushes a frame at its own column. A synthesized token cancels it.
    pending_opener: Option<LayoutOpener>,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("line", &self.line)
            .field("column", &self.column)
            .field("layout_depth", &self.layout.len())
            .field("remaining", &self.source.get(self.offset..).unwrap_or(""))
            .finish()
    }
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text.
    ///
    /// The file is treated as an implicit `do` block: the first token's
    /// column becomes the top-level layout level.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            offset: 0,
            line: 1,
            column: 1,
            layout: Vec::new(),
            prev: None,
            pending_opener: Some(LayoutOpener::Do),
        }
    }

    /// Produces the next token, synthesizing layout tokens as needed.
    ///
    /// After the layout stack has been flushed at end of input, every
    /// subsequent call returns `eof`.
    ///
    /// # Errors
    ///
    /// Returns a [`Diagnostic`] for an unmatched byte or a malformed
    /// numeric, string, or regex literal.
    pub fn next_token(&mut self) -> Result<Token, Diagnostic> {
        self.skip_whitespace_and_comments();
        let position = self.position();

        if self.peek_char().is_none() {
            // End of input: flush remaining layout frames, then eof.
            if let Some(frame) = self.layout.pop() {
                return Ok(self.synthesize(frame.opener.closer(), position));
            }
            self.prev = Some(TokenKind::Eof);
            return Ok(Token::new(TokenKind::Eof, position));
        }

        // Compare the upcoming token's column against the innermost frame.
        if self.prev.is_some() {
            if let Some(frame) = self.layout.last().copied() {
                if self.column < frame.column {
                    self.layout.pop();
                    return Ok(self.synthesize(frame.opener.closer(), position));
                }
                if self.column == frame.column
                    && !matches!(self.prev, Some(TokenKind::Semicolon))
                {
                    return Ok(self.synthesize(TokenKind::Semicolon, position));
                }
            }
        }

        let kind = self.lex_token_kind(position)?;

        // The token after an opener fixes the new frame's column.
        if let Some(opener) = self.pending_opener.take() {
            self.layout.push(LayoutFrame {
                opener,
                column: position.column(),
            });
        }
        match kind {
            TokenKind::Do => self.pending_opener = Some(LayoutOpener::Do),
            TokenKind::Of => self.pending_opener = Some(LayoutOpener::Of),
            TokenKind::Let => self.pending_opener = Some(LayoutOpener::Let),
            TokenKind::Where => self.pending_opener = Some(LayoutOpener::Where),
            // An explicit closer pops the frame it closes.
            TokenKind::End | TokenKind::In => {
                self.layout.pop();
            }
            _ => {}
        }

        self.prev = Some(kind.clone());
        Ok(Token::new(kind, position))
    }

    /// Emits a layout-synthesized token at the given position.
    fn synthesize(&mut self, kind: TokenKind, position: Position) -> Token {
        // A synthesized token cancels a pending opener: the opener keyword is
        // no longer the previous token, so its frame is never created.
        self.pending_opener = None;
        self.prev = Some(kind.clone());
        Token::new(kind, position)
    }

    // ========================================================================
    // Character handling
    // ========================================================================

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Peeks `n+1` characters ahead without consuming (n=0 is the same as
    /// `peek_char`).
    fn peek_char_n(&self, n: usize) -> Option<char> {
        let mut iter = self.chars.clone();
        for _ in 0..n {
            iter.next();
        }
        iter.next().map(|(_, c)| c)
    }

    /// Consumes the next character, advancing the column by one.
    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.offset = pos + c.len_utf8();
        self.column += 1;
        Some(c)
    }

    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn position(&self) -> Position {
        Position::new(self.offset as u32, self.line, self.column)
    }

    fn text_from(&self, start: Position) -> &'src str {
        &self.source[start.offset() as usize..self.offset]
    }

    /// Skips newlines, horizontal whitespace and `#` line comments,
    /// maintaining line and column. A tab advances the column to the next
    /// multiple-of-eight plus one.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek_char() {
                Some('\r') if self.peek_char_n(1) == Some('\n') => {
                    self.advance();
                    self.advance();
                    self.line += 1;
                    self.column = 1;
                }
                Some(c) if is_line_terminator(c) => {
                    self.advance();
                    self.line += 1;
                    self.column = 1;
                }
                Some('\t') => {
                    self.advance();
                    // advance() added 1; round up to the next tab stop.
                    self.column = self.column - 1 + TAB_WIDTH - (self.column - 2) % TAB_WIDTH;
                }
                Some(c) if is_horizontal_space(c) => {
                    self.advance();
                }
                Some('#') => {
                    self.advance_while(|c| !is_line_terminator(c));
                }
                _ => break,
            }
        }
    }

    // ========================================================================
    // Token recognition
    // ========================================================================

    /// Lexes a token at the current offset.
    fn lex_token_kind(&mut self, position: Position) -> Result<TokenKind, Diagnostic> {
        let c = self.peek_char().expect("caller checked for end of input");
        match c {
            '(' => Ok(self.single(TokenKind::LeftParen)),
            ')' => Ok(self.single(TokenKind::RightParen)),
            '[' => Ok(self.single(TokenKind::LeftBracket)),
            ']' => Ok(self.single(TokenKind::RightBracket)),
            '{' => Ok(self.single(TokenKind::LeftBrace)),
            '}' => Ok(self.single(TokenKind::RightBrace)),
            ',' => Ok(self.single(TokenKind::Comma)),
            ':' => Ok(self.single(TokenKind::Colon)),
            ';' => Ok(self.single(TokenKind::Semicolon)),
            '+' => Ok(self.single(TokenKind::Plus)),
            '*' => Ok(self.single(TokenKind::Star)),
            '~' => Ok(self.single(TokenKind::Tilde)),
            '@' => Ok(self.single(TokenKind::At)),
            '\\' => Ok(self.single(TokenKind::Backslash)),
            '≤' => Ok(self.single(TokenKind::LessEq)),
            '≥' => Ok(self.single(TokenKind::GreaterEq)),
            '≠' => Ok(self.single(TokenKind::NotEq)),
            '-' => {
                self.advance();
                if self.peek_char() == Some('>') {
                    self.advance();
                    Ok(TokenKind::Arrow)
                } else {
                    Ok(TokenKind::Minus)
                }
            }
            '<' => {
                self.advance();
                if self.peek_char() == Some('=') {
                    self.advance();
                    Ok(TokenKind::LessEq)
                } else {
                    Ok(TokenKind::Less)
                }
            }
            '>' => {
                self.advance();
                if self.peek_char() == Some('=') {
                    self.advance();
                    Ok(TokenKind::GreaterEq)
                } else {
                    Ok(TokenKind::Greater)
                }
            }
            '=' => {
                self.advance();
                match self.peek_char() {
                    Some('=') => {
                        self.advance();
                        Ok(TokenKind::EqEq)
                    }
                    Some('<') => {
                        self.advance();
                        Ok(TokenKind::LessEq)
                    }
                    _ => Ok(TokenKind::Equals),
                }
            }
            '!' if self.peek_char_n(1) == Some('=') => {
                self.advance();
                self.advance();
                Ok(TokenKind::NotEq)
            }
            '/' => {
                if self.prev.as_ref().is_some_and(TokenKind::ends_operand) {
                    Ok(self.single(TokenKind::Slash))
                } else {
                    self.lex_regex(position)
                }
            }
            '0'..='9' => self.lex_number(position),
            '"' => self.lex_string(position),
            c if is_ident_start(c) => Ok(self.lex_word(position)),
            _ => Err(Diagnostic::error(
                format!(
                    "Unmatched token on line {}, column {}",
                    position.line(),
                    position.column()
                ),
                position,
            )),
        }
    }

    /// Consumes one character and returns the given kind.
    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Lexes a numeric literal: `(0|[1-9][0-9]*)(\.[0-9]+)?([eE][-+]?[0-9]+)?`.
    ///
    /// A text containing `.`, `e` or `E` decodes as a double; anything else
    /// as a 32-bit integer. The sign is never part of the literal; a leading
    /// `-` lexes as the minus operator and the parser builds a unary node.
    fn lex_number(&mut self, position: Position) -> Result<TokenKind, Diagnostic> {
        let first = self.advance().expect("caller matched a digit");
        if first != '0' {
            self.advance_while(|c| c.is_ascii_digit());
        }

        let mut is_float = false;
        if self.peek_char() == Some('.') && self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
            is_float = true;
        }

        if matches!(self.peek_char(), Some('e' | 'E')) {
            let after_sign = match self.peek_char_n(1) {
                Some('+' | '-') => self.peek_char_n(2),
                other => other,
            };
            if after_sign.is_some_and(|c| c.is_ascii_digit()) {
                self.advance(); // e/E
                if matches!(self.peek_char(), Some('+' | '-')) {
                    self.advance();
                }
                self.advance_while(|c| c.is_ascii_digit());
                is_float = true;
            }
        }

        let text = self.text_from(position);
        let literal = if is_float {
            text.parse::<f64>().ok().map(Literal::Float)
        } else {
            text.parse::<i32>().ok().map(Literal::Int)
        };
        literal
            .map(TokenKind::Lit)
            .ok_or_else(|| Diagnostic::error("Malformed numeric literal", position))
    }

    /// Lexes a double-quoted string literal with JSON-compatible escapes.
    fn lex_string(&mut self, position: Position) -> Result<TokenKind, Diagnostic> {
        self.advance(); // opening quote
        let mut text = String::new();
        loop {
            match self.peek_char() {
                None => {
                    return Err(Diagnostic::error("Unterminated string literal", position));
                }
                Some(c) if is_line_terminator(c) => {
                    return Err(Diagnostic::error("Unterminated string literal", position));
                }
                Some('"') => {
                    self.advance();
                    return Ok(TokenKind::Lit(Literal::String(EcoString::from(text))));
                }
                Some('\\') => {
                    self.advance();
                    let escape_pos = self.position();
                    match self.advance() {
                        None => {
                            return Err(Diagnostic::error(
                                "Unterminated string literal",
                                position,
                            ));
                        }
                        Some('b') => text.push('\u{8}'),
                        Some('f') => text.push('\u{c}'),
                        Some('n') => text.push('\n'),
                        Some('r') => text.push('\r'),
                        Some('t') => text.push('\t'),
                        Some('u') => {
                            let mut codepoint: u32 = 0;
                            for _ in 0..4 {
                                let digit = self
                                    .peek_char()
                                    .and_then(|c| c.to_digit(16))
                                    .ok_or_else(|| {
                                        Diagnostic::error(
                                            "Malformed \\u escape in string literal",
                                            escape_pos,
                                        )
                                    })?;
                                self.advance();
                                codepoint = codepoint * 16 + digit;
                            }
                            let decoded = char::from_u32(codepoint).ok_or_else(|| {
                                Diagnostic::error(
                                    "Malformed \\u escape in string literal",
                                    escape_pos,
                                )
                            })?;
                            text.push(decoded);
                        }
                        // Only ", \ and / are meaningful; anything else
                        // passes through unchanged.
                        Some(other) => text.push(other),
                    }
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
            }
        }
    }

    /// Lexes a regex literal: `/…/` with `\/` unescaped; newlines are
    /// forbidden inside.
    fn lex_regex(&mut self, position: Position) -> Result<TokenKind, Diagnostic> {
        self.advance(); // opening slash
        let mut text = String::new();
        loop {
            match self.peek_char() {
                None => {
                    return Err(Diagnostic::error("Unterminated regex literal", position));
                }
                Some(c) if is_line_terminator(c) => {
                    return Err(Diagnostic::error("Unterminated regex literal", position));
                }
                Some('/') => {
                    self.advance();
                    return Ok(TokenKind::Regex(EcoString::from(text)));
                }
                Some('\\') if self.peek_char_n(1) == Some('/') => {
                    self.advance();
                    self.advance();
                    text.push('/');
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
            }
        }
    }

    /// Lexes an identifier, keyword, boolean or `null`.
    fn lex_word(&mut self, position: Position) -> TokenKind {
        self.advance();
        self.advance_while(is_ident_continue);
        let text = self.text_from(position);
        if let Some(keyword) = TokenKind::keyword(text) {
            return keyword;
        }
        match text {
            "true" => TokenKind::Lit(Literal::Bool(true)),
            "false" => TokenKind::Lit(Literal::Bool(false)),
            "null" => TokenKind::Lit(Literal::Null),
            _ => TokenKind::Ident(EcoString::from(text)),
        }
    }
}

/// Identifier start: Unicode letter, `$`, or `_`.
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '$' || c == '_'
}

/// Identifier continuation: letter, digit, `$`, or `_`.
fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '$' || c == '_'
}

/// Any Unicode line terminator (the `\R` set: LF, VT, FF, CR, NEL, LS, PS).
fn is_line_terminator(c: char) -> bool {
    matches!(
        c,
        '\n' | '\u{b}' | '\u{c}' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Any Unicode horizontal whitespace (the `\h` set).
fn is_horizontal_space(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t'
            | '\u{a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
    )
}

/// Lexes all tokens in `source`, excluding the final `eof`.
///
/// # Errors
///
/// Returns the first lexical error.
pub fn lex(source: &str) -> Result<Vec<Token>, Diagnostic> {
    let mut tokens = lex_with_eof(source)?;
    tokens.pop();
    Ok(tokens)
}

/// Lexes all tokens in `source`, including the final `eof`.
///
/// # Errors
///
/// Returns the first lexical error.
pub fn lex_with_eof(source: &str) -> Result<Vec<Token>, Diagnostic> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind().is_eof();
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(source: &str) -> Vec<&'static str> {
        lex_with_eof(source)
            .unwrap()
            .iter()
            .map(|t| t.kind().op())
            .collect()
    }

    #[test]
    fn single_expression() {
        assert_eq!(ops("x + 1"), vec!["ident", "+", "lit", "end", "eof"]);
    }

    #[test]
    fn division_vs_regex() {
        let tokens = lex("x / 2 ; y = /a*/").unwrap();
        let kinds: Vec<&TokenKind> = tokens.iter().map(Token::kind).collect();
        assert!(matches!(kinds[0], TokenKind::Ident(n) if n == "x"));
        assert_eq!(kinds[1], &TokenKind::Slash);
        assert_eq!(kinds[2], &TokenKind::Lit(Literal::Int(2)));
        assert_eq!(kinds[3], &TokenKind::Semicolon);
        assert!(matches!(kinds[4], TokenKind::Ident(n) if n == "y"));
        assert_eq!(kinds[5], &TokenKind::Equals);
        assert!(matches!(kinds[6], TokenKind::Regex(r) if r == "a*"));
    }

    #[test]
    fn regex_unescapes_slash_only() {
        let tokens = lex("x = /a\\/b\\d/").unwrap();
        assert!(matches!(tokens[2].kind(), TokenKind::Regex(r) if r == "a/b\\d"));
    }

    #[test]
    fn offside_block_synthesizes_semicolons_and_end() {
        let source = "do\n  x = 1\n  y = 2\n  x + y\n";
        assert_eq!(
            ops(source),
            vec![
                "do", "ident", "=", "lit", ";", "ident", "=", "lit", ";", "ident", "+", "ident",
                "end", "end", "eof",
            ]
        );
    }

    #[test]
    fn end_flushes_without_trailing_newline() {
        assert_eq!(
            ops("do\n  x"),
            vec!["do", "ident", "end", "end", "eof"]
        );
    }

    #[test]
    fn dedent_to_outer_level_emits_end_then_semicolon() {
        let source = "a = do\n  b\nc";
        assert_eq!(
            ops(source),
            vec!["ident", "=", "do", "ident", "end", ";", "ident", "end", "eof"]
        );
    }

    #[test]
    fn explicit_end_pops_frame() {
        assert_eq!(
            ops("do x end"),
            vec!["do", "ident", "end", "end", "eof"]
        );
    }

    #[test]
    fn let_frame_closes_with_in() {
        // The dedent emits `in` for the let frame, then the top-level frame
        // separates the two items with `;`.
        assert_eq!(
            ops("let\n  x = 1\ny"),
            vec!["let", "ident", "=", "lit", "in", ";", "ident", "end", "eof"]
        );
    }

    #[test]
    fn top_level_lines_are_layout_separated() {
        assert_eq!(
            ops("x = 1\ny = 2"),
            vec!["ident", "=", "lit", ";", "ident", "=", "lit", "end", "eof"]
        );
    }

    #[test]
    fn no_duplicate_semicolon_after_explicit_one() {
        assert_eq!(
            ops("x ;\ny"),
            vec!["ident", ";", "ident", "end", "eof"]
        );
    }

    #[test]
    fn comments_and_blank_lines_are_invisible() {
        let with = "x = 1   # bind x\n\n# a comment line\ny = 2";
        let without = "x = 1\ny = 2";
        assert_eq!(ops(with), ops(without));
    }

    #[test]
    fn tab_advances_to_next_stop() {
        // Tab at column 1 jumps to column 9.
        let tokens = lex("\tx").unwrap();
        assert_eq!(tokens[0].position().column(), 9);

        // "a" occupies column 1; tab jumps from column 2 to 9.
        let tokens = lex("a\tx").unwrap();
        assert_eq!(tokens[1].position().column(), 9);
    }

    #[test]
    fn positions_are_one_based() {
        let tokens = lex("x\n  y").unwrap();
        assert_eq!(tokens[0].position().line(), 1);
        assert_eq!(tokens[0].position().column(), 1);
        let y = &tokens[1];
        assert_eq!(y.position().line(), 2);
        assert_eq!(y.position().column(), 3);
    }

    #[test]
    fn string_escapes_decode() {
        let tokens = lex(r#"x = "a\n\t\"\\A""#).unwrap();
        assert!(
            matches!(tokens[2].kind(), TokenKind::Lit(Literal::String(s)) if s == "a\n\t\"\\A")
        );
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = lex("\"abc").unwrap_err();
        assert_eq!(err.message, "Unterminated string literal");
    }

    #[test]
    fn string_may_not_span_lines() {
        assert!(lex("\"abc\ndef\"").is_err());
    }

    #[test]
    fn numbers_decode_as_int_or_float() {
        let kinds: Vec<TokenKind> = lex("1 2.5 1e3 0")
            .unwrap()
            .into_iter()
            .map(Token::into_kind)
            .collect();
        assert_eq!(kinds[0], TokenKind::Lit(Literal::Int(1)));
        assert_eq!(kinds[1], TokenKind::Lit(Literal::Float(2.5)));
        assert_eq!(kinds[2], TokenKind::Lit(Literal::Float(1000.0)));
        assert_eq!(kinds[3], TokenKind::Lit(Literal::Int(0)));
    }

    #[test]
    fn exponent_without_digits_is_not_consumed() {
        // "2e" is the literal 2 followed by the identifier e.
        let kinds: Vec<TokenKind> = lex("2e").unwrap().into_iter().map(Token::into_kind).collect();
        assert_eq!(kinds[0], TokenKind::Lit(Literal::Int(2)));
        assert!(matches!(&kinds[1], TokenKind::Ident(n) if n == "e"));
    }

    #[test]
    fn true_false_null_are_literals() {
        let kinds: Vec<TokenKind> = lex("true false null")
            .unwrap()
            .into_iter()
            .map(Token::into_kind)
            .collect();
        assert_eq!(kinds[0], TokenKind::Lit(Literal::Bool(true)));
        assert_eq!(kinds[1], TokenKind::Lit(Literal::Bool(false)));
        assert_eq!(kinds[2], TokenKind::Lit(Literal::Null));
    }

    #[test]
    fn comparison_operators_normalize() {
        let kinds: Vec<TokenKind> = lex("a <= b =< c ≤ d ≥ e ≠ f")
            .unwrap()
            .into_iter()
            .map(Token::into_kind)
            .collect();
        assert_eq!(kinds[1], TokenKind::LessEq);
        assert_eq!(kinds[3], TokenKind::LessEq);
        assert_eq!(kinds[5], TokenKind::LessEq);
        assert_eq!(kinds[7], TokenKind::GreaterEq);
        assert_eq!(kinds[9], TokenKind::NotEq);
    }

    #[test]
    fn unicode_identifiers() {
        let tokens = lex("påve = 1").unwrap();
        assert!(matches!(tokens[0].kind(), TokenKind::Ident(n) if n == "påve"));
    }

    #[test]
    fn unmatched_byte_reports_position() {
        let err = lex("x = ?").unwrap_err();
        assert_eq!(err.message, "Unmatched token on line 1, column 5");
        assert_eq!(err.position.column(), 5);
    }

    #[test]
    fn layout_well_balanced_on_nested_blocks() {
        let source = "do\n  a = do\n    b\n  c\nd";
        let kinds = ops(source);
        let opens = kinds.iter().filter(|k| **k == "do").count();
        let closes = kinds.iter().filter(|k| **k == "end").count();
        // Every opener (including the implicit top-level one) closes.
        assert_eq!(opens + 1, closes);
    }
}
