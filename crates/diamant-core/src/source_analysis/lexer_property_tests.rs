// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the Diamant lexer.
//!
//! These use `proptest` to verify lexer invariants over generated inputs:
//!
//! 1. **Lexer never panics** — arbitrary input produces tokens or an error
//! 2. **Lexer is deterministic** — same input, same result
//! 3. **EOF is always last** — successful streams end with `eof`
//! 4. **Positions are monotone** — offsets and lines never go backwards
//! 5. **Layout is well-balanced** — every opener produces one closer
//! 6. **Column semantics** — leading spaces/tabs yield the visual column
//! 7. **Trivia invariance** — comments and trailing blanks don't change
//!    the token stream

use proptest::prelude::*;

use super::lexer::lex_with_eof;
use super::token::TokenKind;

/// Well-formed sources covering the layout rule.
const VALID_SOURCES: &[&str] = &[
    "x = 1",
    "x = 1\ny = 2",
    "do\n  x = 1\n  y = 2\n  x + y",
    "a = do\n  b\nc",
    "case x of\n  0 -> a\n  n -> b",
    "let\n  x = 1\ny",
    "f(0) = 42 ; f(n) = n - 1",
    "do x end",
    "x / 2 ; y = /a*/",
    "if a then 1 else 2",
];

fn valid_source() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_SOURCES).prop_map(str::to_owned)
}

fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(512),
        ..default
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Property 1: lexing arbitrary input never panics.
    #[test]
    fn lexer_never_panics(input in "\\PC{0,300}") {
        let _result = lex_with_eof(&input);
    }

    /// Property 2: lexing is deterministic.
    #[test]
    fn lexer_deterministic(input in "\\PC{0,200}") {
        let first = lex_with_eof(&input);
        let second = lex_with_eof(&input);
        prop_assert_eq!(first, second);
    }

    /// Property 3: a successful stream ends with exactly one eof.
    #[test]
    fn eof_always_last(input in "\\PC{0,200}") {
        if let Ok(tokens) = lex_with_eof(&input) {
            prop_assert!(!tokens.is_empty());
            prop_assert!(tokens.last().unwrap().kind().is_eof());
            let eofs = tokens.iter().filter(|t| t.kind().is_eof()).count();
            prop_assert_eq!(eofs, 1);
        }
    }

    /// Property 4: token offsets and lines never decrease.
    #[test]
    fn positions_are_monotone(input in "\\PC{0,200}") {
        if let Ok(tokens) = lex_with_eof(&input) {
            for window in tokens.windows(2) {
                prop_assert!(
                    window[1].position().offset() >= window[0].position().offset(),
                    "offset went backwards: {} then {}",
                    window[0],
                    window[1],
                );
                prop_assert!(window[1].position().line() >= window[0].position().line());
            }
        }
    }

    /// Property 5: in a well-formed source, every layout opener (plus the
    /// implicit top-level block) is closed by exactly one `end`/`in`.
    #[test]
    fn layout_well_balanced(input in valid_source()) {
        let tokens = lex_with_eof(&input).expect("valid source lexes");
        let openers = tokens
            .iter()
            .filter(|t| {
                matches!(
                    t.kind(),
                    TokenKind::Do | TokenKind::Of | TokenKind::Let | TokenKind::Where
                )
            })
            .count();
        let closers = tokens
            .iter()
            .filter(|t| matches!(t.kind(), TokenKind::End | TokenKind::In))
            .count();
        prop_assert_eq!(closers, openers + 1, "tokens: {:?}", tokens);
    }

    /// Property 6: the reported column of a token preceded only by spaces
    /// and tabs is the visual column under tab stops at 8n+1.
    #[test]
    fn column_matches_visual_column(prefix in "[ \t]{0,20}") {
        let source = format!("{prefix}x");
        let tokens = lex_with_eof(&source).expect("identifier lexes");
        let mut expected: u32 = 1;
        for c in prefix.chars() {
            if c == '\t' {
                expected += 8 - (expected - 1) % 8;
            } else {
                expected += 1;
            }
        }
        prop_assert_eq!(tokens[0].position().column(), expected);
    }

    /// Property 7: appending a comment or trailing blanks to a line does
    /// not change the emitted token kinds.
    #[test]
    fn trivia_does_not_change_tokens(
        input in valid_source(),
        trailing in "( |\t){0,4}(# [a-z ]{0,10})?",
    ) {
        let with: String = input
            .lines()
            .map(|line| format!("{line}{trailing}\n"))
            .collect();
        let plain_kinds: Vec<TokenKind> = lex_with_eof(&input)
            .expect("valid source lexes")
            .into_iter()
            .map(super::Token::into_kind)
            .collect();
        let decorated_kinds: Vec<TokenKind> = lex_with_eof(&with)
            .expect("decorated source lexes")
            .into_iter()
            .map(super::Token::into_kind)
            .collect();
        prop_assert_eq!(plain_kinds, decorated_kinds);
    }
}
