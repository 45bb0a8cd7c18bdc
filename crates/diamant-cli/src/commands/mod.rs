// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The `diamant` subcommands.
//!
//! Each command loads the file, runs the pipeline up to its stage, and
//! prints the result. The first diagnostic aborts with a nonzero exit
//! code; warnings are printed to stderr and do not fail the run.

use camino::Utf8Path;
use diamant_core::semantic_analysis::annotate as annotate_tree;
use diamant_core::source_analysis::{Diagnostic, Lexer, parse as parse_source};
use diamant_core::unparse::unparse;
use miette::{IntoDiagnostic, Result, WrapErr};

use crate::diagnostic::CompileDiagnostic;

fn read_source(path: &Utf8Path) -> Result<String> {
    std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {path}"))
}

fn render(diagnostic: &Diagnostic, path: &Utf8Path, source: &str) -> miette::Report {
    CompileDiagnostic::from_core(diagnostic, path.as_str(), source).into()
}

/// `diamant source FILE` — print the file as read.
pub fn source(path: &Utf8Path) -> Result<()> {
    let text = read_source(path)?;
    print!("{text}");
    Ok(())
}

/// `diamant lex FILE` — print the token stream, one token per line.
pub fn lex(path: &Utf8Path) -> Result<()> {
    let text = read_source(path)?;
    let mut lexer = Lexer::new(&text);
    loop {
        let token = match lexer.next_token() {
            Ok(token) => token,
            Err(diagnostic) => return Err(render(&diagnostic, path, &text)),
        };
        println!("{token}");
        if token.kind().is_eof() {
            return Ok(());
        }
    }
}

/// `diamant parse FILE` — print the parse tree.
pub fn parse(path: &Utf8Path) -> Result<()> {
    let text = read_source(path)?;
    let tree = parse_source(&text).map_err(|d| render(&d, path, &text))?;
    println!("{tree:#?}");
    Ok(())
}

/// `diamant pp FILE` — parse and print back as source.
pub fn pp(path: &Utf8Path) -> Result<()> {
    let text = read_source(path)?;
    let tree = parse_source(&text).map_err(|d| render(&d, path, &text))?;
    print!("{}", unparse(&tree));
    Ok(())
}

/// `diamant annotate FILE` — print the annotated tree and any warnings.
pub fn annotate(path: &Utf8Path) -> Result<()> {
    let text = read_source(path)?;
    let tree = parse_source(&text).map_err(|d| render(&d, path, &text))?;
    let annotated = annotate_tree(tree)
        .map_err(|e| render(&e.into_diagnostic(), path, &text))?;
    for warning in &annotated.warnings {
        eprintln!("warning: {warning}");
    }
    println!("{:#?}", annotated.ast);
    Ok(())
}
