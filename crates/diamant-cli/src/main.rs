// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Diamant compiler command-line interface.
//!
//! This is the main entry point for the `diamant` command.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use miette::Result;

mod commands;
mod diagnostic;

/// Diamant: an expression-oriented, dynamically-typed language
#[derive(Debug, Parser)]
#[command(name = "diamant")]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Source file to tokenize (shorthand for `lex FILE`)
    file: Option<Utf8PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the source file as read
    Source {
        /// Source file
        file: Utf8PathBuf,
    },

    /// Print the token stream, one token per line
    Lex {
        /// Source file
        file: Utf8PathBuf,
    },

    /// Parse and print the syntax tree
    Parse {
        /// Source file
        file: Utf8PathBuf,
    },

    /// Parse and pretty-print back to source form
    Pp {
        /// Source file
        file: Utf8PathBuf,
    },

    /// Annotate and print the tree with varsets, actions and closure
    /// environments
    Annotate {
        /// Source file
        file: Utf8PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize tracing subscriber only if RUST_LOG is explicitly set,
    // so plain runs keep stdout/stderr clean for piping.
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .try_init();
    }

    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    let result = match (cli.command, cli.file) {
        (Some(Command::Source { file }), _) => commands::source(&file),
        (Some(Command::Lex { file }), _) | (None, Some(file)) => commands::lex(&file),
        (Some(Command::Parse { file }), _) => commands::parse(&file),
        (Some(Command::Pp { file }), _) => commands::pp(&file),
        (Some(Command::Annotate { file }), _) => commands::annotate(&file),
        (None, None) => unreachable!("clap requires at least one argument"),
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("{e:?}");
            std::process::exit(1);
        }
    }
}
