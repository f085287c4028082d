//! User-facing console output and prompts.
//!
//! Leveled lines (success, warn, error, info) are colored with
//! [`colored`]; diagnostics go through `tracing` instead. Whether error
//! reports include the full cause chain is decided once, from the
//! `--debug` flag, and carried by [`Console`].

use std::io::{self, BufRead, Write};

use colored::Colorize;

/// Leveled console writer.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    debug: bool,
}

impl Console {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    pub fn success(&self, msg: &str) {
        println!("{}", msg.green());
    }

    pub fn info(&self, msg: &str) {
        println!("{msg}");
    }

    pub fn warn(&self, msg: &str) {
        eprintln!("{}", msg.yellow());
    }

    pub fn error(&self, msg: &str) {
        eprintln!("{}", msg.red());
    }

    /// One indented list item.
    pub fn bullet(&self, msg: &str) {
        println!("  • {msg}");
    }

    /// Reports a command failure.
    ///
    /// Prints the outermost message, then either the full chain (debug) or
    /// only the root cause with a hint.
    pub fn fail(&self, err: &anyhow::Error) {
        eprintln!("\n{}", format!("✖ [envspec]: {err}").red());
        if self.debug {
            eprintln!("{err:?}");
            return;
        }
        if err.chain().count() > 1 {
            eprintln!("→ {}", err.root_cause());
        }
        eprintln!("(Run with --debug for details)");
    }
}

/// Asks a yes/no question on stdin.
pub fn confirm(message: &str) -> io::Result<bool> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    confirm_with(&mut stdin.lock(), &mut stdout.lock(), message)
}

/// Asks a yes/no question on arbitrary streams.
///
/// Only `y` and `yes` (any case) count as consent; end of input is a no.
pub fn confirm_with<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> io::Result<bool> {
    write!(output, "{message} (yes/no): ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
