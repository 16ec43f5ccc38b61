//! Command letter parsing shared by the tools
//!
//! Both tools take their command as a string of single letters (`l`, `d`,
//! `x`, and for bndtool `i`). Letters are applied left to right, so the last
//! mode letter wins.

use std::process::ExitCode;

use clap::Parser;
use thiserror::Error;

/// What to do with each entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Print sizes and names
    List,
    /// Print a hex dump (or a tagfile dump)
    Dump,
    /// Write entries or geometry to disk
    Extract,
}

/// Parsed command letters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commands {
    /// Selected mode
    pub mode: Mode,
    /// Inflate DCX-compressed entries first
    pub inflate: bool,
}

/// Invalid command string
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    /// Letter that is not a known command
    #[error("Invalid command: '{0}'")]
    Invalid(char),

    /// No mode letter given
    #[error("At least one of 'x', 'l', 'd' is required")]
    MissingMode,
}

impl Commands {
    /// Parse a command string; `i` is accepted only when `allow_inflate` is set
    pub fn parse(letters: &str, allow_inflate: bool) -> Result<Self, CommandError> {
        let mut mode = None;
        let mut inflate = false;
        for c in letters.chars() {
            match c {
                'l' => mode = Some(Mode::List),
                'd' => mode = Some(Mode::Dump),
                'x' => mode = Some(Mode::Extract),
                'i' if allow_inflate => inflate = true,
                other => return Err(CommandError::Invalid(other)),
            }
        }
        let mode = mode.ok_or(CommandError::MissingMode)?;
        Ok(Self { mode, inflate })
    }
}

/// Parse the process arguments into `P`
///
/// On failure the clap message is printed and the exit code to return from
/// `main` is handed back: success for `--help` and `--version`, failure for
/// bad arguments.
pub fn parse_args<P: Parser>() -> Result<P, ExitCode> {
    P::try_parse().map_err(report_parse_error)
}

/// Print a clap error and pick the matching exit code
pub fn report_parse_error(e: clap::Error) -> ExitCode {
    let _ = e.print();
    if e.use_stderr() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
