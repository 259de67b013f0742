#![forbid(unsafe_code)]

//! `folio` command-line tool.
//!
//! Reads and writes the same preferences file the site stores use, resolves
//! translation keys, audits locale coverage, and plays the typewriter reveal
//! in a terminal.

pub mod check;
pub mod cli;
pub mod error;
pub mod locale;
pub mod logging;
pub mod output;
pub mod session;
pub mod theme;
pub mod translate;
pub mod typing;

pub use cli::{Cli, Commands, run, run_from_env};
pub use error::{CliError, Result};
pub use output::Outcome;
