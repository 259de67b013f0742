use std::io::Write;

use clap::{Parser, Subcommand};

use crate::check::{CheckArgs, run_check};
use crate::error::Result;
use crate::locale::{LocaleArgs, run_locale};
use crate::logging;
use crate::output::Outcome;
use crate::session::GlobalArgs;
use crate::theme::{ThemeArgs, run_theme};
use crate::translate::{TranslateArgs, run_translate};
use crate::typing::{TypeArgs, run_type};

#[derive(Debug, Parser)]
#[command(
    name = "folio",
    about = "Bilingual portfolio content, preferences, and typewriter preview",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve a translation key in the active locale.
    #[command(name = "t", alias = "translate")]
    Translate(TranslateArgs),

    /// Show, detect, or switch the display language.
    Locale(LocaleArgs),

    /// Show or change the color theme.
    Theme(ThemeArgs),

    /// Verify that every locale defines the same keys.
    Check(CheckArgs),

    /// Preview the typewriter reveal of a text.
    Type(TypeArgs),
}

/// Parse the process arguments, run, and print. Returns the exit code.
pub fn run_from_env() -> Result<i32> {
    logging::init("warn");
    let cli = Cli::parse();
    let json = cli.global.json;
    let outcome = run(cli)?;
    let rendered = outcome.render(json)?;
    if !rendered.is_empty() {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{rendered}")?;
    }
    Ok(outcome.exit_code)
}

pub fn run(cli: Cli) -> Result<Outcome> {
    let global = cli.global;
    match cli.command {
        Commands::Translate(args) => run_translate(&global, args),
        Commands::Locale(args) => run_locale(&global, args),
        Commands::Theme(args) => run_theme(&global, args),
        Commands::Check(args) => run_check(args),
        Commands::Type(args) => run_type(&global, args),
    }
}
