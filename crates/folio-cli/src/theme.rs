use clap::{Args, Subcommand};
use folio::{ThemeMode, ThemeStore};
use serde::Serialize;

use crate::error::Result;
use crate::output::Outcome;
use crate::session::{GlobalArgs, Session};

#[derive(Debug, Clone, Args)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub action: ThemeAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ThemeAction {
    /// Print the chosen mode and the theme it resolves to.
    Show,
    /// Choose `light`, `dark`, or `system`.
    Set { mode: ThemeMode },
    /// Flip between light and dark.
    Toggle,
}

#[derive(Debug, Serialize)]
struct ThemeReport {
    mode: &'static str,
    resolved: &'static str,
    system: &'static str,
    toggle_label: String,
    persisted: bool,
}

impl ThemeReport {
    fn new(theme: &ThemeStore, persisted: bool) -> Self {
        Self {
            mode: theme.mode().as_str(),
            resolved: theme.resolved().as_str(),
            system: theme.system().as_str(),
            toggle_label: theme.toggle_label(),
            persisted,
        }
    }
}

pub fn run_theme(global: &GlobalArgs, args: ThemeArgs) -> Result<Outcome> {
    let session = Session::open(global)?;
    let theme = session.providers.theme();
    match args.action {
        ThemeAction::Show => {}
        ThemeAction::Set { mode } => theme.set_mode(mode),
        ThemeAction::Toggle => {
            theme.toggle();
        }
    }
    let persisted = session.preferences.is_some() && session.config.theme.persist;
    let report = ThemeReport::new(theme, persisted);
    let human = format!("{} ({})", report.resolved, report.mode);
    Outcome::new(human, &report)
}
