use clap::{Args, Subcommand};
use folio::keys::LOCALE_KEY;
use folio::{Environment as _, Locale, SystemEnvironment, detect_locale};
use serde::Serialize;

use crate::error::Result;
use crate::output::Outcome;
use crate::session::{self, GlobalArgs, Session};

#[derive(Debug, Clone, Args)]
pub struct LocaleArgs {
    #[command(subcommand)]
    pub action: LocaleAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum LocaleAction {
    /// Print the active locale and the switcher for the other one.
    Show,
    /// Show how the locale would be chosen from stored and environment signals.
    Detect,
    /// Switch the active locale and save it.
    Set { tag: Locale },
}

#[derive(Debug, Serialize)]
struct LocaleReport {
    locale: &'static str,
    switch_to: &'static str,
    switch_label: &'static str,
    switch_aria_label: &'static str,
    persisted: bool,
}

impl LocaleReport {
    fn new(locale: Locale, persisted: bool) -> Self {
        let other = locale.other();
        Self {
            locale: locale.tag(),
            switch_to: other.tag(),
            switch_label: other.switch_label(),
            switch_aria_label: other.switch_aria_label(),
            persisted,
        }
    }
}

#[derive(Debug, Serialize)]
struct DetectReport {
    stored: Option<String>,
    language: Option<String>,
    locale: &'static str,
    source: &'static str,
}

pub fn run_locale(global: &GlobalArgs, args: LocaleArgs) -> Result<Outcome> {
    match args.action {
        LocaleAction::Show => {
            let session = Session::open(global)?;
            let locale = session.providers.locale().current();
            let report = LocaleReport::new(locale, session.preferences.is_some());
            Outcome::new(
                format!("{} ({}: {})", locale, report.switch_label, report.switch_aria_label),
                &report,
            )
        }
        LocaleAction::Set { tag } => {
            let session = Session::open(global)?;
            session.providers.locale().set_locale(tag);
            let report = LocaleReport::new(tag, session.preferences.is_some());
            Outcome::new(tag.to_string(), &report)
        }
        LocaleAction::Detect => run_detect(global),
    }
}

fn run_detect(global: &GlobalArgs) -> Result<Outcome> {
    let config = session::load_config(global)?;
    let storage = session::open_storage(session::preferences_path(global, &config).as_ref());
    let stored = storage.get(LOCALE_KEY);
    let language = SystemEnvironment::detect().language();

    let locale = detect_locale(stored.as_deref(), language.as_deref());
    let source = if stored.as_deref().and_then(Locale::from_tag).is_some() {
        "stored"
    } else if language.is_some() {
        "environment"
    } else {
        "default"
    };

    let report = DetectReport {
        stored,
        language,
        locale: locale.tag(),
        source,
    };
    Outcome::new(format!("{locale} (from {source})"), &report)
}
