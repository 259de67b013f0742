use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use folio::{Locale, Translator};
use serde::Serialize;

use crate::error::Result;
use crate::output::Outcome;
use crate::session::{GlobalArgs, Session};

#[derive(Debug, Clone, Args)]
pub struct TranslateArgs {
    /// Dotted key, e.g. `nav.about`.
    pub key: String,

    /// Resolve in this locale instead of the active one.
    #[arg(long, short)]
    pub locale: Option<Locale>,

    /// Resolve the key as a list.
    #[arg(long)]
    pub array: bool,

    /// JSON translation table to use instead of the built-in content.
    #[arg(long, value_name = "PATH")]
    pub table: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct TranslateReport<'a> {
    key: &'a str,
    locale: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<Vec<String>>,
    found: bool,
}

pub fn run_translate(global: &GlobalArgs, args: TranslateArgs) -> Result<Outcome> {
    let session = Session::open_with(global, args.table.as_ref())?;
    let store = session.providers.locale();
    let locale = args.locale.unwrap_or_else(|| store.current());
    let translator = Translator::new(locale, Arc::clone(store.table()));

    let report = if args.array {
        let values = translator.t_array(&args.key);
        TranslateReport {
            key: &args.key,
            locale: locale.tag(),
            value: None,
            found: !values.is_empty(),
            values: Some(values),
        }
    } else {
        let value = translator.t(&args.key);
        TranslateReport {
            key: &args.key,
            locale: locale.tag(),
            found: value != args.key,
            value: Some(value),
            values: None,
        }
    };

    let human = match (&report.value, &report.values) {
        (Some(value), _) => value.clone(),
        (None, Some(values)) => values.join("\n"),
        (None, None) => String::new(),
    };
    Outcome::new(human, &report)
}
