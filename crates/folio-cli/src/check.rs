use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Args;
use folio::{Locale, TranslationTable};
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::output::Outcome;
use crate::session;

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// JSON translation table to check instead of the built-in content.
    #[arg(long, value_name = "PATH")]
    pub table: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct LocaleCoverage {
    locale: &'static str,
    keys: usize,
    coverage_percent: f64,
    missing: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    status: &'static str,
    total_keys: usize,
    locales: Vec<LocaleCoverage>,
}

/// Verify that every locale defines the same keys. Exits 1 when not.
pub fn run_check(args: CheckArgs) -> Result<Outcome> {
    let table = session::load_table(args.table.as_ref())?;
    let report = build_report(&table);
    info!(status = report.status, total_keys = report.total_keys, "translation check");

    let mut human = format!("{}: {} keys", report.status, report.total_keys);
    for locale in &report.locales {
        let _ = write!(
            human,
            "\n  {} {:>5.1}% ({} keys)",
            locale.locale, locale.coverage_percent, locale.keys
        );
        for key in &locale.missing {
            let _ = write!(human, "\n    missing {key}");
        }
    }

    let code = if report.status == "ok" { 0 } else { 1 };
    Ok(Outcome::new(human, &report)?.with_exit_code(code))
}

fn build_report(table: &TranslationTable) -> CheckReport {
    let coverage = table.coverage();
    let locales = Locale::ALL
        .into_iter()
        .map(|locale| LocaleCoverage {
            locale: locale.tag(),
            keys: table.locale_strings(locale).map_or(0, |s| s.len()),
            coverage_percent: coverage.coverage_percent(locale),
            missing: coverage.missing_for(locale).to_vec(),
        })
        .collect();
    CheckReport {
        status: if coverage.is_symmetric() { "ok" } else { "incomplete" },
        total_keys: coverage.total_keys,
        locales,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_content_is_complete() {
        let outcome = run_check(CheckArgs { table: None }).unwrap();
        assert_eq!(outcome.exit_code, 0);
        assert_eq!(outcome.json["status"], "ok");
    }

    #[test]
    fn missing_key_is_reported_per_locale() {
        let table = TranslationTable::from_json_str(
            r#"{ "en": { "nav": { "home": "Home", "blog": "Blog" } }, "es": { "nav": { "home": "Inicio" } } }"#,
        )
        .unwrap();
        let report = build_report(&table);
        assert_eq!(report.status, "incomplete");
        assert_eq!(report.total_keys, 2);
        assert!(report.locales[0].missing.is_empty());
        assert_eq!(report.locales[1].missing, vec!["nav.blog".to_string()]);
        assert_eq!(report.locales[1].keys, 1);
    }
}
