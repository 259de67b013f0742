#![forbid(unsafe_code)]

//! Read-only signals from the host environment.
//!
//! Two signals feed the stores:
//!
//! - a **language preference** string (e.g. `"es-PE"`), read once during
//!   locale detection;
//! - a subscribable **color-scheme preference** consumed by the theme store.
//!
//! [`SystemEnvironment`] derives both from process environment variables.
//! [`StaticEnvironment`] holds fixed values and lets tests flip the color
//! scheme at will.

use crate::reactive::Observable;
use std::cell::Cell;
use std::fmt;

/// Binary color-scheme preference reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of environment signals.
pub trait Environment {
    /// Preferred language, if the host reports one.
    fn language(&self) -> Option<String>;

    /// Live color-scheme preference.
    fn color_scheme(&self) -> Observable<ColorScheme>;
}

/// Environment read from process variables at construction time.
#[derive(Debug, Clone)]
pub struct SystemEnvironment {
    language: Option<String>,
    color_scheme: Observable<ColorScheme>,
}

impl SystemEnvironment {
    /// Snapshot the current process environment.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let language = ["LC_ALL", "LC_MESSAGES", "LANG"]
            .into_iter()
            .filter_map(&lookup)
            .find(|v| !v.trim().is_empty())
            .map(|v| normalize_posix_locale(&v));
        let scheme = lookup("COLORFGBG")
            .as_deref()
            .and_then(color_scheme_from_colorfgbg)
            .unwrap_or_default();
        tracing::debug!(language = ?language, color_scheme = %scheme, "environment detected");
        Self {
            language,
            color_scheme: Observable::new(scheme),
        }
    }
}

impl Environment for SystemEnvironment {
    fn language(&self) -> Option<String> {
        self.language.clone()
    }

    fn color_scheme(&self) -> Observable<ColorScheme> {
        self.color_scheme.clone()
    }
}

/// Turn a POSIX locale (`es_PE.UTF-8`) into a language tag (`es-PE`).
///
/// `C` and `POSIX` carry no language preference and come back unchanged;
/// they do not start with a supported tag.
fn normalize_posix_locale(raw: &str) -> String {
    let base = raw
        .split(['.', '@'])
        .next()
        .unwrap_or(raw)
        .trim();
    base.replace('_', "-")
}

/// Parse `COLORFGBG` (`"fg;bg"` or `"fg;default;bg"`).
///
/// Background palette indices 7 and 15 are light; any other index is dark.
fn color_scheme_from_colorfgbg(value: &str) -> Option<ColorScheme> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(match bg {
        7 | 15 => ColorScheme::Light,
        _ => ColorScheme::Dark,
    })
}

/// Fixed environment for tests and embedded hosts.
#[derive(Debug, Clone)]
pub struct StaticEnvironment {
    language: Option<String>,
    color_scheme: Observable<ColorScheme>,
    language_reads: std::rc::Rc<Cell<usize>>,
}

impl Default for StaticEnvironment {
    fn default() -> Self {
        Self::new(None, ColorScheme::default())
    }
}

impl StaticEnvironment {
    #[must_use]
    pub fn new(language: Option<&str>, scheme: ColorScheme) -> Self {
        Self {
            language: language.map(str::to_string),
            color_scheme: Observable::new(scheme),
            language_reads: std::rc::Rc::new(Cell::new(0)),
        }
    }

    /// Environment reporting only a language preference.
    #[must_use]
    pub fn with_language(language: &str) -> Self {
        Self::new(Some(language), ColorScheme::default())
    }

    /// Emit a color-scheme change to every subscriber.
    pub fn set_color_scheme(&self, scheme: ColorScheme) {
        self.color_scheme.set(scheme);
    }

    /// How many times the language signal has been read.
    #[must_use]
    pub fn language_reads(&self) -> usize {
        self.language_reads.get()
    }
}

impl Environment for StaticEnvironment {
    fn language(&self) -> Option<String> {
        self.language_reads.set(self.language_reads.get() + 1);
        self.language.clone()
    }

    fn color_scheme(&self) -> Observable<ColorScheme> {
        self.color_scheme.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> SystemEnvironment {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SystemEnvironment::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn language_precedence_lc_all_first() {
        let env = env_from(&[("LANG", "en_US.UTF-8"), ("LC_ALL", "es_PE.UTF-8")]);
        assert_eq!(env.language().as_deref(), Some("es-PE"));
    }

    #[test]
    fn empty_variables_are_skipped() {
        let env = env_from(&[("LC_ALL", ""), ("LC_MESSAGES", "  "), ("LANG", "es_MX")]);
        assert_eq!(env.language().as_deref(), Some("es-MX"));
    }

    #[test]
    fn no_language_variables() {
        assert_eq!(env_from(&[]).language(), None);
    }

    #[test]
    fn posix_modifiers_are_stripped() {
        assert_eq!(normalize_posix_locale("ca_ES@valencia"), "ca-ES");
        assert_eq!(normalize_posix_locale("C"), "C");
    }

    #[test]
    fn colorfgbg_parsing() {
        assert_eq!(color_scheme_from_colorfgbg("15;0"), Some(ColorScheme::Dark));
        assert_eq!(color_scheme_from_colorfgbg("0;15"), Some(ColorScheme::Light));
        assert_eq!(color_scheme_from_colorfgbg("0;default;7"), Some(ColorScheme::Light));
        assert_eq!(color_scheme_from_colorfgbg("garbage"), None);
    }

    #[test]
    fn color_scheme_defaults_to_light() {
        assert_eq!(env_from(&[]).color_scheme().get(), ColorScheme::Light);
        assert_eq!(
            env_from(&[("COLORFGBG", "15;0")]).color_scheme().get(),
            ColorScheme::Dark
        );
    }

    #[test]
    fn static_environment_signal_fans_out() {
        let env = StaticEnvironment::default();
        let signal = env.color_scheme();
        let seen = std::rc::Rc::new(Cell::new(ColorScheme::Light));
        let seen_clone = std::rc::Rc::clone(&seen);
        let _sub = signal.subscribe(move |s| seen_clone.set(*s));

        env.set_color_scheme(ColorScheme::Dark);
        assert_eq!(seen.get(), ColorScheme::Dark);
    }

    #[test]
    fn static_environment_counts_language_reads() {
        let env = StaticEnvironment::with_language("es-PE");
        assert_eq!(env.language_reads(), 0);
        let _ = env.language();
        assert_eq!(env.language_reads(), 1);
    }
}
