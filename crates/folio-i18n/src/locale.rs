//! Display-language selector and the detection rules that pick one.
//!
//! # Invariants
//!
//! 1. Exactly two locales exist; [`Locale::DEFAULT`] is the primary one.
//! 2. [`Locale::from_tag`] only accepts the exact stored tags, so corrupted
//!    or foreign persisted values never become a locale.
//! 3. [`detect_locale`] is total: it always returns a locale.

use std::fmt;
use std::str::FromStr;

use crate::table::I18nError;

/// Active display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Locale {
    /// English, the primary locale.
    En,
    /// Spanish, the secondary locale.
    Es,
}

impl Locale {
    /// Locale used when neither a stored preference nor the environment
    /// picks one.
    pub const DEFAULT: Locale = Locale::En;

    /// Every supported locale, primary first.
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Es];

    /// Two-letter tag, as persisted and as used in translation tables.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }

    /// Parse a persisted tag. Only the exact tags `"en"` and `"es"` match.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }

    /// Map an environment language signal (`"es-PE"`, `"es_ES.UTF-8"`,
    /// `"en-US"`, ...) to a locale. Anything in the Spanish family selects
    /// [`Locale::Es`]; everything else selects the primary locale.
    #[must_use]
    pub fn from_language_signal(signal: &str) -> Self {
        if signal.to_lowercase().starts_with(Self::Es.tag()) {
            Self::Es
        } else {
            Self::DEFAULT
        }
    }

    /// The other locale.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::En => Self::Es,
            Self::Es => Self::En,
        }
    }

    /// Short label shown on the language switcher button.
    #[must_use]
    pub const fn switch_label(self) -> &'static str {
        match self {
            Self::En => "EN",
            Self::Es => "ES",
        }
    }

    /// Accessible label for the switcher button that selects this locale,
    /// written in the target language.
    #[must_use]
    pub const fn switch_aria_label(self) -> &'static str {
        match self {
            Self::En => "Switch to English",
            Self::Es => "Cambiar a Español",
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    /// Lenient parse for user input: tags are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(&s.trim().to_ascii_lowercase())
            .ok_or_else(|| I18nError::InvalidLocale(s.to_string()))
    }
}

/// Pick the initial locale.
///
/// 1. A persisted value that is a valid tag wins.
/// 2. Otherwise the environment language signal decides.
/// 3. Otherwise the default locale.
///
/// An invalid persisted value is treated as absent.
#[must_use]
pub fn detect_locale(persisted: Option<&str>, language: Option<&str>) -> Locale {
    if let Some(stored) = persisted {
        if let Some(locale) = Locale::from_tag(stored) {
            tracing::debug!(locale = locale.tag(), "locale restored from preference");
            return locale;
        }
        tracing::debug!(value = stored, "ignoring unrecognized locale preference");
    }

    if let Some(signal) = language {
        let locale = Locale::from_language_signal(signal);
        tracing::debug!(signal, locale = locale.tag(), "locale from environment");
        return locale;
    }

    Locale::DEFAULT
}
