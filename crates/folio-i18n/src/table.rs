//! Flattened, immutable translation table.
//!
//! Source content is a nested JSON object per locale:
//!
//! ```json
//! { "en": { "nav": { "about": "About" }, "project": { "features": ["a", "b"] } } }
//! ```
//!
//! which is flattened at construction into dotted keys (`"nav.about"`,
//! `"project.features"`). Each lookup is then a single map access, and there
//! is no ambiguity between intermediate objects and leaf values.
//!
//! # Invariants
//!
//! 1. The table is never mutated after construction.
//! 2. Every stored key is a non-empty sequence of non-empty segments joined
//!    by `.`; no segment contains a `.` itself.
//! 3. Leaves are either text or an ordered list of text.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Malformed JSON | Bad source content | [`I18nError::Parse`] |
//! | Unknown locale | Top-level key is not a locale tag | [`I18nError::InvalidLocale`] |
//! | Bad segment | Empty segment or segment with `.` | [`I18nError::InvalidKey`] |
//! | Bad leaf | Number, bool, null, nested array | [`I18nError::UnsupportedValue`] |
//! | Asymmetric locales | Key present for one locale only | Reported by [`TranslationTable::coverage`], lookups fall back |

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde_json::Value;

use crate::locale::Locale;

/// Errors from building a translation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I18nError {
    /// A locale tag was not recognized.
    InvalidLocale(String),
    /// The source document could not be parsed.
    Parse(String),
    /// A key segment was empty or contained the `.` separator.
    InvalidKey { locale: Locale, key: String },
    /// A leaf held something other than text or a list of text.
    UnsupportedValue {
        locale: Locale,
        key: String,
        found: &'static str,
    },
}

impl std::fmt::Display for I18nError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLocale(tag) => write!(f, "invalid locale: {tag}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::InvalidKey { locale, key } => {
                write!(f, "invalid key '{key}' in locale '{locale}'")
            }
            Self::UnsupportedValue { locale, key, found } => {
                write!(
                    f,
                    "unsupported {found} value at '{key}' in locale '{locale}'"
                )
            }
        }
    }
}

impl std::error::Error for I18nError {}

/// A translation leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationValue {
    /// Display text.
    Text(String),
    /// Ordered display texts (feature bullets and the like).
    List(Vec<String>),
}

impl TranslationValue {
    /// Text content, if this is a scalar leaf.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::List(_) => None,
        }
    }

    /// List content, if this is a list leaf.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::Text(_) => None,
            Self::List(items) => Some(items),
        }
    }
}

/// Flattened entries for one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleStrings {
    entries: BTreeMap<String, TranslationValue>,
}

impl LocaleStrings {
    /// Create an empty set of entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a text leaf at a dotted key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .insert(key.into(), TranslationValue::Text(value.into()));
    }

    /// Insert a list leaf at a dotted key.
    pub fn insert_list<I, S>(&mut self, key: impl Into<String>, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.insert(
            key.into(),
            TranslationValue::List(items.into_iter().map(Into::into).collect()),
        );
    }

    /// Look up a leaf by its full dotted key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TranslationValue> {
        self.entries.get(key)
    }

    /// Number of leaves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no leaves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn flatten_into(&mut self, locale: Locale, prefix: &str, value: &Value) -> Result<(), I18nError> {
        match value {
            Value::Object(map) => {
                for (segment, child) in map {
                    if segment.is_empty() || segment.contains('.') {
                        return Err(I18nError::InvalidKey {
                            locale,
                            key: join_key(prefix, segment),
                        });
                    }
                    self.flatten_into(locale, &join_key(prefix, segment), child)?;
                }
                Ok(())
            }
            Value::String(text) => {
                self.insert(prefix, text.as_str());
                Ok(())
            }
            Value::Array(items) => {
                let mut list = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(text) => list.push(text.clone()),
                        other => {
                            return Err(I18nError::UnsupportedValue {
                                locale,
                                key: prefix.to_string(),
                                found: kind_name(other),
                            });
                        }
                    }
                }
                self.entries
                    .insert(prefix.to_string(), TranslationValue::List(list));
                Ok(())
            }
            other => Err(I18nError::UnsupportedValue {
                locale,
                key: prefix.to_string(),
                found: kind_name(other),
            }),
        }
    }
}

fn join_key(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Locale → flattened entries. Built once, read many times.
///
/// # Example
///
/// ```
/// use folio_i18n::{Locale, LocaleStrings, TranslationTable, resolve};
///
/// let mut en = LocaleStrings::new();
/// en.insert("nav.about", "About");
/// let mut table = TranslationTable::new();
/// table.add_locale(Locale::En, en);
///
/// assert_eq!(resolve(&table, Locale::En, "nav.about"), "About");
/// assert_eq!(resolve(&table, Locale::Es, "nav.about"), "nav.about");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    locales: HashMap<Locale, LocaleStrings>,
}

impl TranslationTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the entries for a locale, replacing any previous ones.
    pub fn add_locale(&mut self, locale: Locale, strings: LocaleStrings) {
        self.locales.insert(locale, strings);
    }

    /// Parse nested JSON content keyed by locale tag.
    pub fn from_json_str(source: &str) -> Result<Self, I18nError> {
        let value: Value =
            serde_json::from_str(source).map_err(|e| I18nError::Parse(e.to_string()))?;
        Self::from_json_value(&value)
    }

    /// Build from an already parsed JSON document keyed by locale tag.
    pub fn from_json_value(value: &Value) -> Result<Self, I18nError> {
        let Value::Object(root) = value else {
            return Err(I18nError::Parse(format!(
                "expected an object keyed by locale, found {}",
                kind_name(value)
            )));
        };

        let mut table = Self::new();
        for (tag, content) in root {
            let locale =
                Locale::from_tag(tag).ok_or_else(|| I18nError::InvalidLocale(tag.clone()))?;
            if !content.is_object() {
                return Err(I18nError::Parse(format!(
                    "locale '{tag}' must map to an object, found {}",
                    kind_name(content)
                )));
            }
            let mut strings = LocaleStrings::new();
            strings.flatten_into(locale, "", content)?;
            tracing::debug!(locale = tag.as_str(), entries = strings.len(), "loaded locale");
            table.add_locale(locale, strings);
        }
        Ok(table)
    }

    /// Look up the leaf at `key` for `locale`.
    #[must_use]
    pub fn get(&self, locale: Locale, key: &str) -> Option<&TranslationValue> {
        self.locales.get(&locale).and_then(|strings| strings.get(key))
    }

    /// Entries for a locale, if any were loaded.
    #[must_use]
    pub fn locale_strings(&self, locale: Locale) -> Option<&LocaleStrings> {
        self.locales.get(&locale)
    }

    /// Loaded locales, in [`Locale::ALL`] order.
    pub fn locales(&self) -> impl Iterator<Item = Locale> + '_ {
        Locale::ALL
            .into_iter()
            .filter(|locale| self.locales.contains_key(locale))
    }

    /// Compare locales and report keys each one lacks.
    #[must_use]
    pub fn coverage(&self) -> CoverageReport {
        let all_keys: BTreeSet<&str> = self
            .locales
            .values()
            .flat_map(LocaleStrings::keys)
            .collect();

        let missing = Locale::ALL
            .into_iter()
            .map(|locale| {
                let strings = self.locales.get(&locale);
                let keys = all_keys
                    .iter()
                    .filter(|key| strings.is_none_or(|s| s.get(key).is_none()))
                    .map(|key| (*key).to_string())
                    .collect();
                (locale, keys)
            })
            .collect();

        CoverageReport {
            total_keys: all_keys.len(),
            missing,
        }
    }
}

/// Per-locale key gaps found by [`TranslationTable::coverage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageReport {
    /// Distinct keys across all locales.
    pub total_keys: usize,
    /// Keys absent from each locale, sorted.
    pub missing: BTreeMap<Locale, Vec<String>>,
}

impl CoverageReport {
    /// True when every locale carries every key.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.missing.values().all(Vec::is_empty)
    }

    /// Keys missing for `locale`.
    #[must_use]
    pub fn missing_for(&self, locale: Locale) -> &[String] {
        self.missing.get(&locale).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Share of keys present for `locale`, in `[0, 100]`.
    #[must_use]
    pub fn coverage_percent(&self, locale: Locale) -> f64 {
        if self.total_keys == 0 {
            return 100.0;
        }
        let present = self.total_keys - self.missing_for(locale).len();
        present as f64 / self.total_keys as f64 * 100.0
    }
}
