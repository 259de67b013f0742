//! Key resolution with visible fallback.
//!
//! The two entry points deliberately fall back differently:
//!
//! | Lookup | Hit | Miss / wrong kind |
//! |--------|-----|-------------------|
//! | [`resolve`] | the text | the key itself |
//! | [`resolve_array`] | the list | an empty list |
//!
//! Echoing the key makes a missing translation show up in the rendered
//! page instead of crashing it; an empty list simply renders nothing.

use crate::locale::Locale;
use crate::table::{TranslationTable, TranslationValue};

/// Resolve a dotted key to display text.
///
/// Returns `key` unchanged when the path is absent, when it names a list
/// leaf, or when the stored text is empty.
#[must_use]
pub fn resolve(table: &TranslationTable, locale: Locale, key: &str) -> String {
    match table.get(locale, key) {
        Some(TranslationValue::Text(text)) if !text.is_empty() => text.clone(),
        _ => key.to_string(),
    }
}

/// Resolve a dotted key to an ordered list of display texts.
///
/// Returns an empty list when the path is absent or names a text leaf.
#[must_use]
pub fn resolve_array(table: &TranslationTable, locale: Locale, key: &str) -> Vec<String> {
    match table.get(locale, key) {
        Some(TranslationValue::List(items)) => items.clone(),
        _ => Vec::new(),
    }
}
