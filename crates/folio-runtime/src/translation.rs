#![forbid(unsafe_code)]

//! Per-consumer access to translated content.

use crate::context::{Context, ContextError};
use crate::locale_store::{LocaleProvider, LocaleStore};
use folio_i18n::{Locale, TranslationTable, resolve, resolve_array};
use std::sync::Arc;

/// Translation functions bound to one locale.
///
/// The locale is captured when the translator is created; a later
/// `set_locale` does not affect an existing translator. Consumers take a
/// fresh one on each render.
#[derive(Debug, Clone)]
pub struct Translator {
    locale: Locale,
    table: Arc<TranslationTable>,
}

impl Translator {
    #[must_use]
    pub fn new(locale: Locale, table: Arc<TranslationTable>) -> Self {
        Self { locale, table }
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Text at `key`, or `key` itself when missing.
    #[must_use]
    pub fn t(&self, key: &str) -> String {
        resolve(&self.table, self.locale, key)
    }

    /// List at `key`, or an empty list when missing or not a list.
    #[must_use]
    pub fn t_array(&self, key: &str) -> Vec<String> {
        resolve_array(&self.table, self.locale, key)
    }
}

impl From<&LocaleStore> for Translator {
    fn from(store: &LocaleStore) -> Self {
        Self::new(store.current(), Arc::clone(store.table()))
    }
}

/// Translator for the current locale. Fails outside a [`LocaleProvider`].
pub fn use_translation(cx: &Context) -> Result<Translator, ContextError> {
    let store = cx.require::<LocaleStore>("use_translation", LocaleProvider::NAME)?;
    Ok(Translator::from(store))
}
