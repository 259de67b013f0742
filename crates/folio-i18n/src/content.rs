//! Built-in bilingual site content.
//!
//! The site's copy ships inside the binary as nested JSON and is parsed the
//! first time it is requested. Later calls share the same table.

use std::sync::{Arc, OnceLock};

use crate::table::{I18nError, TranslationTable};

const SITE_CONTENT: &str = include_str!("../data/translations.json");

static BUILTIN: OnceLock<Result<Arc<TranslationTable>, I18nError>> = OnceLock::new();

/// The site's translation table.
pub fn builtin() -> Result<Arc<TranslationTable>, I18nError> {
    BUILTIN
        .get_or_init(|| TranslationTable::from_json_str(SITE_CONTENT).map(Arc::new))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Locale, resolve, resolve_array};

    #[test]
    fn builtin_parses_and_is_shared() {
        let a = builtin().unwrap();
        let b = builtin().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn builtin_locales_are_symmetric() {
        let report = builtin().unwrap().coverage();
        assert!(report.is_symmetric(), "missing keys: {:?}", report.missing);
    }

    #[test]
    fn builtin_navigation_labels() {
        let table = builtin().unwrap();
        assert_eq!(resolve(&table, Locale::En, "nav.about"), "About");
        assert_eq!(resolve(&table, Locale::Es, "nav.about"), "Acerca de");
        assert_eq!(resolve(&table, Locale::Es, "about.location"), "Arequipa, Perú");
    }

    #[test]
    fn builtin_feature_lists() {
        let table = builtin().unwrap();
        assert_eq!(resolve_array(&table, Locale::En, "sportsBetting.features").len(), 6);
        assert_eq!(resolve_array(&table, Locale::Es, "sportsBetting.features").len(), 6);
    }
}
