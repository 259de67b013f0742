#![forbid(unsafe_code)]

//! Internationalization foundation for folio.
//!
//! Provides the two-valued [`Locale`] selector, locale detection rules,
//! an immutable [`TranslationTable`] keyed by flattened dotted paths, and
//! the scalar/array resolvers that pages use to turn keys into text.
//!
//! # Role in folio
//! `folio-i18n` holds the pure, data-only half of localization. It knows
//! nothing about stores, subscriptions or persistence; `folio-runtime`
//! binds the active locale to these resolvers.
//!
//! # Failure policy
//! Lookups never fail. A missing scalar key echoes the key back so the gap
//! is visible in rendered content; a missing list key yields an empty list.
//! Only table construction reports errors ([`I18nError`]).

pub mod content;
pub mod locale;
pub mod resolve;
pub mod table;

pub use content::builtin;
pub use locale::{Locale, detect_locale};
pub use resolve::{resolve, resolve_array};
pub use table::{CoverageReport, I18nError, LocaleStrings, TranslationTable, TranslationValue};
