#![forbid(unsafe_code)]

//! folio public facade crate.
//!
//! Re-exports the content layer (`folio-i18n`) and the store layer
//! (`folio-runtime`) behind one dependency, adds the unified [`Error`], and
//! offers a prelude for page code.
//!
//! ```
//! use folio::prelude::*;
//! use std::rc::Rc;
//!
//! let providers = Providers::mount(
//!     &FolioConfig::default(),
//!     Rc::new(MemoryStorage::new()),
//!     Rc::new(StaticEnvironment::with_language("es-PE")),
//!     folio::builtin()?,
//! );
//! let title = providers
//!     .render(|cx| use_translation(cx).map(|t| t.t("nav.about")))
//!     .expect("locale detected during mount")?;
//! assert_eq!(title, "Acerca de");
//! # Ok::<(), folio::Error>(())
//! ```

pub mod error;

pub use error::{Error, Recovery, Result};

// --- Content re-exports ----------------------------------------------------

pub use folio_i18n::{
    CoverageReport, I18nError, Locale, LocaleStrings, TranslationTable, TranslationValue,
    builtin, detect_locale, resolve, resolve_array,
};

// --- Runtime re-exports ----------------------------------------------------

pub use folio_runtime::{
    BlurStore, ColorScheme, ConfigError, Context, ContextError, Environment, FileStorage,
    FolioConfig, LocaleProvider, LocaleStore, MemoryStorage, NavigationState, NavigationStore,
    Observable, Phase, PreferenceStorage, Providers, ResolvedTheme, ScrollStore,
    StaticEnvironment, StorageError, Subscription, SystemEnvironment, ThemeMode, ThemeOptions,
    ThemeStore, TimerId, TimerQueue, Translator, Typewriter, TypewriterConfig, TypewriterFrame,
    TypewriterPhase,
};

/// Preference storage keys.
pub mod keys {
    pub use folio_runtime::storage::{LOCALE_KEY, THEME_KEY};
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Context, Error, FolioConfig, Locale, MemoryStorage, Providers, ResolvedTheme, Result,
        StaticEnvironment, ThemeMode, Translator, Typewriter, TypewriterConfig,
    };

    pub use folio_runtime::{
        use_blur, use_locale, use_navigation, use_scroll, use_theme, use_translation,
    };

    pub use crate::{i18n, runtime};
}

pub use folio_i18n as i18n;
pub use folio_runtime as runtime;
