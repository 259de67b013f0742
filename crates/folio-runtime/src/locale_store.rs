#![forbid(unsafe_code)]

//! The active locale, its detection, and its persistence.
//!
//! # Startup
//!
//! A [`LocaleStore`] starts [`Phase::Uninitialized`]. [`LocaleStore::initialize`]
//! runs detection exactly once:
//!
//! 1. a persisted `"locale"` preference that names a supported locale;
//! 2. otherwise the environment language signal (Spanish family selects `es`);
//! 3. otherwise the default locale.
//!
//! [`LocaleProvider::render`] renders nothing until detection has completed,
//! so locale-dependent output never shows a default that is then swapped.
//!
//! # Writes
//!
//! [`LocaleStore::set_locale`] fans the value out to subscribers and writes
//! the tag to storage on every call (last write wins). A failed write is
//! logged and the in-memory change stands.

use crate::context::{Context, ContextError};
use crate::environment::Environment;
use crate::reactive::{Observable, Subscription};
use crate::storage::{LOCALE_KEY, PreferenceStorage};
use folio_i18n::{Locale, TranslationTable, detect_locale};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Startup phase of a [`LocaleStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Detection has not run; locale-dependent output is suppressed.
    Uninitialized,
    /// A locale has been detected or chosen.
    Ready,
}

struct LocaleStoreInner {
    locale: Observable<Locale>,
    phase: Cell<Phase>,
    storage: Rc<dyn PreferenceStorage>,
    environment: Rc<dyn Environment>,
    table: Arc<TranslationTable>,
}

/// Shared handle to the process-wide locale.
///
/// Clones refer to the same store.
#[derive(Clone)]
pub struct LocaleStore {
    inner: Rc<LocaleStoreInner>,
}

impl std::fmt::Debug for LocaleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleStore")
            .field("locale", &self.inner.locale.get())
            .field("phase", &self.inner.phase.get())
            .finish_non_exhaustive()
    }
}

impl LocaleStore {
    /// Create an uninitialized store.
    pub fn new(
        storage: Rc<dyn PreferenceStorage>,
        environment: Rc<dyn Environment>,
        table: Arc<TranslationTable>,
    ) -> Self {
        Self {
            inner: Rc::new(LocaleStoreInner {
                locale: Observable::new(Locale::DEFAULT),
                phase: Cell::new(Phase::Uninitialized),
                storage,
                environment,
                table,
            }),
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.inner.phase.get()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.phase() == Phase::Ready
    }

    /// Run detection once. Later calls return the current locale untouched.
    pub fn initialize(&self) -> Locale {
        if self.is_ready() {
            return self.current();
        }
        let persisted = self.inner.storage.get(LOCALE_KEY);
        let detected = match persisted.as_deref().and_then(Locale::from_tag) {
            Some(locale) => locale,
            None => {
                if let Some(raw) = persisted.as_deref() {
                    debug!(value = raw, "ignoring unsupported persisted locale");
                }
                let language = self.inner.environment.language();
                detect_locale(None, language.as_deref())
            }
        };
        self.inner.phase.set(Phase::Ready);
        self.inner.locale.set(detected);
        info!(locale = %detected, "locale initialized");
        detected
    }

    /// The active locale, or `None` before detection.
    #[must_use]
    pub fn locale(&self) -> Option<Locale> {
        self.is_ready().then(|| self.current())
    }

    /// The in-memory locale regardless of phase (the default before
    /// detection).
    #[must_use]
    pub fn current(&self) -> Locale {
        self.inner.locale.get()
    }

    /// Switch locale, notify subscribers and persist the choice.
    ///
    /// An explicit choice also completes startup: a later
    /// [`LocaleStore::initialize`] keeps it.
    pub fn set_locale(&self, next: Locale) {
        self.inner.phase.set(Phase::Ready);
        self.inner.locale.set(next);
        if let Err(err) = self.inner.storage.set(LOCALE_KEY, next.tag()) {
            warn!(locale = %next, error = %err, "failed to persist locale preference");
        }
    }

    /// Observe locale changes.
    pub fn subscribe(&self, callback: impl Fn(Locale) + 'static) -> Subscription {
        self.inner.locale.subscribe(move |locale| callback(*locale))
    }

    /// The underlying observable, for composing with other stores.
    #[must_use]
    pub fn observable(&self) -> &Observable<Locale> {
        &self.inner.locale
    }

    /// Translation content served for this store's locale.
    #[must_use]
    pub fn table(&self) -> &Arc<TranslationTable> {
        &self.inner.table
    }
}

/// Gatekeeper that exposes a [`LocaleStore`] to its subtree once ready.
#[derive(Debug, Clone)]
pub struct LocaleProvider {
    store: LocaleStore,
}

impl LocaleProvider {
    pub const NAME: &'static str = "LocaleProvider";

    #[must_use]
    pub fn new(store: LocaleStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &LocaleStore {
        &self.store
    }

    /// Render `child` with the store in context, or nothing before detection.
    pub fn render<R>(&self, cx: &Context, child: impl FnOnce(&Context) -> R) -> Option<R> {
        if !self.store.is_ready() {
            return None;
        }
        Some(child(&cx.provide(self.store.clone())))
    }
}

/// Access the locale store from inside a [`LocaleProvider`].
pub fn use_locale(cx: &Context) -> Result<LocaleStore, ContextError> {
    cx.require::<LocaleStore>("use_locale", LocaleProvider::NAME)
        .cloned()
}
