#![forbid(unsafe_code)]

//! Root composition of every store.
//!
//! [`Providers::mount`] builds the stores in provider order
//! (theme, locale, blur, scroll, navigation), runs locale detection, and
//! hands pages a fully populated [`Context`] through [`Providers::render`].
//! Dropping the `Providers` unmounts the tree: the root's store handles go
//! away and with them the theme store's environment subscription.

use crate::blur::BlurStore;
use crate::config::FolioConfig;
use crate::context::Context;
use crate::environment::Environment;
use crate::locale_store::{LocaleProvider, LocaleStore};
use crate::navigation::NavigationStore;
use crate::scroll::ScrollStore;
use crate::storage::PreferenceStorage;
use crate::theme::ThemeStore;
use folio_i18n::TranslationTable;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, info_span};

/// Root of the view tree: owns one instance of each store.
#[derive(Debug)]
pub struct Providers {
    theme: ThemeStore,
    locale: LocaleProvider,
    blur: BlurStore,
    scroll: ScrollStore,
    navigation: NavigationStore,
}

impl Providers {
    /// Build every store and complete locale detection.
    pub fn mount(
        config: &FolioConfig,
        storage: Rc<dyn PreferenceStorage>,
        environment: Rc<dyn Environment>,
        table: Arc<TranslationTable>,
    ) -> Self {
        let _span = info_span!("folio.mount").entered();

        let theme_storage = config.theme.persist.then(|| Rc::clone(&storage));
        let theme = ThemeStore::new(environment.as_ref(), theme_storage, config.theme_options());

        let locale = LocaleStore::new(storage, environment, table);
        locale.initialize();

        let providers = Self {
            theme,
            locale: LocaleProvider::new(locale),
            blur: BlurStore::new(),
            scroll: ScrollStore::new(config.scroll.threshold),
            navigation: NavigationStore::new("/"),
        };
        debug!(?providers, "providers mounted");
        providers
    }

    /// Render `page` beneath every provider. `None` while the locale is not
    /// ready.
    pub fn render<R>(&self, page: impl FnOnce(&Context) -> R) -> Option<R> {
        let root = Context::root();
        self.theme.provide(&root, |cx| {
            self.locale.render(cx, |cx| {
                self.blur.provide(cx, |cx| {
                    self.scroll
                        .provide(cx, |cx| self.navigation.provide(cx, page))
                })
            })
        })
    }

    #[must_use]
    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    #[must_use]
    pub fn locale(&self) -> &LocaleStore {
        self.locale.store()
    }

    #[must_use]
    pub fn blur(&self) -> &BlurStore {
        &self.blur
    }

    #[must_use]
    pub fn scroll(&self) -> &ScrollStore {
        &self.scroll
    }

    #[must_use]
    pub fn navigation(&self) -> &NavigationStore {
        &self.navigation
    }
}

impl Drop for Providers {
    fn drop(&mut self) {
        debug!("providers unmounted");
    }
}
