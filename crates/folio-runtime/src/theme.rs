#![forbid(unsafe_code)]

//! Light/dark theme selection.
//!
//! The store holds a [`ThemeMode`]: an explicit `Light` or `Dark` choice, or
//! `System`, which follows the environment color-scheme signal. The
//! [`ResolvedTheme`] is what pages actually paint with.
//!
//! # Follow-system law
//!
//! While the mode is `System`, every change of the environment signal
//! re-derives the resolved theme. After an explicit choice the signal is
//! still observed but no longer moves the resolved theme, until
//! [`ThemeStore::reset_to_system`].
//!
//! With [`ThemeOptions::reconcile_with_system`] enabled, an explicit choice
//! that matches the system preference collapses back into `System`. This is
//! off by default.
//!
//! The environment subscription is made once in [`ThemeStore::new`] and
//! released when the last handle to the store is dropped.

use crate::context::{Context, ContextError};
use crate::environment::{ColorScheme, Environment};
use crate::reactive::{Observable, Subscription};
use crate::storage::{PreferenceStorage, THEME_KEY};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;
use tracing::{debug, warn};

/// Requested theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeMode {
    pub const ALL: [ThemeMode; 3] = [ThemeMode::Light, ThemeMode::Dark, ThemeMode::System];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// The explicit mode for a resolved theme.
    #[must_use]
    pub const fn explicit(theme: ResolvedTheme) -> Self {
        match theme {
            ResolvedTheme::Light => Self::Light,
            ResolvedTheme::Dark => Self::Dark,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`ThemeMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseThemeModeError(pub String);

impl fmt::Display for ParseThemeModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown theme mode '{}' (expected light, dark or system)",
            self.0
        )
    }
}

impl std::error::Error for ParseThemeModeError {}

impl FromStr for ThemeMode {
    type Err = ParseThemeModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            _ => Err(ParseThemeModeError(s.to_string())),
        }
    }
}

/// Theme actually in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvedTheme {
    Light,
    Dark,
}

impl ResolvedTheme {
    /// Class name applied to the document root.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl From<ColorScheme> for ResolvedTheme {
    fn from(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Light => Self::Light,
            ColorScheme::Dark => Self::Dark,
        }
    }
}

impl fmt::Display for ResolvedTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Behavior switches for a [`ThemeStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThemeOptions {
    /// Collapse an explicit choice into `System` when the two agree.
    pub reconcile_with_system: bool,
}

/// Mode and resolved theme, published together so no reader sees one
/// without the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ThemeState {
    mode: ThemeMode,
    resolved: ResolvedTheme,
}

struct ThemeInner {
    state: Observable<ThemeState>,
    system: Observable<ColorScheme>,
    storage: Option<Rc<dyn PreferenceStorage>>,
    options: ThemeOptions,
    env_subscription: RefCell<Option<Subscription>>,
}

impl ThemeInner {
    fn resolve(&self, mode: ThemeMode) -> ResolvedTheme {
        match mode {
            ThemeMode::Light => ResolvedTheme::Light,
            ThemeMode::Dark => ResolvedTheme::Dark,
            ThemeMode::System => self.system.get().into(),
        }
    }

    fn mode(&self) -> ThemeMode {
        self.state.with(|s| s.mode)
    }

    fn apply_mode(&self, mode: ThemeMode) {
        let mode = self.reconciled(mode);
        self.state.set(ThemeState {
            mode,
            resolved: self.resolve(mode),
        });
        if let Some(storage) = &self.storage
            && let Err(err) = storage.set(THEME_KEY, mode.as_str())
        {
            warn!(mode = %mode, error = %err, "failed to persist theme preference");
        }
    }

    fn reconciled(&self, mode: ThemeMode) -> ThemeMode {
        if self.options.reconcile_with_system
            && mode != ThemeMode::System
            && self.resolve(mode) == ResolvedTheme::from(self.system.get())
        {
            debug!(mode = %mode, "explicit theme matches system, following system");
            ThemeMode::System
        } else {
            mode
        }
    }

    fn on_system_change(&self, scheme: ColorScheme) {
        let mode = self.mode();
        if mode == ThemeMode::System {
            self.state.set(ThemeState {
                mode,
                resolved: scheme.into(),
            });
        } else if self.options.reconcile_with_system && self.reconciled(mode) != mode {
            self.apply_mode(ThemeMode::System);
        }
    }
}

/// Shared theme state. Clones refer to the same store.
#[derive(Clone)]
pub struct ThemeStore {
    inner: Rc<ThemeInner>,
}

impl fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeStore")
            .field("mode", &self.mode())
            .field("resolved", &self.resolved())
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

impl ThemeStore {
    pub const PROVIDER: &'static str = "ThemeProvider";

    /// Create the store and subscribe to the environment color scheme.
    ///
    /// With `storage`, the persisted mode (if valid) is restored and every
    /// change is written back.
    pub fn new(
        environment: &dyn Environment,
        storage: Option<Rc<dyn PreferenceStorage>>,
        options: ThemeOptions,
    ) -> Self {
        let system = environment.color_scheme();
        let mode = storage
            .as_ref()
            .and_then(|s| s.get(THEME_KEY))
            .and_then(|raw| match raw.parse::<ThemeMode>() {
                Ok(mode) => Some(mode),
                Err(err) => {
                    debug!(error = %err, "ignoring persisted theme");
                    None
                }
            })
            .unwrap_or_default();

        let resolved = match mode {
            ThemeMode::System => system.get().into(),
            ThemeMode::Light => ResolvedTheme::Light,
            ThemeMode::Dark => ResolvedTheme::Dark,
        };
        let inner = Rc::new(ThemeInner {
            state: Observable::new(ThemeState { mode, resolved }),
            system: system.clone(),
            storage,
            options,
            env_subscription: RefCell::new(None),
        });

        let weak: Weak<ThemeInner> = Rc::downgrade(&inner);
        let subscription = system.subscribe(move |scheme| {
            if let Some(inner) = weak.upgrade() {
                inner.on_system_change(*scheme);
            }
        });
        *inner.env_subscription.borrow_mut() = Some(subscription);

        Self { inner }
    }

    #[must_use]
    pub fn mode(&self) -> ThemeMode {
        self.inner.mode()
    }

    #[must_use]
    pub fn resolved(&self) -> ResolvedTheme {
        self.inner.state.with(|s| s.resolved)
    }

    /// Current environment preference, whether or not it is being followed.
    #[must_use]
    pub fn system(&self) -> ColorScheme {
        self.inner.system.get()
    }

    pub fn set_mode(&self, mode: ThemeMode) {
        self.inner.apply_mode(mode);
    }

    /// Go back to following the environment.
    pub fn reset_to_system(&self) {
        self.set_mode(ThemeMode::System);
    }

    /// Explicitly pick the opposite of the resolved theme.
    pub fn toggle(&self) -> ResolvedTheme {
        let next = self.resolved().opposite();
        self.set_mode(ThemeMode::explicit(next));
        self.resolved()
    }

    /// Accessible label for the toggle button.
    #[must_use]
    pub fn toggle_label(&self) -> String {
        format!("Switch to {} theme", self.resolved().opposite())
    }

    /// Observe resolved-theme changes.
    pub fn subscribe(&self, callback: impl Fn(ResolvedTheme) + 'static) -> Subscription {
        let last = Cell::new(self.resolved());
        self.inner.state.subscribe(move |s| {
            if last.replace(s.resolved) != s.resolved {
                callback(s.resolved);
            }
        })
    }

    /// Observe mode changes.
    pub fn subscribe_mode(&self, callback: impl Fn(ThemeMode) + 'static) -> Subscription {
        let last = Cell::new(self.mode());
        self.inner.state.subscribe(move |s| {
            if last.replace(s.mode) != s.mode {
                callback(s.mode);
            }
        })
    }

    /// Render `child` with this store in context.
    pub fn provide<R>(&self, cx: &Context, child: impl FnOnce(&Context) -> R) -> R {
        child(&cx.provide(self.clone()))
    }
}

/// Access the theme store from inside its provider.
pub fn use_theme(cx: &Context) -> Result<ThemeStore, ContextError> {
    cx.require::<ThemeStore>("use_theme", ThemeStore::PROVIDER)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::StaticEnvironment;
    use crate::storage::MemoryStorage;

    fn store(env: &StaticEnvironment) -> ThemeStore {
        ThemeStore::new(env, None, ThemeOptions::default())
    }

    #[test]
    fn parse_modes() {
        assert_eq!("Dark".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
        assert_eq!(" system ".parse::<ThemeMode>(), Ok(ThemeMode::System));
        assert!("sepia".parse::<ThemeMode>().is_err());
    }

    #[test]
    fn system_mode_follows_signal() {
        let env = StaticEnvironment::default();
        let theme = store(&env);
        assert_eq!(theme.mode(), ThemeMode::System);
        assert_eq!(theme.resolved(), ResolvedTheme::Light);

        env.set_color_scheme(ColorScheme::Dark);
        assert_eq!(theme.resolved(), ResolvedTheme::Dark);
        assert_eq!(theme.mode(), ThemeMode::System);
    }

    #[test]
    fn explicit_choice_overrides_signal_until_reset() {
        let env = StaticEnvironment::default();
        let theme = store(&env);
        theme.set_mode(ThemeMode::Light);

        env.set_color_scheme(ColorScheme::Dark);
        assert_eq!(theme.resolved(), ResolvedTheme::Light);

        theme.reset_to_system();
        assert_eq!(theme.resolved(), ResolvedTheme::Dark);
    }

    #[test]
    fn toggle_and_label() {
        let env = StaticEnvironment::default();
        let theme = store(&env);
        assert_eq!(theme.toggle_label(), "Switch to dark theme");
        assert_eq!(theme.toggle(), ResolvedTheme::Dark);
        assert_eq!(theme.mode(), ThemeMode::Dark);
        assert_eq!(theme.toggle_label(), "Switch to light theme");
    }

    #[test]
    fn persisted_mode_restored_and_written() {
        let env = StaticEnvironment::default();
        let storage = Rc::new(MemoryStorage::with_entries([(THEME_KEY, "dark")]));
        let shared: Rc<dyn PreferenceStorage> = storage.clone();
        let theme = ThemeStore::new(&env, Some(shared), ThemeOptions::default());
        assert_eq!(theme.mode(), ThemeMode::Dark);

        theme.set_mode(ThemeMode::System);
        assert_eq!(storage.get(THEME_KEY).as_deref(), Some("system"));
    }

    #[test]
    fn invalid_persisted_mode_ignored() {
        let env = StaticEnvironment::default();
        let storage: Rc<dyn PreferenceStorage> =
            Rc::new(MemoryStorage::with_entries([(THEME_KEY, "neon")]));
        let theme = ThemeStore::new(&env, Some(storage), ThemeOptions::default());
        assert_eq!(theme.mode(), ThemeMode::System);
    }

    #[test]
    fn reconcile_collapses_matching_choice() {
        let env = StaticEnvironment::default();
        let theme = ThemeStore::new(
            &env,
            None,
            ThemeOptions {
                reconcile_with_system: true,
            },
        );
        theme.set_mode(ThemeMode::Dark);
        assert_eq!(theme.mode(), ThemeMode::Dark);

        env.set_color_scheme(ColorScheme::Dark);
        assert_eq!(theme.mode(), ThemeMode::System);
        assert_eq!(theme.resolved(), ResolvedTheme::Dark);

        theme.set_mode(ThemeMode::Dark);
        assert_eq!(theme.mode(), ThemeMode::System);
    }

    #[test]
    fn dropping_store_releases_env_subscription() {
        let env = StaticEnvironment::default();
        let theme = store(&env);
        let other_handle = theme.clone();
        assert_eq!(env.color_scheme().live_subscriber_count(), 1);

        drop(theme);
        assert_eq!(env.color_scheme().live_subscriber_count(), 1);
        drop(other_handle);
        assert_eq!(env.color_scheme().live_subscriber_count(), 0);
    }

    #[test]
    fn resolved_subscribers_see_system_changes() {
        let env = StaticEnvironment::default();
        let theme = store(&env);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _sub = theme.subscribe(move |t| seen_clone.borrow_mut().push(t));

        env.set_color_scheme(ColorScheme::Dark);
        env.set_color_scheme(ColorScheme::Light);
        assert_eq!(*seen.borrow(), vec![ResolvedTheme::Dark, ResolvedTheme::Light]);
    }

    #[test]
    fn mode_subscribers_read_matching_resolved_theme() {
        let env = StaticEnvironment::default();
        let theme = store(&env);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in = Rc::clone(&seen);
        let reader = theme.clone();
        let _sub = theme.subscribe_mode(move |m| seen_in.borrow_mut().push((m, reader.resolved())));

        theme.set_mode(ThemeMode::Dark);
        theme.set_mode(ThemeMode::System);
        assert_eq!(
            *seen.borrow(),
            vec![
                (ThemeMode::Dark, ResolvedTheme::Dark),
                (ThemeMode::System, ResolvedTheme::Light)
            ]
        );
    }

    #[test]
    fn resolved_subscribers_read_matching_mode() {
        let env = StaticEnvironment::default();
        let theme = store(&env);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in = Rc::clone(&seen);
        let reader = theme.clone();
        let _sub = theme.subscribe(move |t| seen_in.borrow_mut().push((reader.mode(), t)));

        theme.toggle();
        // Same resolved theme, different mode: no resolved notification.
        env.set_color_scheme(ColorScheme::Dark);
        theme.set_mode(ThemeMode::System);
        assert_eq!(*seen.borrow(), vec![(ThemeMode::Dark, ResolvedTheme::Dark)]);
    }

    #[test]
    fn hook_outside_provider_fails() {
        assert!(use_theme(&Context::root()).is_err());
        let env = StaticEnvironment::default();
        let theme = store(&env);
        let mode = theme.provide(&Context::root(), |cx| use_theme(cx).map(|t| t.mode()));
        assert_eq!(mode, Ok(ThemeMode::System));
    }
}
