#![forbid(unsafe_code)]

//! folio runtime
//!
//! Shared view state for the folio portfolio site: the active locale and its
//! persistence, theme, blur, scroll and navigation stores, the translation
//! hook pages read text through, and the timed typewriter reveal.
//!
//! # Key Components
//!
//! - [`Observable`] - single-threaded value with synchronous fan-out
//! - [`Context`] - scoped lookup that hooks resolve their stores from
//! - [`LocaleStore`] - detection, switching and persistence of the locale
//! - [`Translator`] - `t` / `t_array` bound to the current locale
//! - [`ThemeStore`] - explicit or follow-system light/dark theme
//! - [`Typewriter`] - virtual-clock character reveal state machine
//! - [`Providers`] - the root that mounts every store
//!
//! # Role in folio
//! `folio-runtime` sits between the pure content layer (`folio-i18n`) and
//! whatever renders pages. Everything runs on one thread; time only moves
//! when a driver advances it, which keeps every behavior reproducible in
//! tests.

pub mod blur;
pub mod config;
pub mod context;
pub mod environment;
pub mod locale_store;
pub mod navigation;
pub mod providers;
pub mod reactive;
pub mod scroll;
pub mod storage;
pub mod theme;
pub mod timer;
pub mod translation;
pub mod typewriter;

pub use blur::{BlurStore, use_blur};
pub use config::{ConfigError, FolioConfig};
pub use context::{Context, ContextError};
pub use environment::{ColorScheme, Environment, StaticEnvironment, SystemEnvironment};
pub use locale_store::{LocaleProvider, LocaleStore, Phase, use_locale};
pub use navigation::{NavigationState, NavigationStore, use_navigation};
pub use providers::Providers;
pub use reactive::{Observable, Subscription};
pub use scroll::{DEFAULT_SCROLL_THRESHOLD, ScrollStore, use_scroll};
pub use storage::{FileStorage, MemoryStorage, PreferenceStorage, StorageError};
pub use theme::{ParseThemeModeError, ResolvedTheme, ThemeMode, ThemeOptions, ThemeStore, use_theme};
pub use timer::{TimerId, TimerQueue};
pub use translation::{Translator, use_translation};
pub use typewriter::{Typewriter, TypewriterConfig, TypewriterFrame, TypewriterPhase};
