#![forbid(unsafe_code)]

//! Current and previous route, so pages can offer "back" links that
//! return to where the visitor came from.

use crate::context::{Context, ContextError};
use crate::reactive::{Observable, Subscription};

/// Pathname history one step deep.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationState {
    pub current: String,
    pub previous: Option<String>,
}

/// Shared navigation state. Clones refer to the same store.
#[derive(Debug, Clone)]
pub struct NavigationStore {
    state: Observable<NavigationState>,
}

impl NavigationStore {
    pub const PROVIDER: &'static str = "AppProvider";

    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            state: Observable::new(NavigationState {
                current: initial.into(),
                previous: None,
            }),
        }
    }

    #[must_use]
    pub fn current(&self) -> String {
        self.state.with(|s| s.current.clone())
    }

    #[must_use]
    pub fn previous(&self) -> Option<String> {
        self.state.with(|s| s.previous.clone())
    }

    #[must_use]
    pub fn state(&self) -> NavigationState {
        self.state.get()
    }

    /// Move to `path`. Navigating to the current path changes nothing.
    pub fn navigate(&self, path: impl Into<String>) {
        let path = path.into();
        if self.state.with(|s| s.current == path) {
            return;
        }
        self.state.update(move |s| {
            let from = std::mem::replace(&mut s.current, path);
            s.previous = Some(from);
        });
    }

    pub fn subscribe(&self, callback: impl Fn(&NavigationState) + 'static) -> Subscription {
        self.state.subscribe(callback)
    }

    /// Render `child` with this store in context.
    pub fn provide<R>(&self, cx: &Context, child: impl FnOnce(&Context) -> R) -> R {
        child(&cx.provide(self.clone()))
    }
}

/// Access navigation state from inside its provider.
pub fn use_navigation(cx: &Context) -> Result<NavigationStore, ContextError> {
    cx.require::<NavigationStore>("use_navigation", NavigationStore::PROVIDER)
        .cloned()
}
