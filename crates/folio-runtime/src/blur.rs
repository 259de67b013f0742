#![forbid(unsafe_code)]

//! Page-wide blur flag, raised while an overlay (e.g. an image carousel) is
//! open. Resets every session.

use crate::context::{Context, ContextError};
use crate::reactive::{Observable, Subscription};

/// Shared blur flag. Clones refer to the same flag.
#[derive(Debug, Clone)]
pub struct BlurStore {
    blurred: Observable<bool>,
}

impl Default for BlurStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlurStore {
    pub const PROVIDER: &'static str = "BlurProvider";

    /// Unblurred store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            blurred: Observable::new(false),
        }
    }

    #[must_use]
    pub fn is_blurred(&self) -> bool {
        self.blurred.get()
    }

    pub fn set_blur(&self, blur: bool) {
        self.blurred.set(blur);
    }

    pub fn subscribe(&self, callback: impl Fn(bool) + 'static) -> Subscription {
        self.blurred.subscribe(move |b| callback(*b))
    }

    /// Render `child` with this store in context.
    pub fn provide<R>(&self, cx: &Context, child: impl FnOnce(&Context) -> R) -> R {
        child(&cx.provide(self.clone()))
    }
}

/// Access the blur store from inside its provider.
pub fn use_blur(cx: &Context) -> Result<BlurStore, ContextError> {
    cx.require::<BlurStore>("use_blur", BlurStore::PROVIDER)
        .cloned()
}
