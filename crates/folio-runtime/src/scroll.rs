#![forbid(unsafe_code)]

//! Vertical scroll offset and the "scroll to top" affordance.

use crate::context::{Context, ContextError};
use crate::reactive::{Observable, Subscription};
use std::cell::Cell;

/// Offset (in pixels) the page must pass before the affordance shows.
pub const DEFAULT_SCROLL_THRESHOLD: u32 = 300;

/// Shared scroll position. Clones refer to the same store.
///
/// Visibility is derived from the offset, so it can never lag behind it.
#[derive(Debug, Clone)]
pub struct ScrollStore {
    offset: Observable<u32>,
    threshold: u32,
}

impl Default for ScrollStore {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_THRESHOLD)
    }
}

impl ScrollStore {
    pub const PROVIDER: &'static str = "ScrollProvider";

    #[must_use]
    pub fn new(threshold: u32) -> Self {
        Self {
            offset: Observable::new(0),
            threshold,
        }
    }

    #[must_use]
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset.get()
    }

    /// True while the offset is strictly above the threshold.
    #[must_use]
    pub fn is_button_visible(&self) -> bool {
        self.offset.with(|offset| *offset > self.threshold)
    }

    /// Record a scroll event.
    pub fn set_offset(&self, offset: u32) {
        self.offset.set(offset);
    }

    /// Jump back to the top of the page.
    pub fn scroll_to_top(&self) {
        self.set_offset(0);
    }

    /// Observe visibility changes of the affordance.
    pub fn subscribe_visibility(&self, callback: impl Fn(bool) + 'static) -> Subscription {
        let threshold = self.threshold;
        let last = Cell::new(self.is_button_visible());
        self.offset.subscribe(move |offset| {
            let visible = *offset > threshold;
            if last.replace(visible) != visible {
                callback(visible);
            }
        })
    }

    /// Observe every offset change.
    pub fn subscribe(&self, callback: impl Fn(u32) + 'static) -> Subscription {
        self.offset.subscribe(move |o| callback(*o))
    }

    /// Render `child` with this store in context.
    pub fn provide<R>(&self, cx: &Context, child: impl FnOnce(&Context) -> R) -> R {
        child(&cx.provide(self.clone()))
    }
}

/// Access the scroll store from inside its provider.
pub fn use_scroll(cx: &Context) -> Result<ScrollStore, ContextError> {
    cx.require::<ScrollStore>("use_scroll", ScrollStore::PROVIDER)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn visible_strictly_above_threshold() {
        let scroll = ScrollStore::default();
        scroll.set_offset(300);
        assert!(!scroll.is_button_visible());
        scroll.set_offset(301);
        assert!(scroll.is_button_visible());
    }

    #[test]
    fn scroll_to_top_hides_button() {
        let scroll = ScrollStore::new(100);
        scroll.set_offset(500);
        scroll.scroll_to_top();
        assert_eq!(scroll.offset(), 0);
        assert!(!scroll.is_button_visible());
    }

    #[test]
    fn visibility_notifies_only_on_crossing() {
        let scroll = ScrollStore::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_clone = Rc::clone(&log);
        let _sub = scroll.subscribe_visibility(move |v| log_clone.borrow_mut().push(v));

        for offset in [10, 200, 400, 450, 900, 250, 0] {
            scroll.set_offset(offset);
        }
        assert_eq!(*log.borrow(), vec![true, false]);
    }

    #[test]
    fn offset_subscribers_read_current_visibility() {
        let scroll = ScrollStore::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_in = Rc::clone(&log);
        let reader = scroll.clone();
        let _sub = scroll.subscribe(move |o| log_in.borrow_mut().push((o, reader.is_button_visible())));

        scroll.set_offset(500);
        scroll.scroll_to_top();
        assert_eq!(*log.borrow(), vec![(500, true), (0, false)]);
    }

    #[test]
    fn hook_requires_provider() {
        assert!(use_scroll(&Context::root()).is_err());
        let scroll = ScrollStore::default();
        let threshold = scroll.provide(&Context::root(), |cx| use_scroll(cx).map(|s| s.threshold()));
        assert_eq!(threshold, Ok(300));
    }
}
