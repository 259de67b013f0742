#![forbid(unsafe_code)]

//! Single-owner shared value with synchronous change fan-out.
//!
//! Stores keep their authoritative state in an [`Observable`]. Every handle
//! reads the same `Rc<RefCell<..>>`, and a write that changes the value
//! (by `PartialEq`) runs each live callback once, in the order the callbacks
//! were registered.
//!
//! Writes issued from inside a callback are queued. The running pass finishes
//! with the value it started with, then the queued write gets a pass of its
//! own. No reader ever sees a value that only some subscribers were told
//! about.
//!
//! Callbacks are held weakly. Dropping the [`Subscription`] returned by
//! [`Observable::subscribe`] retires the callback; its slot is reclaimed on
//! the next pass.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use tracing::{debug, trace_span};
use web_time::Instant;

// Strong side lives in the `Subscription`, weak side in the list.
type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

/// A write issued while the observable was notifying.
enum DeferredWrite<T> {
    Set(T),
    Update(Box<dyn FnOnce(&mut T)>),
}

struct ObservableInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<CallbackWeak<T>>,
    /// True while a fan-out pass is running.
    notifying: bool,
    deferred: VecDeque<DeferredWrite<T>>,
}

/// Authoritative value plus its subscribers. Clones are handles to one value.
///
/// # Invariants
///
/// 1. Each effective change bumps `version` by one; writing an equal value
///    changes nothing and notifies nobody.
/// 2. Callbacks run in registration order.
/// 3. A write issued during a pass is applied after the pass, in issue order.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Version starts at 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                subscribers: Vec::new(),
                notifying: false,
                deferred: VecDeque::new(),
            })),
        }
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value, notifying subscribers if it differs.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.notifying {
                inner.deferred.push_back(DeferredWrite::Set(value));
                return;
            }
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Edit the value in place; notifies only if the edit changed it.
    pub fn update(&self, f: impl FnOnce(&mut T) + 'static) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.notifying {
                inner.deferred.push_back(DeferredWrite::Update(Box::new(f)));
                return;
            }
            if !apply_update(&mut inner, f) {
                return;
            }
        }
        self.notify();
    }

    /// Register `callback` for future changes. It stays registered for as
    /// long as the returned guard lives.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        let weak = Rc::downgrade(&strong);
        self.inner.borrow_mut().subscribers.push(weak);
        // `Rc<dyn Fn(&T)>` cannot coerce to `Rc<dyn Any>` directly, so box it.
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Count of effective changes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Registered slots, counting retired callbacks not yet reclaimed.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Callbacks whose guard is still alive.
    #[must_use]
    pub fn live_subscriber_count(&self) -> usize {
        let mut inner = self.inner.borrow_mut();
        inner.subscribers.retain(|w| w.strong_count() > 0);
        inner.subscribers.len()
    }

    /// Notify live subscribers, then drain writes deferred during the pass.
    fn notify(&self) {
        loop {
            let (callbacks, value) = {
                let mut inner = self.inner.borrow_mut();
                inner.subscribers.retain(|w| w.strong_count() > 0);
                let callbacks: Vec<CallbackRc<T>> =
                    inner.subscribers.iter().filter_map(Weak::upgrade).collect();
                inner.notifying = true;
                (callbacks, inner.value.clone())
            };

            {
                let _flag = NotifyingFlag { inner: &self.inner };
                if !callbacks.is_empty() {
                    let started = Instant::now();
                    let span = trace_span!(
                        "folio.fanout",
                        subscribers = callbacks.len() as u64,
                        duration_us = tracing::field::Empty
                    );
                    let _entered = span.enter();
                    for cb in &callbacks {
                        cb(&value);
                    }
                    span.record("duration_us", started.elapsed().as_micros() as u64);
                }
            }

            let changed = {
                let mut inner = self.inner.borrow_mut();
                let mut changed = false;
                while let Some(write) = inner.deferred.pop_front() {
                    changed = match write {
                        DeferredWrite::Set(next) => {
                            if inner.value == next {
                                false
                            } else {
                                inner.value = next;
                                inner.version += 1;
                                true
                            }
                        }
                        DeferredWrite::Update(f) => apply_update(&mut inner, f),
                    };
                    if changed {
                        break;
                    }
                }
                changed
            };
            if !changed {
                return;
            }
            debug!(
                version = self.version(),
                "applying write deferred during fan-out"
            );
        }
    }
}

fn apply_update<T: Clone + PartialEq>(
    inner: &mut ObservableInner<T>,
    f: impl FnOnce(&mut T),
) -> bool {
    let old = inner.value.clone();
    f(&mut inner.value);
    if inner.value != old {
        inner.version += 1;
        true
    } else {
        false
    }
}

/// Clears the notifying flag when a pass ends, including by unwinding.
struct NotifyingFlag<'a, T> {
    inner: &'a RefCell<ObservableInner<T>>,
}

impl<T> Drop for NotifyingFlag<'_, T> {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.notifying = false;
        }
    }
}

/// Keeps a callback registered. Drop it to unsubscribe.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
