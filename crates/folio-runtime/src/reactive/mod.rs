//! Reactive primitives shared by every store.
//!
//! Each piece of shared view state (locale, theme, blur, scroll, navigation)
//! sits on an [`Observable`]: one authoritative value, any number of
//! readers, synchronous fan-out to subscribers on change.

pub mod observable;

pub use observable::{Observable, Subscription};
