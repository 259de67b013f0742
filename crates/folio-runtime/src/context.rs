#![forbid(unsafe_code)]

//! Scoped dependency lookup for the view tree.
//!
//! A [`Context`] is an immutable, cheaply cloned chain of provided values.
//! Providers extend it with [`Context::provide`] and hand the child context
//! to everything they render; consumers look values up by type and get the
//! nearest provider's value.
//!
//! Hooks built on [`Context::require`] return
//! [`ContextError::MissingProvider`] when called outside their provider, so a
//! miswired tree fails on first render instead of silently using a default.

use std::any::{Any, type_name};
use std::fmt;
use std::rc::Rc;

/// Errors from context lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// A hook ran outside the provider that supplies its value.
    MissingProvider {
        hook: &'static str,
        provider: &'static str,
    },
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingProvider { hook, provider } => {
                write!(f, "{hook} must be used within a {provider}")
            }
        }
    }
}

impl std::error::Error for ContextError {}

struct Node {
    value: Rc<dyn Any>,
    type_name: &'static str,
    parent: Option<Rc<Node>>,
}

/// Immutable chain of provided values.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Rc<Node>>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            list.entry(&n.type_name);
            node = n.parent.as_deref();
        }
        list.finish()
    }
}

impl Context {
    /// Empty root context.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// A child context that also provides `value`. Shadows any ancestor
    /// value of the same type.
    #[must_use]
    pub fn provide<T: 'static>(&self, value: T) -> Self {
        Self {
            head: Some(Rc::new(Node {
                value: Rc::new(value),
                type_name: type_name::<T>(),
                parent: self.head.clone(),
            })),
        }
    }

    /// Nearest provided value of type `T`.
    #[must_use]
    pub fn get<T: 'static>(&self) -> Option<&T> {
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            if let Some(value) = n.value.downcast_ref::<T>() {
                return Some(value);
            }
            node = n.parent.as_deref();
        }
        None
    }

    /// Like [`Context::get`], naming the hook and provider in the error.
    pub fn require<T: 'static>(
        &self,
        hook: &'static str,
        provider: &'static str,
    ) -> Result<&T, ContextError> {
        self.get::<T>()
            .ok_or(ContextError::MissingProvider { hook, provider })
    }

    /// Number of provided values in the chain.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            depth += 1;
            node = n.parent.as_deref();
        }
        depth
    }
}
