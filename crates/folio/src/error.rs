#![forbid(unsafe_code)]

//! folio error model and recovery classification.
//!
//! # Design Principles
//!
//! 1. **Lookups never fail** - missing translations echo the key or yield an
//!    empty list; they have no error variant here.
//! 2. **Domain-specific errors** - each subsystem keeps its own typed error
//!    (`I18nError`, `StorageError`, `ConfigError`, `ContextError`) and this
//!    module unifies them for callers that only propagate.
//! 3. **Recovery** - every variant maps to a [`Recovery`] so hosts can tell a
//!    lost preference write (keep going) from a miswired tree (stop).

use folio_i18n::I18nError;
use folio_runtime::{ConfigError, ContextError, StorageError};
use std::fmt;

/// Top-level error type for folio hosts.
#[derive(Debug)]
pub enum Error {
    /// Translation content or locale tag problem.
    I18n(I18nError),
    /// Preference write failure.
    Storage(StorageError),
    /// Configuration could not be loaded.
    Config(ConfigError),
    /// A hook ran outside its provider.
    Context(ContextError),
    /// Filesystem error outside preference storage, e.g. reading a content file.
    Io(std::io::Error),
}

/// Standard result type for folio APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// What a host should do when an error reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Keep the in-memory state; the preference will not survive a reload.
    ContinueInMemory,
    /// Serve the built-in translation content instead.
    UseBuiltinContent,
    /// Unrecoverable: a wiring or input mistake that must be fixed.
    Abort,
}

impl Error {
    /// Recovery action for this error.
    pub fn recovery(&self) -> Recovery {
        match self {
            Self::I18n(I18nError::InvalidLocale(_)) => Recovery::Abort,
            Self::I18n(
                I18nError::Parse(_)
                | I18nError::InvalidKey { .. }
                | I18nError::UnsupportedValue { .. },
            ) => Recovery::UseBuiltinContent,
            Self::Storage(_) => Recovery::ContinueInMemory,
            Self::Config(_) | Self::Context(_) | Self::Io(_) => Recovery::Abort,
        }
    }

    /// Error type label for logs.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::I18n(_) => "i18n",
            Self::Storage(_) => "storage",
            Self::Config(_) => "config",
            Self::Context(_) => "context",
            Self::Io(_) => "io",
        }
    }

    /// Whether the host can keep running.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.recovery(), Recovery::Abort)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I18n(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "config: {err}"),
            Self::Context(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "I/O: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::I18n(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Context(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl fmt::Display for Recovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ContinueInMemory => "continue-in-memory",
            Self::UseBuiltinContent => "use-builtin-content",
            Self::Abort => "abort",
        };
        f.write_str(label)
    }
}

// ── From conversions ────────────────────────────────────────────────────

impl From<I18nError> for Error {
    fn from(err: I18nError) -> Self {
        Self::I18n(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<ContextError> for Error {
    fn from(err: ContextError) -> Self {
        Self::Context(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn missing_provider() -> ContextError {
        ContextError::MissingProvider {
            hook: "use_locale",
            provider: "LocaleProvider",
        }
    }

    #[test]
    fn storage_failures_are_recoverable() {
        let err: Error = StorageError::Io(std::io::Error::other("read-only fs")).into();
        assert_eq!(err.recovery(), Recovery::ContinueInMemory);
        assert!(err.is_recoverable());
        assert_eq!(err.error_type(), "storage");
    }

    #[test]
    fn bad_table_falls_back_to_builtin() {
        let err: Error = I18nError::Parse("expected value".into()).into();
        assert_eq!(err.recovery(), Recovery::UseBuiltinContent);
    }

    #[test]
    fn wiring_and_input_mistakes_abort() {
        let errors: Vec<Error> = vec![
            missing_provider().into(),
            I18nError::InvalidLocale("fr".into()).into(),
            ConfigError::Validation(vec!["typewriter.speed_ms must be > 0".into()]).into(),
            std::io::Error::other("boom").into(),
        ];
        for err in &errors {
            assert_eq!(err.recovery(), Recovery::Abort, "{err}");
            assert!(!err.is_recoverable());
        }
    }

    #[test]
    fn display_passes_through_domain_message() {
        let err = Error::from(missing_provider());
        assert_eq!(err.to_string(), "use_locale must be used within a LocaleProvider");
        assert_eq!(err.error_type(), "context");
    }

    #[test]
    fn source_chain_reaches_io() {
        let err: Error = StorageError::Io(std::io::Error::other("disk full")).into();
        let storage = err.source().expect("storage source");
        let io = storage.source().expect("io source");
        assert_eq!(io.to_string(), "disk full");
    }

    #[test]
    fn question_mark_propagation() {
        fn load() -> Result<()> {
            Err(ConfigError::Validation(vec!["bad".into()]))?;
            Ok(())
        }
        let err = load().unwrap_err();
        assert_eq!(err.error_type(), "config");
        assert_eq!(err.to_string(), "config: validation errors: bad");
    }

    #[test]
    fn recovery_labels() {
        assert_eq!(Recovery::ContinueInMemory.to_string(), "continue-in-memory");
        assert_eq!(Recovery::Abort.to_string(), "abort");
    }
}
