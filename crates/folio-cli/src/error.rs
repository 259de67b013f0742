use folio::{ConfigError, ContextError, I18nError, Recovery, StorageError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Folio(#[from] folio::Error),

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("{message}")]
    Exit { code: i32, message: String },
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exit { code, .. } => *code,
            Self::InvalidArgument { .. } => 2,
            Self::Folio(err) => match err.recovery() {
                Recovery::Abort => 1,
                Recovery::ContinueInMemory | Recovery::UseBuiltinContent => 3,
            },
            Self::Io(_) | Self::Json(_) => 1,
        }
    }

    #[must_use]
    pub fn exit(code: i32, message: impl Into<String>) -> Self {
        Self::Exit {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Folio(err.into())
    }
}

impl From<I18nError> for CliError {
    fn from(err: I18nError) -> Self {
        Self::Folio(err.into())
    }
}

impl From<StorageError> for CliError {
    fn from(err: StorageError) -> Self {
        Self::Folio(err.into())
    }
}

impl From<ContextError> for CliError {
    fn from(err: ContextError) -> Self {
        Self::Folio(err.into())
    }
}
