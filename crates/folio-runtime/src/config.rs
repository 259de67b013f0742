#![forbid(unsafe_code)]

//! Runtime configuration loaded from TOML.
//!
//! ```toml
//! # folio.toml
//! [storage]
//! path = "/home/me/.config/folio/preferences.json"
//!
//! [typewriter]
//! speed_ms = 50
//! delay_ms = 0
//!
//! [scroll]
//! threshold = 300
//!
//! [theme]
//! persist = true
//! reconcile_with_system = false
//! ```
//!
//! Every field has a default, so an empty file (or no file at all) yields
//! [`FolioConfig::default`].

use crate::scroll::DEFAULT_SCROLL_THRESHOLD;
use crate::theme::ThemeOptions;
use crate::typewriter::TypewriterConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FolioConfig {
    pub storage: StorageSection,
    pub typewriter: TypewriterSection,
    pub scroll: ScrollSection,
    pub theme: ThemeSection,
}

/// Where preferences live.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSection {
    /// Preferences file. Unset means the per-user default location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Typewriter timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypewriterSection {
    pub speed_ms: u64,
    pub delay_ms: u64,
}

impl Default for TypewriterSection {
    fn default() -> Self {
        Self {
            speed_ms: 50,
            delay_ms: 0,
        }
    }
}

/// Scroll-to-top affordance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollSection {
    pub threshold: u32,
}

impl Default for ScrollSection {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SCROLL_THRESHOLD,
        }
    }
}

/// Theme behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeSection {
    /// Remember the chosen mode across sessions.
    pub persist: bool,
    pub reconcile_with_system: bool,
}

impl Default for ThemeSection {
    fn default() -> Self {
        Self {
            persist: true,
            reconcile_with_system: false,
        }
    }
}

impl FolioConfig {
    /// Parse a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Read a TOML file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Check value ranges. Returns one message per problem.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.typewriter.speed_ms == 0 {
            errors.push("typewriter.speed_ms must be > 0".into());
        }
        if let Some(path) = &self.storage.path
            && path.as_os_str().is_empty()
        {
            errors.push("storage.path must not be empty".into());
        }
        errors
    }

    #[must_use]
    pub fn typewriter_config(&self) -> TypewriterConfig {
        TypewriterConfig::from_millis(self.typewriter.speed_ms, self.typewriter.delay_ms)
    }

    #[must_use]
    pub fn theme_options(&self) -> ThemeOptions {
        ThemeOptions {
            reconcile_with_system: self.theme.reconcile_with_system,
        }
    }

    /// Preferences file: the configured path, else
    /// `$XDG_CONFIG_HOME/folio/preferences.json`, else
    /// `$HOME/.config/folio/preferences.json`.
    #[must_use]
    pub fn preferences_path(&self) -> Option<PathBuf> {
        self.preferences_path_with(|name| std::env::var_os(name).map(PathBuf::from))
    }

    fn preferences_path_with(&self, var: impl Fn(&str) -> Option<PathBuf>) -> Option<PathBuf> {
        if let Some(path) = &self.storage.path {
            return Some(path.clone());
        }
        let base = var("XDG_CONFIG_HOME")
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| var("HOME").map(|home| home.join(".config")))?;
        Some(base.join("folio").join("preferences.json"))
    }
}

/// Errors from loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading the file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// TOML encode error.
    Serialize(String),
    /// Out-of-range values.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Serialize(e) => write!(f, "TOML encode error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Serialize(_) | Self::Validation(_) => None,
        }
    }
}
