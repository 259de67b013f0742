//! Wiring shared by every command: config, preferences, content, providers.

use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use clap::Args;
use folio::{
    Environment, FileStorage, FolioConfig, MemoryStorage, PreferenceStorage, Providers, Recovery,
    SystemEnvironment, TranslationTable,
};
use tracing::{debug, warn};

use crate::error::{CliError, Result};

/// Options accepted by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// TOML config file. Missing file means defaults.
    #[arg(long, global = true, env = "FOLIO_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Preferences file, overriding `storage.path` from the config.
    #[arg(long, global = true, env = "FOLIO_PREFERENCES", value_name = "PATH")]
    pub preferences: Option<PathBuf>,

    /// Emit machine-readable JSON on stdout.
    #[arg(long, global = true)]
    pub json: bool,
}

/// A mounted provider tree plus the config it was built from.
pub struct Session {
    pub config: FolioConfig,
    pub preferences: Option<PathBuf>,
    pub providers: Providers,
}

impl Session {
    /// Mount providers with the built-in content.
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        Self::open_with(global, None)
    }

    /// Mount providers, reading content from `table_path` when given.
    pub fn open_with(global: &GlobalArgs, table_path: Option<&PathBuf>) -> Result<Self> {
        let config = load_config(global)?;
        let table = load_table_or_builtin(table_path)?;
        let preferences = preferences_path(global, &config);
        let storage = open_storage(preferences.as_ref());
        let environment: Rc<dyn Environment> = Rc::new(SystemEnvironment::detect());
        let providers = Providers::mount(&config, storage, environment, table);
        Ok(Self {
            config,
            preferences,
            providers,
        })
    }
}

pub fn load_config(global: &GlobalArgs) -> Result<FolioConfig> {
    match &global.config {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            Ok(FolioConfig::load(path)?)
        }
        None => Ok(FolioConfig::default()),
    }
}

pub fn preferences_path(global: &GlobalArgs, config: &FolioConfig) -> Option<PathBuf> {
    global
        .preferences
        .clone()
        .or_else(|| config.preferences_path())
}

/// File-backed storage when a location is known, otherwise in-memory.
pub fn open_storage(path: Option<&PathBuf>) -> Rc<dyn PreferenceStorage> {
    match path {
        Some(path) => Rc::new(FileStorage::new(path)),
        None => {
            warn!("no preferences location; choices will not be saved");
            Rc::new(MemoryStorage::new())
        }
    }
}

/// Built-in content, or a JSON table file.
pub fn load_table(path: Option<&PathBuf>) -> Result<Arc<TranslationTable>> {
    match path {
        Some(path) => {
            let source = std::fs::read_to_string(path)?;
            Ok(Arc::new(TranslationTable::from_json_str(&source)?))
        }
        None => Ok(folio::builtin()?),
    }
}

/// Like [`load_table`], but content that fails to parse is replaced by the
/// built-in content. An unreadable file is still an error.
pub fn load_table_or_builtin(path: Option<&PathBuf>) -> Result<Arc<TranslationTable>> {
    match load_table(path) {
        Err(CliError::Folio(err)) if err.recovery() == Recovery::UseBuiltinContent => {
            warn!(error = %err, "translation table rejected, serving built-in content");
            Ok(folio::builtin()?)
        }
        other => other,
    }
}
