//! # civi-config
//!
//! Layered configuration loading for civibridge using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CIVIBRIDGE_*` prefix, `__` as separator)
//! 2. Project-level `.civibridge/config.toml`
//! 3. User-level `~/.config/civibridge/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CIVIBRIDGE_CRM__API_KEY` -> `crm.api_key`,
//! `CIVIBRIDGE_STORE__PATH` -> `store.path`, etc. The `__` (double
//! underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use civi_config::CiviConfig;
//!
//! let config = CiviConfig::load_with_dotenv().expect("config");
//!
//! if config.crm.is_configured() {
//!     println!("CRM endpoint: {}", config.crm.endpoint);
//! }
//! ```

mod crm;
mod error;
mod store;
mod sync;

pub use crm::CrmConfig;
pub use error::ConfigError;
pub use store::StoreConfig;
pub use sync::SyncConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding project-local civibridge state.
pub const PROJECT_DIR: &str = ".civibridge";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CiviConfig {
    #[serde(default)]
    pub crm: CrmConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

impl CiviConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a provider fails to parse or a value
    /// has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment_for(Path::new(".")).extract().map_err(ConfigError::from)
    }

    /// Load configuration rooted at an explicit project directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a provider fails to parse or a value
    /// has the wrong type.
    pub fn load_from(project_root: &Path) -> Result<Self, ConfigError> {
        Self::figment_for(project_root)
            .extract()
            .map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Loads `.env` from the current directory (if any) before building the
    /// figment. This is the typical entry point for the CLI.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain for the current directory.
    pub fn figment() -> Figment {
        Self::figment_for(Path::new("."))
    }

    /// Build the figment provider chain for a project root.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment_for(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = project_root.join(PROJECT_DIR).join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("CIVIBRIDGE_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("civibridge").join("config.toml"))
    }
}
