#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{AddArgs, CliConfig, Command};
pub use toml_config::TomlConfig;

use crate::adapters::LocalStorage;
use crate::core::persistence::Persistence;
use crate::core::store::ListingStore;
use crate::core::ConfigProvider;
use crate::domain::catalog::Catalog;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_slot_name, Validate};

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_SLOT: &str = "cars";

/// Effective settings after merging command line flags over the TOML file
/// over built-in defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: String,
    pub slot: String,
    pub catalog: Catalog,
    pub log_format: String,
    pub log_level: Option<String>,
}

impl Settings {
    pub fn resolve(
        toml: Option<&TomlConfig>,
        data_dir: Option<&str>,
        slot: Option<&str>,
    ) -> Result<Self> {
        if let Some(toml) = toml {
            toml.validate()?;
        }

        let settings = Self {
            data_dir: data_dir
                .or_else(|| toml.and_then(TomlConfig::data_dir))
                .unwrap_or(DEFAULT_DATA_DIR)
                .to_string(),
            slot: slot
                .or_else(|| toml.and_then(TomlConfig::slot))
                .unwrap_or(DEFAULT_SLOT)
                .to_string(),
            catalog: toml.and_then(TomlConfig::catalog).unwrap_or_default(),
            log_format: toml
                .and_then(TomlConfig::log_format)
                .unwrap_or("compact")
                .to_string(),
            log_level: toml.and_then(TomlConfig::log_level).map(str::to_string),
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            slot: DEFAULT_SLOT.to_string(),
            catalog: Catalog::default(),
            log_format: "compact".to_string(),
            log_level: None,
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_path("data_dir", &self.data_dir)?;
        validate_slot_name("slot", &self.slot)?;
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn slot(&self) -> &str {
        &self.slot
    }

    fn catalog(&self) -> Catalog {
        self.catalog.clone()
    }
}

/// Opens the file-backed store described by `config`.
pub fn open_store(config: &impl ConfigProvider) -> Result<ListingStore<LocalStorage>> {
    let storage = LocalStorage::new(config.data_dir());
    tracing::debug!(
        "Opening slot '{}' under {}",
        config.slot(),
        storage.base_path().display()
    );
    ListingStore::open(Persistence::new(storage, config.slot()), config.catalog())
}
