use crate::domain::catalog::Catalog;
use crate::utils::error::{ListingError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, validate_slot_name, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub storage: Option<StorageConfig>,
    pub logging: Option<LoggingConfig>,
    pub catalog: Option<CatalogConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: Option<String>,
    pub slot: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    /// `compact` (default) or `json`.
    pub format: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub makers: BTreeMap<String, Vec<String>>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| ListingError::ConfigError {
            field: path.as_ref().display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| ListingError::ConfigError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DEALER_DATA_DIR})
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn data_dir(&self) -> Option<&str> {
        self.storage.as_ref()?.data_dir.as_deref()
    }

    pub fn slot(&self) -> Option<&str> {
        self.storage.as_ref()?.slot.as_deref()
    }

    pub fn log_format(&self) -> Option<&str> {
        self.logging.as_ref()?.format.as_deref()
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref()?.level.as_deref()
    }

    pub fn catalog(&self) -> Option<Catalog> {
        self.catalog
            .as_ref()
            .map(|c| Catalog::new(c.makers.clone()))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(dir) = self.data_dir() {
            validate_path("storage.data_dir", dir)?;
        }
        if let Some(slot) = self.slot() {
            validate_slot_name("storage.slot", slot)?;
        }

        if let Some(format) = self.log_format() {
            if !matches!(format, "compact" | "json") {
                return Err(ListingError::ConfigError {
                    field: "logging.format".to_string(),
                    message: format!("unsupported format '{}', use compact or json", format),
                });
            }
        }

        if let Some(catalog) = &self.catalog {
            if catalog.makers.is_empty() {
                return Err(ListingError::ConfigError {
                    field: "catalog.makers".to_string(),
                    message: "at least one maker is required".to_string(),
                });
            }
            for (maker, models) in &catalog.makers {
                let field = format!("catalog.makers.{}", maker);
                validate_non_empty_string(&field, maker).map_err(|e| config_error(&field, e))?;
                if models.is_empty() {
                    return Err(ListingError::ConfigError {
                        field,
                        message: "maker has no models".to_string(),
                    });
                }
                for model in models {
                    validate_non_empty_string(&field, model).map_err(|e| config_error(&field, e))?;
                }
            }
        }

        Ok(())
    }
}

fn config_error(field: &str, source: ListingError) -> ListingError {
    ListingError::ConfigError {
        field: field.to_string(),
        message: source.to_string(),
    }
}
