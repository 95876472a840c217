//! # Application Configuration
//!
//! Settings are read from a YAML file. A missing file means defaults; a file
//! that exists but cannot be parsed is an error.
//!
//! ```yaml
//! data_directory: "./data"
//! autosave_debounce_ms: 1500
//! fallback_film_name: "Nenhuma"
//! default_environment: "Desconhecido"
//! default_application_type: "Desconhecido"
//! budget_name_prefix: "Opção"
//! log_level: "info"
//! ```

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::MeasurementDefaults;
use crate::storage::yaml::connection::write_atomically;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where budgets and the film catalog are stored
    pub data_directory: PathBuf,
    /// Quiet time after the last edit before an automatic save
    pub autosave_debounce_ms: u64,
    /// Film given to new rows when the catalog is empty
    pub fallback_film_name: String,
    pub default_environment: String,
    pub default_application_type: String,
    /// Budget options are named "<prefix> <n>"
    pub budget_name_prefix: String,
    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: PathBuf::from("./data"),
            autosave_debounce_ms: 1500,
            fallback_film_name: "Nenhuma".to_string(),
            default_environment: "Desconhecido".to_string(),
            default_application_type: "Desconhecido".to_string(),
            budget_name_prefix: "Opção".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from a YAML file, falling back to defaults when it does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let yaml_content =
            fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: AppConfig =
            serde_yaml::from_str(&yaml_content).with_context(|| format!("Invalid config {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml_content = serde_yaml::to_string(self)?;
        write_atomically(path.as_ref(), &yaml_content)
    }

    pub fn measurement_defaults(&self) -> MeasurementDefaults {
        MeasurementDefaults {
            fallback_film_name: self.fallback_film_name.clone(),
            environment: self.default_environment.clone(),
            application_type: self.default_application_type.clone(),
        }
    }
}
