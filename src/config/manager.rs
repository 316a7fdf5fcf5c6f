use super::{
    evolution::GeneticAlgorithmConfig,
    run::RunConfig,
    traits::{ConfigManifest, ConfigSection},
};
use crate::error::EvoError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Prefix for environment overrides, e.g. `EVOPOOL_EVOLUTION__POPULATION_SIZE=200`.
pub const ENV_PREFIX: &str = "EVOPOOL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: GeneticAlgorithmConfig,
    pub run: RunConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), EvoError> {
        self.evolution.validate()?;
        self.run.validate()?;
        Ok(())
    }

    /// Describe every section, keyed by the name it uses in a config file.
    pub fn manifests(&self) -> Vec<(&'static str, ConfigManifest)> {
        vec![
            (GeneticAlgorithmConfig::section_name(), self.evolution.to_manifest()),
            (RunConfig::section_name(), self.run.to_manifest()),
        ]
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Load a TOML or JSON file, with `EVOPOOL_*` environment variables layered on top.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvoError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EvoError::Configuration(format!(
                "Failed to read config: {} does not exist",
                path.display()
            )));
        }

        let config: AppConfig = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|layered| layered.try_deserialize())
            .map_err(|e| EvoError::Configuration(format!("Failed to parse config: {}", e)))?;

        self.replace(config)
    }

    /// Parse a TOML document without consulting the environment.
    pub fn load_from_str(&self, contents: &str) -> Result<(), EvoError> {
        let config: AppConfig = toml::from_str(contents)
            .map_err(|e| EvoError::Configuration(format!("Failed to parse config: {}", e)))?;

        self.replace(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvoError> {
        let toml_str = toml::to_string_pretty(&self.get())
            .map_err(|e| EvoError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, toml_str)
            .map_err(|e| EvoError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply `f` to a copy of the current configuration and keep it only if it validates.
    pub fn update<F>(&self, f: F) -> Result<(), EvoError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut candidate = self.get();
        f(&mut candidate);
        self.replace(candidate)
    }

    fn replace(&self, config: AppConfig) -> Result<(), EvoError> {
        config.validate()?;
        log::debug!("Configuration accepted: {:?}", config);
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
