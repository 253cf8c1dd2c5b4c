use labelkit_core::engine::{EngineOptions, MaterialNamePolicy};
use labelkit_core::error::LabelkitError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Read from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "labelkit.toml";

/// Settings from `labelkit.toml`.
///
/// ```toml
/// lookup = "tables/pepco.xlsx"
/// reference_currency = "PLN"
/// department = "BABY"
/// log_level = "info"
///
/// [engine]
/// material_name_policy = "case-insensitive"
/// max_components = 5
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Lookup table (.json or .xlsx); the built-in table when unset.
    pub lookup: Option<PathBuf>,
    /// Reference currency for workbook price sheets.
    pub reference_currency: String,
    /// Department used when the sheet's item classification is not recognized.
    pub department: Option<String>,
    pub log_level: String,
    pub engine: EngineSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSection {
    pub material_name_policy: MaterialNamePolicy,
    pub max_components: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            lookup: None,
            reference_currency: "PLN".to_string(),
            department: None,
            log_level: "info".to_string(),
            engine: EngineSection::default(),
        }
    }
}

impl Default for EngineSection {
    fn default() -> Self {
        let options = EngineOptions::default();
        EngineSection {
            material_name_policy: options.material_name_policy,
            max_components: options.max_components,
        }
    }
}

impl Config {
    /// Load the explicit config file, or `labelkit.toml` if present, or
    /// fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, LabelkitError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, LabelkitError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LabelkitError::Config(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content).map_err(|e| match e {
            LabelkitError::Config(msg) => {
                LabelkitError::Config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self, LabelkitError> {
        let config: Config =
            toml::from_str(content).map_err(|e| LabelkitError::Config(e.to_string()))?;
        if config.engine.max_components == 0 {
            return Err(LabelkitError::Config(
                "engine.max_components must be at least 1".into(),
            ));
        }
        Ok(config)
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            material_name_policy: self.engine.material_name_policy,
            max_components: self.engine.max_components,
        }
    }
}
