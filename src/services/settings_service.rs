use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::models::{ExtraTvlKey, ExtraTvlToggles};
use crate::utils::errors::ChartError;

/// Key-value store for boolean dashboard settings
pub trait SettingsStore {
    /// Missing keys read as false
    fn get(&self, key: &str) -> bool;
    fn set(&mut self, key: &str, value: bool) -> Result<(), ChartError>;
}

/// Process-local settings, used by tests and one-shot commands
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: BTreeMap<String, bool>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> bool {
        self.values.get(key).copied().unwrap_or(false)
    }

    fn set(&mut self, key: &str, value: bool) -> Result<(), ChartError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Settings persisted as a flat JSON object, rewritten on every change
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    values: BTreeMap<String, bool>,
}

impl FileSettings {
    /// Open the settings file; a missing file starts empty
    pub fn open(path: &Path) -> Result<Self, ChartError> {
        let values = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            debug!("Settings file {} not found, starting empty", path.display());
            BTreeMap::new()
        };

        Ok(FileSettings {
            path: path.to_path_buf(),
            values,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), ChartError> {
        let json = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: &str) -> bool {
        self.values.get(key).copied().unwrap_or(false)
    }

    fn set(&mut self, key: &str, value: bool) -> Result<(), ChartError> {
        self.values.insert(key.to_string(), value);
        self.save()?;
        info!("Setting '{}' = {} saved to {}", key, value, self.path.display());
        Ok(())
    }
}

/// Snapshot the extra-TVL toggles out of a settings store
pub fn extra_tvl_toggles(store: &dyn SettingsStore) -> ExtraTvlToggles {
    ExtraTvlKey::ALL
        .iter()
        .fold(ExtraTvlToggles::new(), |toggles, key| toggles.with(*key, store.get(key.key())))
}

/// Parse "on"/"off"-style values used by the toggle command
pub fn parse_flag(value: &str) -> Result<bool, ChartError> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(ChartError::InvalidInput(format!(
            "expected on/off, got '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_settings_default_false() {
        let mut store = MemorySettings::new();
        assert!(!store.get("staking"));
        store.set("staking", true).unwrap();
        assert!(store.get("staking"));
    }

    #[test]
    fn test_toggles_snapshot() {
        let mut store = MemorySettings::new();
        store.set("pool2", true).unwrap();
        store.set("unrelated", true).unwrap();

        let toggles = extra_tvl_toggles(&store);
        assert!(toggles.is_enabled("pool2"));
        assert!(!toggles.is_enabled("staking"));
        assert!(!toggles.is_enabled("unrelated"));
        assert_eq!(toggles.iter().count(), ExtraTvlKey::ALL.len());
    }

    #[test]
    fn test_file_settings_persist() {
        let path = std::env::temp_dir().join(format!("protocol_charts_settings_{}.json", uuid::Uuid::new_v4()));

        {
            let mut store = FileSettings::open(&path).unwrap();
            assert!(!store.get("borrowed"));
            store.set("borrowed", true).unwrap();
        }

        let reopened = FileSettings::open(&path).unwrap();
        assert!(reopened.get("borrowed"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("ON").unwrap());
        assert!(!parse_flag("off").unwrap());
        assert!(parse_flag("maybe").is_err());
    }
}
