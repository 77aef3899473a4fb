use std::path::PathBuf;

use crate::models::Theme;
use crate::utils::errors::ChartError;

const DEFAULT_WIDTH: u32 = 1024;
const DEFAULT_HEIGHT: u32 = 768;
const DEFAULT_SETTINGS_PATH: &str = "defi-settings.json";

/// Runtime settings read from the environment (after `.env` is loaded)
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub theme: Theme,
    pub width: u32,
    pub height: u32,
    pub settings_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            theme: Theme::Light,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            settings_path: PathBuf::from(DEFAULT_SETTINGS_PATH),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ChartError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ChartError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        if let Some(theme) = var("CHART_THEME") {
            config.theme = theme
                .parse()
                .map_err(|e: String| ChartError::Config(format!("CHART_THEME: {}", e)))?;
        }
        if let Some(width) = var("CHART_WIDTH") {
            config.width = parse_dimension("CHART_WIDTH", &width)?;
        }
        if let Some(height) = var("CHART_HEIGHT") {
            config.height = parse_dimension("CHART_HEIGHT", &height)?;
        }
        if let Some(path) = var("DEFI_SETTINGS_PATH") {
            config.settings_path = PathBuf::from(path);
        }

        Ok(config)
    }
}

fn parse_dimension(key: &str, value: &str) -> Result<u32, ChartError> {
    match value.trim().parse::<u32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(ChartError::Config(format!(
            "{} must be a positive integer, got '{}'",
            key, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.width, 1024);
        assert_eq!(config.settings_path, PathBuf::from("defi-settings.json"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("CHART_THEME", "Dark"),
            ("CHART_WIDTH", "640"),
            ("CHART_HEIGHT", " "),
            ("DEFI_SETTINGS_PATH", "/tmp/toggles.json"),
        ]))
        .unwrap();
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 768);
        assert_eq!(config.settings_path, PathBuf::from("/tmp/toggles.json"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("CHART_WIDTH", "0")])),
            Err(ChartError::Config(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("CHART_THEME", "neon")])),
            Err(ChartError::Config(_))
        ));
    }
}
