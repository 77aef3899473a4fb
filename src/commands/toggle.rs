use protocol_charts::config::Config;
use protocol_charts::models::ExtraTvlKey;
use protocol_charts::services::settings_service::{self, FileSettings, SettingsStore};
use protocol_charts::utils::{ChartError, Table};
use tracing::info;

/// `toggle [<key> [on|off]]`
pub fn execute(args: &[&str], config: &Config) -> Result<(), String> {
    let mut settings = FileSettings::open(&config.settings_path).map_err(|e| e.to_string())?;

    match args {
        [] => {
            println!("{}", list_toggles(&settings));
            Ok(())
        }
        [key] | [key, _] => {
            let value = args.get(1).copied();
            let enabled = apply_toggle(&mut settings, key, value).map_err(|e| e.to_string())?;
            info!("⚙️ {} is now {}", key, if enabled { "on" } else { "off" });
            println!("{} {}", key, if enabled { "on" } else { "off" });
            Ok(())
        }
        _ => Err("Usage: toggle [<key> [on|off]]".to_string()),
    }
}

/// Set `key` to `value`, or flip it when no value is given; returns the new state
pub fn apply_toggle(store: &mut dyn SettingsStore, key: &str, value: Option<&str>) -> Result<bool, ChartError> {
    let key = ExtraTvlKey::from_key(&key.to_lowercase()).ok_or_else(|| {
        let known: Vec<&str> = ExtraTvlKey::ALL.iter().map(|k| k.key()).collect();
        ChartError::InvalidInput(format!("unknown toggle '{}', expected one of {}", key, known.join(", ")))
    })?;

    let enabled = match value {
        Some(v) => settings_service::parse_flag(v)?,
        None => !store.get(key.key()),
    };
    store.set(key.key(), enabled)?;
    Ok(enabled)
}

fn list_toggles(store: &dyn SettingsStore) -> String {
    let mut table = Table::new(vec!["Key", "State", "Description"]);
    for key in ExtraTvlKey::ALL.iter() {
        table.add_row(vec![
            key.key().to_string(),
            if store.get(key.key()) { "on" } else { "off" }.to_string(),
            key.help().to_string(),
        ]);
    }
    table.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocol_charts::services::settings_service::MemorySettings;

    #[test]
    fn test_apply_toggle() {
        let mut store = MemorySettings::new();

        assert!(apply_toggle(&mut store, "Staking", None).unwrap());
        assert!(store.get("staking"));
        assert!(!apply_toggle(&mut store, "staking", None).unwrap());
        assert!(apply_toggle(&mut store, "pool2", Some("on")).unwrap());
        assert!(store.get("pool2"));
    }

    #[test]
    fn test_apply_toggle_rejects_unknown() {
        let mut store = MemorySettings::new();
        assert!(apply_toggle(&mut store, "masterchef", None).is_err());
        assert!(apply_toggle(&mut store, "staking", Some("maybe")).is_err());
        assert!(!store.get("staking"));
    }

    #[test]
    fn test_list_toggles() {
        let mut store = MemorySettings::new();
        store.set("borrowed", true).unwrap();
        let listing = list_toggles(&store);
        assert!(listing.lines().any(|l| l.starts_with("borrowed") && l.contains("on")));
        assert_eq!(listing.lines().count(), ExtraTvlKey::ALL.len() + 2);
    }
}
