use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::core::tracker::SyncPolicy;
use crate::core::utils::{config_file_in, ensure_dir};
use crate::errors::{Result, TrackerError};
use crate::storage::json_backend::DEFAULT_RETENTION;

const TMP_SUFFIX: &str = "tmp";

/// Keys accepted by [`Config::set`], in display order.
pub const CONFIG_KEYS: [&str; 5] = [
    "owner",
    "currency_symbol",
    "sync_policy",
    "backup_retention",
    "recent_limit",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// User id that scopes every persisted record.
    pub owner: String,
    pub currency_symbol: String,
    pub sync_policy: SyncPolicy,
    pub backup_retention: usize,
    /// Rows shown by `expense recent`.
    pub recent_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner: "local".into(),
            currency_symbol: "$".into(),
            sync_policy: SyncPolicy::default(),
            backup_retention: DEFAULT_RETENTION,
            recent_limit: 5,
        }
    }
}

impl Config {
    /// Updates one field from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "owner" => {
                if value.is_empty() {
                    return Err(TrackerError::Config("owner must not be empty".into()));
                }
                self.owner = value.to_string();
            }
            "currency_symbol" | "currency" => self.currency_symbol = value.to_string(),
            "sync_policy" | "policy" => {
                self.sync_policy = value.parse().map_err(TrackerError::Config)?;
            }
            "backup_retention" => self.backup_retention = parse_count(key, value)?,
            "recent_limit" => self.recent_limit = parse_count(key, value)?,
            other => {
                return Err(TrackerError::Config(format!(
                    "unknown config key `{}` (expected one of: {})",
                    other,
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// `(key, value)` pairs for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("owner", self.owner.clone()),
            ("currency_symbol", self.currency_symbol.clone()),
            ("sync_policy", self.sync_policy.to_string()),
            ("backup_retention", self.backup_retention.to_string()),
            ("recent_limit", self.recent_limit.to_string()),
        ]
    }
}

fn parse_count(key: &str, value: &str) -> Result<usize> {
    match value.parse::<usize>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(TrackerError::Config(format!(
            "{} must be a positive whole number",
            key
        ))),
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        let path = config_file_in(&base);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        Ok(Self { path })
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn save_and_reload() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.set("owner", "alex").unwrap();
        config.set("sync_policy", "optimistic").unwrap();
        config.set("currency_symbol", "€").unwrap();
        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded.owner, "alex");
        assert_eq!(loaded.sync_policy, SyncPolicy::Optimistic);
        assert_eq!(loaded.currency_symbol, "€");
        assert!(manager.path().ends_with("config/config.json"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{ "owner": "sam" }"#).unwrap();
        let loaded = manager.load().unwrap();
        assert_eq!(loaded.owner, "sam");
        assert_eq!(loaded.recent_limit, 5);
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("recent_limit", "0").is_err());
        assert!(config.set("sync_policy", "later").is_err());
        assert!(config.set("colour", "blue").is_err());
        assert!(config.set("owner", " ").is_err());
    }
}
