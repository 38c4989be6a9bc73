use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::range::DateRangeToken;

/// Keys accepted by [`Config::get`] and [`Config::set`].
pub const KEYS: [&str; 3] = ["upcoming_limit", "default_range", "rate_tolerance"];

/// User configuration, stored as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How many upcoming follow-ups the dashboard lists.
    pub upcoming_limit: usize,
    /// Range used by `export` and `range` when none is given.
    pub default_range: DateRangeToken,
    /// Allowed gap, in percentage points, between a supplied conversion
    /// rate and the one implied by the counters.
    pub rate_tolerance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upcoming_limit: 5,
            default_range: DateRangeToken::ThisMonth,
            rate_tolerance: 1.0,
        }
    }
}

impl Config {
    /// Default location: `~/.leadmetrics/config.json`.
    pub fn default_path() -> Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| Error::Config("cannot determine home directory".into()))?
            .join(".leadmetrics")
            .join("config.json"))
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load`], but an unreadable or invalid file falls back to
    /// the defaults with a warning, so the file can be rewritten.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Ignoring config at {}: {e}", path.display());
            Self::default()
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "upcoming_limit" => Ok(self.upcoming_limit.to_string()),
            "default_range" => Ok(self.default_range.to_string()),
            "rate_tolerance" => Ok(self.rate_tolerance.to_string()),
            other => Err(unknown_key(other)),
        }
    }

    /// Set one key from its string form. On error the config is unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        let mut next = self.clone();
        match key {
            "upcoming_limit" => {
                next.upcoming_limit = value.parse().map_err(|_| {
                    Error::Config(format!(
                        "upcoming_limit must be a whole number, got '{value}'"
                    ))
                })?;
            }
            "default_range" => {
                next.default_range = DateRangeToken::parse(value)
                    .map_err(|e| Error::Config(e.to_string()))?;
            }
            "rate_tolerance" => {
                next.rate_tolerance = value.parse().map_err(|_| {
                    Error::Config(format!("rate_tolerance must be a number, got '{value}'"))
                })?;
            }
            other => return Err(unknown_key(other)),
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub fn list(&self) -> Vec<(String, String)> {
        KEYS.iter()
            .filter_map(|k| self.get(k).ok().map(|v| (k.to_string(), v)))
            .collect()
    }

    fn validate(&self) -> Result<()> {
        if !self.rate_tolerance.is_finite() || self.rate_tolerance < 0.0 {
            return Err(Error::Config(format!(
                "rate_tolerance must be a non-negative number, got {}",
                self.rate_tolerance
            )));
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> Error {
    Error::Config(format!(
        "unknown config key '{key}' (expected one of: {})",
        KEYS.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = Config::default();
        assert_eq!(c.upcoming_limit, 5);
        assert_eq!(c.default_range, DateRangeToken::ThisMonth);
        assert_eq!(c.rate_tolerance, 1.0);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let c = Config::load(dir.path().join("nope.json")).unwrap();
        assert_eq!(c, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut c = Config::default();
        c.set("upcoming_limit", "8").unwrap();
        c.set("default_range", "last_7_days").unwrap();
        c.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.upcoming_limit, 8);
        assert_eq!(loaded.default_range, DateRangeToken::Last7Days);
        assert_eq!(loaded.rate_tolerance, 1.0);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "upcoming_limit": 3 }"#).unwrap();
        let c = Config::load(&path).unwrap();
        assert_eq!(c.upcoming_limit, 3);
        assert_eq!(c.default_range, DateRangeToken::ThisMonth);
    }

    #[test]
    fn test_load_rejects_bad_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "default_range": "next_year" }"#).unwrap();
        assert!(matches!(Config::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_corrupt_file_can_be_repaired() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::Config(_))));

        let mut c = Config::load_or_default(&path);
        assert_eq!(c, Config::default());
        c.set("upcoming_limit", "3").unwrap();
        c.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap().upcoming_limit, 3);
    }

    #[test]
    fn test_get_set() {
        let mut c = Config::default();
        assert_eq!(c.get("default_range").unwrap(), "this_month");
        c.set("rate_tolerance", "2.5").unwrap();
        assert_eq!(c.get("rate_tolerance").unwrap(), "2.5");
        assert!(c.set("rate_tolerance", "-1").is_err());
        assert_eq!(c.rate_tolerance, 2.5);
        assert!(c.set("upcoming_limit", "many").is_err());
        assert!(c.set("default_range", "someday").is_err());
        assert!(c.set("colour", "blue").is_err());
        assert!(c.get("colour").is_err());
    }

    #[test]
    fn test_list() {
        let keys: Vec<String> = Config::default().list().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, KEYS.to_vec());
    }
}
