use crate::app_dirs::AppDirs;
use crate::error::{DrillError, Result};
use crate::keymap::{KeyMapSources, MapStyle};
use crate::tracker::DEFAULT_REPETITIONS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_ALPHABET_CSV: &str = "~/.talon/user/knausj_talon/settings/alphabet.csv";
pub const DEFAULT_KEYS_FILE: &str = "~/.talon/user/knausj_talon/core/keys/keys.py";
/// Longest combo a trial will ask for
pub const MAX_COMBO: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub combo: usize,
    pub capital_percentage: u8,
    pub alphabetical: bool,
    pub symbols: bool,
    pub style: MapStyle,
    pub alphabet_csv: PathBuf,
    pub keys_file: PathBuf,
    pub repetitions: u32,
    /// Chance that a trial replays a failed combo instead of a fresh one
    pub retry_chance: f64,
    pub retry_low: f64,
    pub retry_high: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            combo: 3,
            capital_percentage: 0,
            alphabetical: false,
            symbols: false,
            style: MapStyle::Talon,
            alphabet_csv: PathBuf::from(DEFAULT_ALPHABET_CSV),
            keys_file: PathBuf::from(DEFAULT_KEYS_FILE),
            repetitions: DEFAULT_REPETITIONS,
            retry_chance: 0.5,
            retry_low: 0.5,
            retry_high: 0.1,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_COMBO).contains(&self.combo) {
            return Err(DrillError::InvalidSetting(format!(
                "combo length must be within 1..={MAX_COMBO}, got {}",
                self.combo
            )));
        }
        if self.capital_percentage > 100 {
            return Err(DrillError::InvalidSetting(format!(
                "capital percentage {} is above 100",
                self.capital_percentage
            )));
        }
        if self.repetitions == 0 {
            return Err(DrillError::InvalidSetting(
                "repetitions must be a positive integer".to_string(),
            ));
        }
        for (name, p) in [
            ("retry_chance", self.retry_chance),
            ("retry_low", self.retry_low),
            ("retry_high", self.retry_high),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(DrillError::InvalidSetting(format!(
                    "{name} must be within [0, 1], got {p}"
                )));
            }
        }
        Ok(())
    }

    pub fn key_map_sources(&self) -> KeyMapSources {
        KeyMapSources {
            style: self.style,
            alphabet_csv: self.alphabet_csv.clone(),
            keys_file: self.keys_file.clone(),
            symbols: self.symbols,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// Missing or unreadable files give the defaults
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring malformed config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            combo: 5,
            capital_percentage: 20,
            alphabetical: true,
            symbols: true,
            style: MapStyle::Dragonfly,
            alphabet_csv: PathBuf::from("/tmp/alphabet.csv"),
            keys_file: PathBuf::from("/tmp/keys.py"),
            repetitions: 4,
            retry_chance: 0.25,
            retry_low: 0.4,
            retry_high: 0.05,
        };
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"combo": 2, "style": "dragonfly"}"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.combo, 2);
        assert_eq!(cfg.style, MapStyle::Dragonfly);
        assert_eq!(cfg.repetitions, 3);
    }

    #[test]
    fn malformed_or_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());

        fs::write(&path, "not json").unwrap();
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        assert!(Config::default().validate().is_ok());

        let cfg = Config {
            combo: 0,
            ..Config::default()
        };
        assert_matches!(cfg.validate(), Err(DrillError::InvalidSetting(_)));

        for combo in [MAX_COMBO + 1, usize::MAX] {
            let cfg = Config {
                combo,
                ..Config::default()
            };
            assert_matches!(cfg.validate(), Err(DrillError::InvalidSetting(_)));
        }
        let cfg = Config {
            combo: MAX_COMBO,
            ..Config::default()
        };
        assert!(cfg.validate().is_ok());

        let cfg = Config {
            capital_percentage: 101,
            ..Config::default()
        };
        assert_matches!(cfg.validate(), Err(DrillError::InvalidSetting(_)));

        let cfg = Config {
            repetitions: 0,
            ..Config::default()
        };
        assert_matches!(cfg.validate(), Err(DrillError::InvalidSetting(_)));

        let cfg = Config {
            retry_high: 1.5,
            ..Config::default()
        };
        assert_matches!(cfg.validate(), Err(DrillError::InvalidSetting(_)));
    }
}
