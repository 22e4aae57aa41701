use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::domain::AppError;

/// Directory under the storage root where companion assets land.
pub const ASSET_DIR_NAME: &str = "AppInventor";

/// Configuration for the asset fetcher
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FetcherConfig {
    pub storage_root: PathBuf,
    /// Total HTTP attempts per request before the fatal alert.
    pub max_attempts: u32,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        let storage_root = std::env::var_os("EXTERNAL_STORAGE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/sdcard"));

        Self {
            storage_root,
            max_attempts: 3,
            connect_timeout_secs: Some(10),
            read_timeout_secs: Some(30),
        }
    }
}

impl FetcherConfig {
    pub fn with_storage_root(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
            ..Self::default()
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| AppError::InvalidInput(format!("config {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_attempts == 0 {
            return Err(AppError::InvalidInput(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn asset_dir(&self) -> PathBuf {
        self.storage_root.join(ASSET_DIR_NAME)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: FetcherConfig =
            serde_json::from_str(r#"{"storage_root": "/tmp/x", "read_timeout_secs": null}"#)
                .unwrap();
        assert_eq!(config.storage_root, PathBuf::from("/tmp/x"));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.connect_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.read_timeout(), None);
    }

    #[test]
    fn asset_dir_is_under_storage_root() {
        let config = FetcherConfig::with_storage_root("/storage/emulated/0");
        assert_eq!(
            config.asset_dir(),
            PathBuf::from("/storage/emulated/0/AppInventor")
        );
    }

    #[test]
    fn loads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fetcher.json");
        std::fs::write(&path, r#"{"max_attempts": 5}"#).unwrap();

        let config = FetcherConfig::from_json_file(&path).unwrap();
        assert_eq!(config.max_attempts, 5);

        std::fs::write(&path, r#"{"max_attempts": 0}"#).unwrap();
        assert!(matches!(
            FetcherConfig::from_json_file(&path),
            Err(AppError::InvalidInput(_))
        ));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            FetcherConfig::from_json_file(&path),
            Err(AppError::InvalidInput(_))
        ));
    }
}
