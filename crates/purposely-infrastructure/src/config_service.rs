//! Configuration service implementation.
//!
//! Loads the engine configuration from the config file
//! (~/.config/purposely/config.toml) and caches it. A missing or
//! unreadable file degrades to defaults; configuration is never a reason
//! the engine fails to start.

use crate::paths::config_file_path;
use purposely_core::config::EngineConfig;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::warn;

/// Lazily loaded, cached engine configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Cached configuration loaded from file.
    /// Uses RwLock for thread-safe lazy loading.
    config: Arc<RwLock<Option<EngineConfig>>>,
    path: Option<PathBuf>,
}

impl ConfigService {
    /// Creates a service reading the default config file location.
    ///
    /// The configuration is loaded lazily on first access to avoid
    /// blocking during initialization.
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(None)),
            path: config_file_path().ok(),
        }
    }

    /// Creates a service reading an explicit path (tests, overrides).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config: Arc::new(RwLock::new(None)),
            path: Some(path),
        }
    }

    /// Gets the engine configuration, loading from file if not cached.
    pub fn get_config(&self) -> EngineConfig {
        {
            let read_lock = self.config.read().unwrap();
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = self.load_config();

        {
            let mut write_lock = self.config.write().unwrap();
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap();
        *write_lock = None;
    }

    fn load_config(&self) -> EngineConfig {
        let Some(path) = &self.path else {
            return EngineConfig::default();
        };
        if !path.exists() {
            return EngineConfig::default();
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                warn!(?path, %err, "failed to read config file, using defaults");
                return EngineConfig::default();
            }
        };

        match toml::from_str(&content) {
            Ok(config) => config,
            Err(err) => {
                warn!(?path, %err, "failed to parse config file, using defaults");
                EngineConfig::default()
            }
        }
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(dir.path().join("nope.toml"));
        let config = service.get_config();
        assert_eq!(config.timeout_ms, 12_000);
    }

    #[test]
    fn test_file_values_override_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_ms = 3000\nmin_batch = 8\n").unwrap();

        let service = ConfigService::with_path(path);
        let config = service.get_config();
        assert_eq!(config.timeout_ms, 3000);
        assert_eq!(config.min_batch, 8);
        assert_eq!(config.qotd_batch, 14);
    }

    #[test]
    fn test_cache_and_invalidate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "min_batch = 7\n").unwrap();

        let service = ConfigService::with_path(path.clone());
        assert_eq!(service.get_config().min_batch, 7);

        fs::write(&path, "min_batch = 9\n").unwrap();
        // Cached until invalidated.
        assert_eq!(service.get_config().min_batch, 7);
        service.invalidate_cache();
        assert_eq!(service.get_config().min_batch, 9);
    }

    #[test]
    fn test_malformed_file_degrades_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_ms = \"not a number").unwrap();

        let service = ConfigService::with_path(path);
        assert_eq!(service.get_config().timeout_ms, 12_000);
    }
}
