//! Configuration loading and management

mod io;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::gamification::Catalogue;
use crate::progress::Preferences;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Who is learning
    #[serde(default)]
    pub learner: LearnerSettings,

    /// Where progress is persisted
    #[serde(default)]
    pub storage: StorageSettings,

    /// Preferences given to a learner without saved progress
    #[serde(default)]
    pub preferences: Preferences,

    /// Achievement catalogue source
    #[serde(default)]
    pub catalogue: CatalogueSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerSettings {
    pub id: String,
}

impl Default for LearnerSettings {
    fn default() -> Self {
        Self {
            id: "default".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Database file (defaults to ~/.learnquest/progress.db)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Prefix of the per-learner storage key
    pub key_prefix: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: None,
            key_prefix: "progress".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogueSettings {
    /// Custom catalogue TOML; the built-in catalogue is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default tracing filter when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Create a config for a new installation with a fresh learner id
    pub fn with_defaults() -> Self {
        Self {
            learner: LearnerSettings {
                id: uuid::Uuid::new_v4().to_string(),
            },
            ..Self::default()
        }
    }

    /// Path of the progress database
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .path
            .clone()
            .unwrap_or_else(|| Self::global_config_dir().join("progress.db"))
    }

    /// Storage key holding a learner's progress
    pub fn storage_key(&self, learner_id: &str) -> String {
        format!("{}:{}", self.storage.key_prefix, learner_id)
    }

    /// Load the configured achievement catalogue.
    ///
    /// Relative catalogue paths resolve against `base_dir`.
    pub fn load_catalogue(&self, base_dir: &Path) -> Result<Catalogue> {
        let Some(path) = &self.catalogue.path else {
            return Ok(Catalogue::builtin());
        };

        let path = if path.is_relative() {
            base_dir.join(path)
        } else {
            path.clone()
        };

        Catalogue::from_file(&path)
            .with_context(|| format!("Failed to load catalogue: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str(
            r#"
            [learner]
            id = "ada"

            [preferences]
            daily_goal_minutes = 45
            "#,
        )
        .unwrap();

        assert_eq!(config.learner.id, "ada");
        assert_eq!(config.preferences.daily_goal_minutes, 45);
        assert!(config.preferences.tracking_enabled);
        assert_eq!(config.storage.key_prefix, "progress");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.storage_key("ada"), "progress:ada");
    }

    #[test]
    fn test_with_defaults_generates_learner_id() {
        let a = Config::with_defaults();
        let b = Config::with_defaults();
        assert_ne!(a.learner.id, b.learner.id);
        assert!(uuid::Uuid::parse_str(&a.learner.id).is_ok());
    }

    #[test]
    fn test_builtin_catalogue_when_unset() {
        let catalogue = Config::default().load_catalogue(Path::new(".")).unwrap();
        assert_eq!(catalogue, Catalogue::builtin());
    }

    #[test]
    fn test_missing_catalogue_file_is_reported() {
        let mut config = Config::default();
        config.catalogue.path = Some(PathBuf::from("missing.toml"));

        let err = config.load_catalogue(Path::new("/nowhere")).unwrap_err();
        assert!(err.to_string().contains("/nowhere/missing.toml"));
    }
}
