//! Init command implementation

use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

use learnquest::config::Config;

/// Default configuration content for `learnquest init`
pub const DEFAULT_CONFIG: &str = r#"# Learnquest Configuration
# ========================

# ============================================================================
# LEARNER - Whose progress this installation tracks
# ============================================================================
#
# Use `learnquest --learner <id> ...` to act as someone else for one command.

[learner]
id = "{learner_id}"

# ============================================================================
# STORAGE - Where progress is persisted
# ============================================================================
#
# Available options:
#   path        - SQLite database file (default: ~/.learnquest/progress.db)
#   key_prefix  - Prefix of the per-learner storage key (default: "progress")

[storage]
key_prefix = "progress"

# ============================================================================
# PREFERENCES - Starting preferences for a learner without saved progress
# ============================================================================
#
# Change them later with `learnquest prefs`.

[preferences]
daily_goal_minutes = 30
notifications_enabled = true
tracking_enabled = true

# ============================================================================
# CATALOGUE - Achievements
# ============================================================================
#
# Leave `path` unset to use the built-in achievements. A custom catalogue is a
# TOML file of [[achievement]] tables; relative paths resolve against the
# directory holding this config.
#
#   [[achievement]]
#   id = "first_steps"
#   name = "First Steps"
#   description = "Complete your first lesson"
#   rarity = "common"          # common, uncommon, rare, epic, legendary
#   category = "learning"
#   requirement = { kind = "complete_lessons", target = 1 }

[catalogue]

# ============================================================================
# LOGGING
# ============================================================================
#
# RUST_LOG overrides this; --verbose forces "debug".

[logging]
level = "info"
"#;

/// Render the default config for a learner
pub fn render_default_config(learner_id: &str) -> String {
    DEFAULT_CONFIG.replace("{learner_id}", learner_id)
}

pub fn init_command(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let learner_id = Config::with_defaults().learner.id;
    std::fs::write(config_path, render_default_config(&learner_id))
        .with_context(|| format!("Failed to write config: {}", config_path.display()))?;

    info!("Generated learner id {}", learner_id);
    println!("Created: {}", config_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let content = render_default_config("ada");
        let config: Config = toml::from_str(&content).unwrap();

        assert_eq!(config.learner.id, "ada");
        assert_eq!(config.storage.key_prefix, "progress");
        assert_eq!(config.preferences.daily_goal_minutes, 30);
        assert!(config.catalogue.path.is_none());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        init_command(&path, false).unwrap();
        assert!(init_command(&path, false).is_err());
        assert!(init_command(&path, true).is_ok());
        assert!(Config::from_file(&path).is_ok());
    }
}
