//! CLI command implementations

pub mod badges;
pub mod init;
pub mod progress;
pub mod transfer;

use std::path::Path;

use anyhow::{Context, Result};

use learnquest::config::Config;
use learnquest::gamification::{BadgeEngine, Level};
use learnquest::storage::SqliteStore;
use learnquest::LearnerSession;

pub type Session = LearnerSession<SqliteStore>;

/// Open the learner's session against the configured database
pub fn open_session(
    config: &Config,
    config_path: &Path,
    learner: Option<String>,
) -> Result<Session> {
    let learner_id = learner.unwrap_or_else(|| config.learner.id.clone());
    let config_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let catalogue = config.load_catalogue(config_dir)?;

    let db_path = config.database_path();
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("Failed to open progress database: {}", db_path.display()))?;

    let mut session = LearnerSession::open_with_preferences(
        &learner_id,
        &config.storage_key(&learner_id),
        store,
        BadgeEngine::new(catalogue.clone()),
        config.preferences.clone(),
    );

    if session.state().preferences.notifications_enabled {
        session.subscribe(move |event| {
            let name = catalogue
                .get(&event.achievement_id)
                .map(|a| format!("{} {}", a.icon, a.name))
                .unwrap_or_else(|| event.achievement_id.clone());
            println!(
                "🏆 Achievement unlocked: {} [{}] (+{} XP)",
                name,
                event.rarity.label(),
                event.xp_gained
            );
        });
    }

    Ok(session)
}

/// Print a level-up line if the transition crossed a threshold
pub fn report_level_change(before: u32, session: &Session) {
    let after = session.state().level();
    if after > before {
        let title = Level::for_xp(session.state().experience()).title;
        println!("⬆️  Level up! {} → {} ({})", before, after, title);
    }
}
