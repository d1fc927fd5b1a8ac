//! Shared test utilities for learner session tests

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use learnquest::gamification::{
    AchievementCategory, AchievementDefinition, BadgeEngine, Catalogue, Rarity, Requirement,
};
use learnquest::progress::{ConceptUpdate, ProgressAction};
use learnquest::storage::{KeyValueStore, MemoryStore, StorageError};
use learnquest::LearnerSession;

pub const LEARNER: &str = "ada";
pub const KEY: &str = "progress:ada";

/// Calendar day in January 2024
pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).expect("valid test date")
}

/// Fixed timestamp on a January 2024 day
pub fn at(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, d, 18, 0, 0)
        .single()
        .expect("valid test timestamp")
}

pub fn badge(id: &str, rarity: Rarity, requirement: Requirement) -> AchievementDefinition {
    AchievementDefinition {
        id: id.to_string(),
        name: id.to_string(),
        description: format!("test badge {}", id),
        icon: String::new(),
        rarity,
        category: AchievementCategory::Learning,
        requirement,
    }
}

pub fn engine_with(badges: Vec<AchievementDefinition>) -> BadgeEngine {
    BadgeEngine::new(Catalogue::new(badges).expect("unique badge ids"))
}

/// Session for the test learner over an empty in-memory store
pub fn memory_session(engine: BadgeEngine) -> LearnerSession<MemoryStore> {
    LearnerSession::open(LEARNER, KEY, MemoryStore::new(), engine)
}

pub fn complete_concept(id: &str, minutes: Option<u64>, on: u32) -> ProgressAction {
    ProgressAction::UpdateConcept {
        concept_id: id.to_string(),
        update: ConceptUpdate {
            completed: Some(true),
            time_spent: minutes,
            ..Default::default()
        },
        at: at(on),
    }
}

pub fn concept_minutes(id: &str, minutes: u64, on: u32) -> ProgressAction {
    ProgressAction::UpdateConcept {
        concept_id: id.to_string(),
        update: ConceptUpdate {
            time_spent: Some(minutes),
            ..Default::default()
        },
        at: at(on),
    }
}

/// Store whose writes always fail
#[derive(Debug, Default)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("disk on fire".to_string()))
    }

    fn save(&mut self, _key: &str, _blob: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("disk on fire".to_string()))
    }
}
