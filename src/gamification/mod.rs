//! Gamification system: Achievements, XP, Levels and Streaks
//!
//! Pure leveling and streak math plus the badge engine that turns a stats
//! snapshot into unlock events.

mod catalogue;
mod checker;
mod definitions;
mod levels;
mod manager;
mod stats;
mod streaks;

pub use catalogue::{Catalogue, CatalogueError};
pub use checker::{is_met, measure};
pub use definitions::{AchievementCategory, AchievementDefinition, Rarity, Requirement};
pub use levels::{level_of, Level, LevelProgress, XpRewards, LEVELS};
pub use manager::{BadgeEngine, BadgeProgress, EngineError, ListenerId, UnlockEvent};
pub use stats::StatsSnapshot;
pub use streaks::{advance_streak, local_today, LearningStreak};
