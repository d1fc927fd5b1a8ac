//! Data models for learner progress
//!
//! These structures are persisted as one JSON blob per learner.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::gamification::{level_of, LearningStreak};

/// Progress on a single concept (lesson, quiz, reading)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConceptProgress {
    pub concept_id: String,
    pub completed: bool,
    /// Cumulative minutes
    pub time_spent: u64,
    pub last_accessed: Option<DateTime<Utc>>,
    /// 0-100, None until scored
    pub score: Option<u8>,
    pub completed_exercises: BTreeSet<String>,
    pub notes_count: u32,
}

impl ConceptProgress {
    pub fn new(concept_id: &str) -> Self {
        Self {
            concept_id: concept_id.to_string(),
            ..Default::default()
        }
    }
}

/// Project difficulty tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Flat XP bonus for completing a project of this tier
    pub fn completion_bonus(&self) -> u64 {
        match self {
            Self::Beginner => 100,
            Self::Intermediate => 200,
            Self::Advanced => 300,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// Progress on a hands-on project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectProgress {
    pub project_id: String,
    pub started: bool,
    pub completed: bool,
    pub difficulty: Difficulty,
    /// Cumulative minutes
    pub time_spent: u64,
    pub last_accessed: Option<DateTime<Utc>>,
    pub score: Option<u8>,
    /// Completed step ids in the order they were finished
    pub completed_steps: Vec<String>,
    pub notes_count: u32,
}

impl ProjectProgress {
    pub fn new(project_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            ..Default::default()
        }
    }
}

/// An unlocked achievement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementRecord {
    pub id: String,
    pub unlocked_at: DateTime<Utc>,
}

/// Learner preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub daily_goal_minutes: u32,
    pub notifications_enabled: bool,
    pub tracking_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            daily_goal_minutes: 30,
            notifications_enabled: true,
            tracking_enabled: true,
        }
    }
}

/// Hands-on practice counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeStats {
    pub lines_of_code: u64,
    pub error_free_sessions: u64,
    /// Skill id -> level (0-100)
    pub skills: BTreeMap<String, f64>,
}

/// Everything the engine knows about one learner.
///
/// `experience` and `level` are only ever written by the reducer, so the
/// level always matches [`level_of`] of the experience. The core fields are
/// required when deserializing so arbitrary JSON is not taken for an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    pub concepts: BTreeMap<String, ConceptProgress>,
    pub projects: BTreeMap<String, ProjectProgress>,
    pub achievements: Vec<AchievementRecord>,
    pub streak: LearningStreak,
    /// Total minutes spent learning
    pub total_time_spent: u64,
    pub(super) level: u32,
    pub(super) experience: u64,
    pub last_session: Option<DateTime<Utc>>,
    pub preferences: Preferences,
    /// Minutes logged per calendar day
    #[serde(default)]
    pub daily_minutes: BTreeMap<NaiveDate, u64>,
    #[serde(default)]
    pub practice: PracticeStats,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            concepts: BTreeMap::new(),
            projects: BTreeMap::new(),
            achievements: Vec::new(),
            streak: LearningStreak::default(),
            total_time_spent: 0,
            level: level_of(0),
            experience: 0,
            last_session: None,
            preferences: Preferences::default(),
            daily_minutes: BTreeMap::new(),
            practice: PracticeStats::default(),
        }
    }
}

impl ProgressState {
    /// Default state with the given preferences
    pub fn with_preferences(preferences: Preferences) -> Self {
        Self {
            preferences,
            ..Default::default()
        }
    }

    pub fn experience(&self) -> u64 {
        self.experience
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a.id == id)
    }
}
