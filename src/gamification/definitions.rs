//! Achievement definitions and metadata
//!
//! An achievement is pure data: display metadata, a rarity that fixes its XP
//! reward, and a [`Requirement`] evaluated against a stats snapshot.

use serde::{Deserialize, Serialize};

/// Rarity tier, ordered from most to least common
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// XP granted when an achievement of this rarity unlocks
    pub fn xp_reward(&self) -> u64 {
        match self {
            Self::Common => 10,
            Self::Uncommon => 25,
            Self::Rare => 50,
            Self::Epic => 100,
            Self::Legendary => 250,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
        }
    }
}

/// Achievement category for grouping in UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Learning,
    Mastery,
    Dedication,
    Projects,
    Practice,
    Progression,
    Community,
}

impl AchievementCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Learning => "Learning",
            Self::Mastery => "Mastery",
            Self::Dedication => "Dedication",
            Self::Projects => "Projects",
            Self::Practice => "Practice",
            Self::Progression => "Progression",
            Self::Community => "Community",
        }
    }
}

/// Unlock condition of an achievement.
///
/// Each kind carries only the qualifiers it needs. Catalogues may name kinds
/// this build does not know yet; those parse as [`Requirement::Unknown`] and
/// are never met.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Requirement {
    CompleteLessons {
        target: u64,
    },
    PerfectScores {
        target: u64,
    },
    /// Total minutes spent learning
    TimeSpent {
        target: u64,
    },
    CompleteProjects {
        target: u64,
    },
    Streak {
        target: u64,
        /// Only the running streak counts, not the best one ever reached
        #[serde(default)]
        consecutive_only: bool,
    },
    /// Average skill level (0-100), or one skill's level when `skill` is set
    SkillMastery {
        target: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        skill: Option<String>,
    },
    CodeLines {
        target: u64,
    },
    ErrorFreeSessions {
        target: u64,
    },
    Experience {
        target: u64,
    },
    Level {
        target: u64,
    },
    /// Number of concepts scored at or above `min_score`
    HighScores {
        target: u64,
        min_score: u8,
    },
    /// Community help; no signal feeds this yet
    HelpOthers {
        target: u64,
    },
    #[serde(other)]
    Unknown,
}

impl Requirement {
    /// Numeric goal of the requirement (0 for unknown kinds)
    pub fn target(&self) -> f64 {
        match self {
            Self::CompleteLessons { target }
            | Self::PerfectScores { target }
            | Self::TimeSpent { target }
            | Self::CompleteProjects { target }
            | Self::Streak { target, .. }
            | Self::CodeLines { target }
            | Self::ErrorFreeSessions { target }
            | Self::Experience { target }
            | Self::Level { target }
            | Self::HighScores { target, .. }
            | Self::HelpOthers { target } => *target as f64,
            Self::SkillMastery { target, .. } => *target,
            Self::Unknown => 0.0,
        }
    }
}

/// Achievement definition with all metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub rarity: Rarity,
    pub category: AchievementCategory,
    pub requirement: Requirement,
}

impl AchievementDefinition {
    pub fn xp_reward(&self) -> u64 {
        self.rarity.xp_reward()
    }
}
