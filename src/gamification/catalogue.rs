//! Achievement catalogue
//!
//! The catalogue is plain data handed to the engine. The built-in set covers
//! the learning platform; a custom set can be loaded from TOML:
//!
//! ```toml
//! [[achievement]]
//! id = "first_steps"
//! name = "First Steps"
//! description = "Complete your first lesson"
//! icon = "🎯"
//! rarity = "common"
//! category = "learning"
//! requirement = { kind = "complete_lessons", target = 1 }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::definitions::{AchievementCategory, AchievementDefinition, Rarity, Requirement};

/// Error type for catalogue loading
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    #[error("Failed to read catalogue: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalogue format: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Duplicate achievement id: {0}")]
    DuplicateId(String),
}

/// Ordered set of achievement definitions with unique ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCatalogue")]
pub struct Catalogue {
    #[serde(rename = "achievement")]
    achievements: Vec<AchievementDefinition>,
}

/// Catalogue file contents before the id check
#[derive(Deserialize)]
struct RawCatalogue {
    #[serde(rename = "achievement", default)]
    achievements: Vec<AchievementDefinition>,
}

impl TryFrom<RawCatalogue> for Catalogue {
    type Error = CatalogueError;

    fn try_from(raw: RawCatalogue) -> Result<Self, Self::Error> {
        Self::new(raw.achievements)
    }
}

impl Catalogue {
    /// Build a catalogue, rejecting duplicate ids. Order is kept as given.
    pub fn new(achievements: Vec<AchievementDefinition>) -> Result<Self, CatalogueError> {
        let mut seen = HashSet::new();
        for achievement in &achievements {
            if !seen.insert(achievement.id.as_str()) {
                return Err(CatalogueError::DuplicateId(achievement.id.clone()));
            }
        }
        Ok(Self { achievements })
    }

    /// Parse a catalogue from TOML content
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogueError> {
        let raw: RawCatalogue = toml::from_str(content)?;
        Self::new(raw.achievements)
    }

    /// Load a catalogue from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, CatalogueError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn get(&self, id: &str) -> Option<&AchievementDefinition> {
        self.achievements.iter().find(|a| a.id == id)
    }

    /// Definitions in catalogue order
    pub fn iter(&self) -> impl Iterator<Item = &AchievementDefinition> {
        self.achievements.iter()
    }

    pub fn len(&self) -> usize {
        self.achievements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.achievements.is_empty()
    }

    /// Total XP available from all achievements
    pub fn total_xp(&self) -> u64 {
        self.achievements.iter().map(|a| a.xp_reward()).sum()
    }

    /// The platform's default achievements
    pub fn builtin() -> Self {
        use AchievementCategory as C;
        use Rarity as R;

        Self {
            achievements: vec![
                // === LEARNING ===
                def(
                    "first_steps",
                    "First Steps",
                    "Complete your first lesson",
                    "🎯",
                    R::Common,
                    C::Learning,
                    Requirement::CompleteLessons { target: 1 },
                ),
                def(
                    "quick_learner",
                    "Quick Learner",
                    "Complete 5 lessons",
                    "📚",
                    R::Common,
                    C::Learning,
                    Requirement::CompleteLessons { target: 5 },
                ),
                def(
                    "knowledge_seeker",
                    "Knowledge Seeker",
                    "Complete 25 lessons",
                    "🧭",
                    R::Uncommon,
                    C::Learning,
                    Requirement::CompleteLessons { target: 25 },
                ),
                def(
                    "scholar",
                    "Scholar",
                    "Complete 100 lessons",
                    "🎓",
                    R::Epic,
                    C::Learning,
                    Requirement::CompleteLessons { target: 100 },
                ),
                // === MASTERY ===
                def(
                    "perfectionist",
                    "Perfectionist",
                    "Score 100 on a quiz",
                    "💯",
                    R::Uncommon,
                    C::Mastery,
                    Requirement::PerfectScores { target: 1 },
                ),
                def(
                    "flawless_ten",
                    "Flawless Ten",
                    "Score 100 on 10 quizzes",
                    "💎",
                    R::Rare,
                    C::Mastery,
                    Requirement::PerfectScores { target: 10 },
                ),
                def(
                    "high_achiever",
                    "High Achiever",
                    "Score 90 or more on 5 quizzes",
                    "🏅",
                    R::Uncommon,
                    C::Mastery,
                    Requirement::HighScores { target: 5, min_score: 90 },
                ),
                def(
                    "skill_adept",
                    "Skill Adept",
                    "Reach an average skill level of 50",
                    "🧠",
                    R::Rare,
                    C::Mastery,
                    Requirement::SkillMastery { target: 50.0, skill: None },
                ),
                def(
                    "skill_master",
                    "Skill Master",
                    "Reach an average skill level of 90",
                    "🧙",
                    R::Legendary,
                    C::Mastery,
                    Requirement::SkillMastery { target: 90.0, skill: None },
                ),
                // === DEDICATION ===
                def(
                    "on_fire",
                    "On Fire",
                    "Learn 3 days in a row",
                    "🔥",
                    R::Common,
                    C::Dedication,
                    Requirement::Streak { target: 3, consecutive_only: true },
                ),
                def(
                    "week_warrior",
                    "Week Warrior",
                    "Learn 7 days in a row",
                    "📅",
                    R::Uncommon,
                    C::Dedication,
                    Requirement::Streak { target: 7, consecutive_only: true },
                ),
                def(
                    "monthly_master",
                    "Monthly Master",
                    "Reach a 30-day streak",
                    "👑",
                    R::Epic,
                    C::Dedication,
                    Requirement::Streak { target: 30, consecutive_only: false },
                ),
                def(
                    "time_investor",
                    "Time Investor",
                    "Spend 10 hours learning",
                    "⏳",
                    R::Uncommon,
                    C::Dedication,
                    Requirement::TimeSpent { target: 600 },
                ),
                def(
                    "marathoner",
                    "Marathoner",
                    "Spend 50 hours learning",
                    "🏃",
                    R::Rare,
                    C::Dedication,
                    Requirement::TimeSpent { target: 3000 },
                ),
                // === PROJECTS ===
                def(
                    "builder",
                    "Builder",
                    "Complete your first project",
                    "🔨",
                    R::Uncommon,
                    C::Projects,
                    Requirement::CompleteProjects { target: 1 },
                ),
                def(
                    "architect",
                    "Architect",
                    "Complete 5 projects",
                    "🏗️",
                    R::Epic,
                    C::Projects,
                    Requirement::CompleteProjects { target: 5 },
                ),
                // === PRACTICE ===
                def(
                    "hello_world",
                    "Hello, World",
                    "Write 100 lines of practice code",
                    "⌨️",
                    R::Common,
                    C::Practice,
                    Requirement::CodeLines { target: 100 },
                ),
                def(
                    "code_crafter",
                    "Code Crafter",
                    "Write 5,000 lines of practice code",
                    "🛠️",
                    R::Rare,
                    C::Practice,
                    Requirement::CodeLines { target: 5000 },
                ),
                def(
                    "clean_compile",
                    "Clean Compile",
                    "Finish 10 sessions without errors",
                    "✨",
                    R::Uncommon,
                    C::Practice,
                    Requirement::ErrorFreeSessions { target: 10 },
                ),
                // === PROGRESSION ===
                def(
                    "rising_star",
                    "Rising Star",
                    "Earn 500 XP",
                    "⭐",
                    R::Common,
                    C::Progression,
                    Requirement::Experience { target: 500 },
                ),
                def(
                    "level_five",
                    "High Five",
                    "Reach level 5",
                    "🖐️",
                    R::Uncommon,
                    C::Progression,
                    Requirement::Level { target: 5 },
                ),
                def(
                    "level_ten",
                    "Double Digits",
                    "Reach level 10",
                    "🔟",
                    R::Rare,
                    C::Progression,
                    Requirement::Level { target: 10 },
                ),
                // === COMMUNITY ===
                def(
                    "helping_hand",
                    "Helping Hand",
                    "Help 5 other learners",
                    "🤝",
                    R::Rare,
                    C::Community,
                    Requirement::HelpOthers { target: 5 },
                ),
            ],
        }
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::builtin()
    }
}

fn def(
    id: &str,
    name: &str,
    description: &str,
    icon: &str,
    rarity: Rarity,
    category: AchievementCategory,
    requirement: Requirement,
) -> AchievementDefinition {
    AchievementDefinition {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        rarity,
        category,
        requirement,
    }
}
