//! XP and Level system
//!
//! Defines level thresholds, titles, and the XP rewards granted by progress
//! transitions.

use serde::Serialize;

/// Level definition
#[derive(Debug, Clone)]
pub struct Level {
    pub level: u32,
    pub xp_required: u64,
    pub title: &'static str,
}

/// All level definitions (must be sorted by level, thresholds strictly ascending)
pub static LEVELS: &[Level] = &[
    Level {
        level: 1,
        xp_required: 0,
        title: "Curious Beginner",
    },
    Level {
        level: 2,
        xp_required: 100,
        title: "Curious Beginner",
    },
    Level {
        level: 3,
        xp_required: 250,
        title: "Apprentice",
    },
    Level {
        level: 4,
        xp_required: 500,
        title: "Apprentice",
    },
    Level {
        level: 5,
        xp_required: 1000,
        title: "Practitioner",
    },
    Level {
        level: 6,
        xp_required: 1750,
        title: "Practitioner",
    },
    Level {
        level: 7,
        xp_required: 2750,
        title: "Craftsperson",
    },
    Level {
        level: 8,
        xp_required: 4000,
        title: "Craftsperson",
    },
    Level {
        level: 9,
        xp_required: 5500,
        title: "Specialist",
    },
    Level {
        level: 10,
        xp_required: 7500,
        title: "Specialist",
    },
    Level {
        level: 11,
        xp_required: 10000,
        title: "Expert",
    },
    Level {
        level: 12,
        xp_required: 13000,
        title: "Expert",
    },
    Level {
        level: 13,
        xp_required: 16500,
        title: "Mentor",
    },
    Level {
        level: 14,
        xp_required: 20500,
        title: "Mentor",
    },
    Level {
        level: 15,
        xp_required: 25000,
        title: "Master",
    },
    Level {
        level: 16,
        xp_required: 30000,
        title: "Master",
    },
    Level {
        level: 17,
        xp_required: 36000,
        title: "Grandmaster",
    },
    Level {
        level: 18,
        xp_required: 43000,
        title: "Grandmaster",
    },
    Level {
        level: 19,
        xp_required: 51000,
        title: "Grandmaster",
    },
    Level {
        level: 20,
        xp_required: 60000,
        title: "Luminary",
    },
];

/// Level for a cumulative XP total.
///
/// Saturates at the last level; experience itself has no upper bound.
pub fn level_of(experience: u64) -> u32 {
    Level::for_xp(experience).level
}

impl Level {
    /// Calculate level and title for given XP
    pub fn for_xp(xp: u64) -> &'static Level {
        LEVELS
            .iter()
            .rev()
            .find(|l| xp >= l.xp_required)
            .unwrap_or(&LEVELS[0])
    }

    /// XP threshold of a level (None for unknown levels)
    pub fn xp_for(level: u32) -> Option<u64> {
        LEVELS.iter().find(|l| l.level == level).map(|l| l.xp_required)
    }

    /// Get XP needed for next level (None if max level)
    pub fn xp_for_next(current_level: u32) -> Option<u64> {
        Self::xp_for(current_level + 1)
    }

    /// Get max level
    pub fn max_level() -> u32 {
        LEVELS.last().map(|l| l.level).unwrap_or(1)
    }
}

/// Where a learner sits between two level thresholds
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LevelProgress {
    pub experience: u64,
    pub level: u32,
    pub title: String,
    /// XP threshold of the current level
    pub current_level_xp: u64,
    /// XP threshold of the next level (None if max)
    pub next_level_xp: Option<u64>,
}

impl LevelProgress {
    pub fn new(experience: u64) -> Self {
        let level_info = Level::for_xp(experience);

        Self {
            experience,
            level: level_info.level,
            title: level_info.title.to_string(),
            current_level_xp: level_info.xp_required,
            next_level_xp: Level::xp_for_next(level_info.level),
        }
    }

    /// Calculate progress to next level (0.0 - 1.0)
    pub fn progress_to_next(&self) -> f32 {
        match self.next_level_xp {
            Some(next) => {
                let xp_in_level = self.experience - self.current_level_xp;
                let xp_for_level = next - self.current_level_xp;
                if xp_for_level == 0 {
                    1.0
                } else {
                    (xp_in_level as f32) / (xp_for_level as f32)
                }
            }
            None => 1.0, // Max level
        }
    }

    pub fn is_max_level(&self) -> bool {
        self.next_level_xp.is_none()
    }
}

/// XP rewards granted by progress transitions
pub struct XpRewards;

impl XpRewards {
    /// Flat bonus when a concept first becomes complete
    pub const CONCEPT_COMPLETED: u64 = 50;

    /// Per newly added minute spent on a concept
    pub const CONCEPT_MINUTE: u64 = 2;

    /// Per newly added minute spent on a project
    pub const PROJECT_MINUTE: u64 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_xp() {
        assert_eq!(level_of(0), 1);
        assert_eq!(level_of(70), 1);
        assert_eq!(level_of(99), 1);
        assert_eq!(level_of(100), 2);
        assert_eq!(level_of(250), 3);
        assert_eq!(level_of(60000), 20);
        assert_eq!(level_of(u64::MAX), 20); // Beyond max
    }

    #[test]
    fn test_levels_table_is_ascending() {
        assert_eq!(LEVELS[0].xp_required, 0);
        for pair in LEVELS.windows(2) {
            assert_eq!(pair[1].level, pair[0].level + 1);
            assert!(pair[1].xp_required > pair[0].xp_required);
        }
    }

    #[test]
    fn test_level_is_monotonic() {
        let mut previous = level_of(0);
        for xp in (0..70_000).step_by(37) {
            let level = level_of(xp);
            assert!(level >= previous, "level dropped at {} xp", xp);
            previous = level;
        }
    }

    #[test]
    fn test_level_progress() {
        let progress = LevelProgress::new(175); // Between level 2 (100) and level 3 (250)
        assert_eq!(progress.level, 2);
        assert_eq!(progress.current_level_xp, 100);
        assert_eq!(progress.next_level_xp, Some(250));
        assert!((progress.progress_to_next() - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_max_level_progress() {
        let progress = LevelProgress::new(1_000_000);
        assert!(progress.is_max_level());
        assert_eq!(progress.level, Level::max_level());
        assert_eq!(progress.progress_to_next(), 1.0);
    }
}
