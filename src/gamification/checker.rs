//! Achievement checking logic
//!
//! Maps every requirement kind onto the stats field it compares against.

use super::definitions::Requirement;
use super::stats::StatsSnapshot;

/// Current value of the signal a requirement watches.
///
/// Returns `None` for kinds with no signal wired to them yet (community help,
/// kinds unknown to this build); those are never met.
pub fn measure(requirement: &Requirement, stats: &StatsSnapshot) -> Option<f64> {
    let value = match requirement {
        Requirement::CompleteLessons { .. } => stats.lessons_completed as f64,
        Requirement::PerfectScores { .. } => stats.perfect_scores as f64,
        Requirement::TimeSpent { .. } => stats.time_spent as f64,
        Requirement::CompleteProjects { .. } => stats.projects_completed as f64,
        Requirement::Streak {
            consecutive_only, ..
        } => {
            if *consecutive_only {
                stats.current_streak as f64
            } else {
                stats.longest_streak.max(stats.current_streak) as f64
            }
        }
        Requirement::SkillMastery { skill: Some(skill), .. } => {
            stats.skill_levels.get(skill).copied().unwrap_or(0.0)
        }
        Requirement::SkillMastery { skill: None, .. } => stats.average_skill_level(),
        Requirement::CodeLines { .. } => stats.lines_of_code as f64,
        Requirement::ErrorFreeSessions { .. } => stats.error_free_sessions as f64,
        Requirement::Experience { .. } => stats.experience as f64,
        Requirement::Level { .. } => stats.level as f64,
        Requirement::HighScores { min_score, .. } => stats.scores_at_least(*min_score) as f64,
        Requirement::HelpOthers { .. } | Requirement::Unknown => return None,
    };
    Some(value)
}

/// Check whether a requirement is satisfied by the snapshot
pub fn is_met(requirement: &Requirement, stats: &StatsSnapshot) -> bool {
    measure(requirement, stats).is_some_and(|current| current >= requirement.target())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_requirements() {
        let stats = StatsSnapshot {
            lessons_completed: 3,
            perfect_scores: 1,
            time_spent: 120,
            projects_completed: 2,
            lines_of_code: 500,
            error_free_sessions: 4,
            experience: 900,
            level: 4,
            ..Default::default()
        };

        assert!(is_met(&Requirement::CompleteLessons { target: 3 }, &stats));
        assert!(!is_met(&Requirement::CompleteLessons { target: 4 }, &stats));
        assert!(is_met(&Requirement::PerfectScores { target: 1 }, &stats));
        assert!(is_met(&Requirement::TimeSpent { target: 120 }, &stats));
        assert!(!is_met(&Requirement::CompleteProjects { target: 3 }, &stats));
        assert!(is_met(&Requirement::CodeLines { target: 500 }, &stats));
        assert!(!is_met(&Requirement::ErrorFreeSessions { target: 5 }, &stats));
        assert!(is_met(&Requirement::Experience { target: 900 }, &stats));
        assert!(is_met(&Requirement::Level { target: 4 }, &stats));
    }

    #[test]
    fn test_streak_consecutive_flag() {
        let stats = StatsSnapshot {
            current_streak: 2,
            longest_streak: 10,
            ..Default::default()
        };

        let best_ever = Requirement::Streak {
            target: 7,
            consecutive_only: false,
        };
        let running = Requirement::Streak {
            target: 7,
            consecutive_only: true,
        };
        assert!(is_met(&best_ever, &stats));
        assert!(!is_met(&running, &stats));
    }

    #[test]
    fn test_skill_mastery_without_skills_is_unmet() {
        let stats = StatsSnapshot::default();
        let req = Requirement::SkillMastery {
            target: 50.0,
            skill: None,
        };
        assert_eq!(measure(&req, &stats), Some(0.0));
        assert!(!is_met(&req, &stats));
    }

    #[test]
    fn test_skill_mastery_average_and_single_skill() {
        let mut stats = StatsSnapshot::default();
        stats.skill_levels.insert("borrowing".to_string(), 90.0);
        stats.skill_levels.insert("macros".to_string(), 30.0);

        let average = Requirement::SkillMastery {
            target: 60.0,
            skill: None,
        };
        let borrowing = Requirement::SkillMastery {
            target: 85.0,
            skill: Some("borrowing".to_string()),
        };
        let lifetimes = Requirement::SkillMastery {
            target: 10.0,
            skill: Some("lifetimes".to_string()),
        };
        assert!(is_met(&average, &stats));
        assert!(is_met(&borrowing, &stats));
        assert!(!is_met(&lifetimes, &stats));
    }

    #[test]
    fn test_high_scores() {
        let stats = StatsSnapshot {
            scores: vec![95, 92, 70],
            ..Default::default()
        };
        let req = Requirement::HighScores {
            target: 2,
            min_score: 90,
        };
        assert!(is_met(&req, &stats));
    }

    #[test]
    fn test_unwired_kinds_are_never_met() {
        let stats = StatsSnapshot {
            lessons_completed: 1_000,
            experience: 1_000_000,
            ..Default::default()
        };
        assert!(!is_met(&Requirement::HelpOthers { target: 0 }, &stats));
        assert!(!is_met(&Requirement::Unknown, &stats));
    }
}
