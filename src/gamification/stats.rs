//! Activity stats snapshot
//!
//! Read-only counters the achievement checker evaluates. A snapshot is always
//! derived from a [`ProgressState`], never edited directly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::progress::ProgressState;

/// Raw activity counters at one point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub lessons_completed: u64,
    /// Concepts scored 100
    pub perfect_scores: u64,
    /// Total minutes spent learning
    pub time_spent: u64,
    pub projects_completed: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Skill id -> level (0-100)
    pub skill_levels: BTreeMap<String, f64>,
    pub lines_of_code: u64,
    pub error_free_sessions: u64,
    pub experience: u64,
    pub level: u32,
    /// Score of every concept that has been scored
    pub scores: Vec<u8>,
}

impl StatsSnapshot {
    pub fn from_state(state: &ProgressState) -> Self {
        let concepts = state.concepts.values();

        Self {
            lessons_completed: concepts.clone().filter(|c| c.completed).count() as u64,
            perfect_scores: concepts.clone().filter(|c| c.score == Some(100)).count() as u64,
            time_spent: state.total_time_spent,
            projects_completed: state.projects.values().filter(|p| p.completed).count() as u64,
            current_streak: state.streak.current,
            longest_streak: state.streak.longest,
            skill_levels: state.practice.skills.clone(),
            lines_of_code: state.practice.lines_of_code,
            error_free_sessions: state.practice.error_free_sessions,
            experience: state.experience(),
            level: state.level(),
            scores: concepts.filter_map(|c| c.score).collect(),
        }
    }

    /// Mean level across all tracked skills (0 when none are tracked)
    pub fn average_skill_level(&self) -> f64 {
        if self.skill_levels.is_empty() {
            return 0.0;
        }
        self.skill_levels.values().sum::<f64>() / self.skill_levels.len() as f64
    }

    /// Number of scores at or above `min_score`
    pub fn scores_at_least(&self, min_score: u8) -> u64 {
        self.scores.iter().filter(|&&s| s >= min_score).count() as u64
    }
}
