//! Read-only views over a progress state for the presentation layer

use chrono::NaiveDate;
use serde::Serialize;

use super::models::ProgressState;
use crate::gamification::LevelProgress;

/// Completed vs. tracked counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompletionCount {
    pub completed: usize,
    pub total: usize,
}

impl CompletionCount {
    /// 0.0 - 100.0, 0 when nothing is tracked
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64 * 100.0
        }
    }
}

/// Dashboard summary for one learner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressOverview {
    pub concepts: CompletionCount,
    pub projects: CompletionCount,
    /// Completed units over all tracked units (0.0 - 100.0)
    pub overall_percentage: f64,
    pub level: LevelProgress,
    pub minutes_today: u64,
    pub daily_goal_minutes: u32,
    /// Minutes today over the daily goal, capped at 100.0
    pub daily_goal_percentage: f64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub streak_active: bool,
    pub achievements_unlocked: usize,
}

impl ProgressOverview {
    pub fn compute(state: &ProgressState, today: NaiveDate) -> Self {
        let concepts = concept_counts(state);
        let projects = project_counts(state);
        let overall = CompletionCount {
            completed: concepts.completed + projects.completed,
            total: concepts.total + projects.total,
        };

        Self {
            concepts,
            projects,
            overall_percentage: overall.percentage(),
            level: LevelProgress::new(state.experience()),
            minutes_today: minutes_on(state, today),
            daily_goal_minutes: state.preferences.daily_goal_minutes,
            daily_goal_percentage: daily_goal_percentage(state, today),
            current_streak: state.streak.current,
            longest_streak: state.streak.longest,
            streak_active: state.streak.is_active(today),
            achievements_unlocked: state.achievements.len(),
        }
    }
}

pub fn concept_counts(state: &ProgressState) -> CompletionCount {
    CompletionCount {
        completed: state.concepts.values().filter(|c| c.completed).count(),
        total: state.concepts.len(),
    }
}

pub fn project_counts(state: &ProgressState) -> CompletionCount {
    CompletionCount {
        completed: state.projects.values().filter(|p| p.completed).count(),
        total: state.projects.len(),
    }
}

/// Minutes logged on a calendar day
pub fn minutes_on(state: &ProgressState, day: NaiveDate) -> u64 {
    state.daily_minutes.get(&day).copied().unwrap_or(0)
}

/// Progress towards the daily goal, capped at 100.0.
///
/// A goal of zero minutes counts as already met.
pub fn daily_goal_percentage(state: &ProgressState, today: NaiveDate) -> f64 {
    let goal = state.preferences.daily_goal_minutes;
    if goal == 0 {
        return 100.0;
    }
    (minutes_on(state, today) as f64 / goal as f64 * 100.0).min(100.0)
}
