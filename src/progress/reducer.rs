//! Progress reducer
//!
//! The only way a [`ProgressState`] changes. Every transition is a pure
//! function of the previous state and the action; timestamps and "today" ride
//! on the action so replaying the same actions yields the same state.

use chrono::{DateTime, NaiveDate, Utc};

use super::models::{
    AchievementRecord, ConceptProgress, Difficulty, ProgressState, ProjectProgress,
};
use crate::gamification::{advance_streak, level_of, Rarity, XpRewards};

/// Partial update of a concept record. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConceptUpdate {
    pub completed: Option<bool>,
    /// New cumulative minutes (not a delta)
    pub time_spent: Option<u64>,
    pub score: Option<u8>,
    /// Exercise ids to mark as done
    pub exercises_completed: Vec<String>,
    pub notes_count: Option<u32>,
}

/// Partial update of a project record. `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectUpdate {
    pub started: Option<bool>,
    pub completed: Option<bool>,
    pub difficulty: Option<Difficulty>,
    /// New cumulative minutes (not a delta)
    pub time_spent: Option<u64>,
    pub score: Option<u8>,
    /// Step ids to mark as done, appended in order
    pub steps_completed: Vec<String>,
    pub notes_count: Option<u32>,
}

/// Partial update of the preferences block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferencesUpdate {
    pub daily_goal_minutes: Option<u32>,
    pub notifications_enabled: Option<bool>,
    pub tracking_enabled: Option<bool>,
}

/// The closed set of progress transitions
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressAction {
    UpdateConcept {
        concept_id: String,
        update: ConceptUpdate,
        at: DateTime<Utc>,
    },
    UpdateProject {
        project_id: String,
        update: ProjectUpdate,
        at: DateTime<Utc>,
    },
    AddAchievement {
        achievement_id: String,
        rarity: Rarity,
        at: DateTime<Utc>,
    },
    UpdateStreak {
        today: NaiveDate,
    },
    AddTimeSpent {
        minutes: u64,
        on: NaiveDate,
    },
    UpdatePreferences(PreferencesUpdate),
    StartSession {
        at: DateTime<Utc>,
        today: NaiveDate,
    },
    RecordPractice {
        lines_of_code: u64,
        error_free: bool,
    },
    UpdateSkill {
        skill_id: String,
        level: f64,
    },
    Reset,
    Import(Box<ProgressState>),
}

impl ProgressAction {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UpdateConcept { .. } => "update_concept",
            Self::UpdateProject { .. } => "update_project",
            Self::AddAchievement { .. } => "add_achievement",
            Self::UpdateStreak { .. } => "update_streak",
            Self::AddTimeSpent { .. } => "add_time_spent",
            Self::UpdatePreferences(_) => "update_preferences",
            Self::StartSession { .. } => "start_session",
            Self::RecordPractice { .. } => "record_practice",
            Self::UpdateSkill { .. } => "update_skill",
            Self::Reset => "reset",
            Self::Import(_) => "import",
        }
    }
}

/// Compute the state that follows `action`.
pub fn apply(state: &ProgressState, action: ProgressAction) -> ProgressState {
    let mut next = match action {
        ProgressAction::Reset => return ProgressState::default(),
        ProgressAction::Import(imported) => *imported,
        action => {
            let mut next = state.clone();
            apply_in_place(&mut next, action);
            next
        }
    };

    next.level = level_of(next.experience);
    next
}

fn apply_in_place(state: &mut ProgressState, action: ProgressAction) {
    match action {
        ProgressAction::UpdateConcept {
            concept_id,
            update,
            at,
        } => {
            let record = state
                .concepts
                .entry(concept_id.clone())
                .or_insert_with(|| ConceptProgress::new(&concept_id));
            let xp = update_concept(record, update, at);
            state.experience = state.experience.saturating_add(xp);
        }
        ProgressAction::UpdateProject {
            project_id,
            update,
            at,
        } => {
            let record = state
                .projects
                .entry(project_id.clone())
                .or_insert_with(|| ProjectProgress::new(&project_id));
            let xp = update_project(record, update, at);
            state.experience = state.experience.saturating_add(xp);
        }
        ProgressAction::AddAchievement {
            achievement_id,
            rarity,
            at,
        } => {
            if state.has_achievement(&achievement_id) {
                return;
            }
            state.achievements.push(AchievementRecord {
                id: achievement_id,
                unlocked_at: at,
            });
            state.experience = state.experience.saturating_add(rarity.xp_reward());
        }
        ProgressAction::UpdateStreak { today } => {
            state.streak = advance_streak(&state.streak, today);
        }
        ProgressAction::AddTimeSpent { minutes, on } => {
            state.total_time_spent = state.total_time_spent.saturating_add(minutes);
            let day = state.daily_minutes.entry(on).or_insert(0);
            *day = day.saturating_add(minutes);
        }
        ProgressAction::UpdatePreferences(update) => {
            let prefs = &mut state.preferences;
            if let Some(goal) = update.daily_goal_minutes {
                prefs.daily_goal_minutes = goal;
            }
            if let Some(enabled) = update.notifications_enabled {
                prefs.notifications_enabled = enabled;
            }
            if let Some(enabled) = update.tracking_enabled {
                prefs.tracking_enabled = enabled;
            }
        }
        ProgressAction::StartSession { at, today } => {
            state.last_session = Some(at);
            if state.streak.last_active_date != Some(today) {
                state.streak = advance_streak(&state.streak, today);
            }
        }
        ProgressAction::RecordPractice {
            lines_of_code,
            error_free,
        } => {
            let practice = &mut state.practice;
            practice.lines_of_code = practice.lines_of_code.saturating_add(lines_of_code);
            if error_free {
                practice.error_free_sessions += 1;
            }
        }
        ProgressAction::UpdateSkill { skill_id, level } => {
            if level.is_nan() {
                return;
            }
            state.practice.skills.insert(skill_id, level.clamp(0.0, 100.0));
        }
        ProgressAction::Reset | ProgressAction::Import(_) => {}
    }
}

/// Apply a concept update, returning the XP it earned
fn update_concept(record: &mut ConceptProgress, update: ConceptUpdate, at: DateTime<Utc>) -> u64 {
    let mut xp = 0;
    let was_completed = record.completed;

    if let Some(completed) = update.completed {
        record.completed = completed;
    }
    if let Some(minutes) = update.time_spent {
        xp += added_minutes(record.time_spent, minutes).saturating_mul(XpRewards::CONCEPT_MINUTE);
        record.time_spent = minutes;
    }
    if let Some(score) = update.score {
        record.score = Some(score.min(100));
    }
    record.completed_exercises.extend(update.exercises_completed);
    if let Some(notes) = update.notes_count {
        record.notes_count = notes;
    }
    record.last_accessed = Some(at);

    if !was_completed && record.completed {
        xp = xp.saturating_add(XpRewards::CONCEPT_COMPLETED);
    }
    xp
}

/// Apply a project update, returning the XP it earned
fn update_project(record: &mut ProjectProgress, update: ProjectUpdate, at: DateTime<Utc>) -> u64 {
    let mut xp = 0;
    let was_completed = record.completed;

    if let Some(started) = update.started {
        record.started = started;
    }
    if let Some(completed) = update.completed {
        record.completed = completed;
    }
    if let Some(difficulty) = update.difficulty {
        record.difficulty = difficulty;
    }
    if let Some(minutes) = update.time_spent {
        xp += added_minutes(record.time_spent, minutes).saturating_mul(XpRewards::PROJECT_MINUTE);
        record.time_spent = minutes;
    }
    if let Some(score) = update.score {
        record.score = Some(score.min(100));
    }
    for step in update.steps_completed {
        if !record.completed_steps.contains(&step) {
            record.completed_steps.push(step);
        }
    }
    if let Some(notes) = update.notes_count {
        record.notes_count = notes;
    }
    if record.completed || !record.completed_steps.is_empty() {
        record.started = true;
    }
    record.last_accessed = Some(at);

    if !was_completed && record.completed {
        xp = xp.saturating_add(record.difficulty.completion_bonus());
    }
    xp
}

/// Newly added minutes; a shrinking total counts as zero
fn added_minutes(previous: u64, reported: u64) -> u64 {
    reported.saturating_sub(previous)
}

/// Cumulative time that would go backwards under `action`.
///
/// Returns `(previous, reported)` minutes so the caller can log the anomaly.
pub fn time_regression(state: &ProgressState, action: &ProgressAction) -> Option<(u64, u64)> {
    let (previous, reported) = match action {
        ProgressAction::UpdateConcept {
            concept_id, update, ..
        } => (state.concepts.get(concept_id)?.time_spent, update.time_spent?),
        ProgressAction::UpdateProject {
            project_id, update, ..
        } => (state.projects.get(project_id)?.time_spent, update.time_spent?),
        _ => return None,
    };
    (reported < previous).then_some((previous, reported))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 5, 9, 30, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn concept(id: &str, update: ConceptUpdate) -> ProgressAction {
        ProgressAction::UpdateConcept {
            concept_id: id.to_string(),
            update,
            at: at(),
        }
    }

    fn project(id: &str, update: ProjectUpdate) -> ProgressAction {
        ProgressAction::UpdateProject {
            project_id: id.to_string(),
            update,
            at: at(),
        }
    }

    #[test]
    fn test_concept_completion_with_time() {
        let state = ProgressState::default();
        let next = apply(
            &state,
            concept(
                "ownership",
                ConceptUpdate {
                    completed: Some(true),
                    time_spent: Some(10),
                    ..Default::default()
                },
            ),
        );

        assert_eq!(next.experience(), 70);
        assert_eq!(next.level(), 1);
        assert!(next.concepts["ownership"].completed);
        assert_eq!(next.concepts["ownership"].last_accessed, Some(at()));
    }

    #[test]
    fn test_completion_bonus_only_on_transition() {
        let done = ConceptUpdate {
            completed: Some(true),
            ..Default::default()
        };
        let state = apply(&ProgressState::default(), concept("traits", done.clone()));
        let state = apply(&state, concept("traits", done));
        assert_eq!(state.experience(), XpRewards::CONCEPT_COMPLETED);
    }

    #[test]
    fn test_only_new_minutes_earn_xp() {
        let minutes = |m| ConceptUpdate {
            time_spent: Some(m),
            ..Default::default()
        };
        let state = apply(&ProgressState::default(), concept("enums", minutes(10)));
        let state = apply(&state, concept("enums", minutes(15)));
        assert_eq!(state.experience(), 15 * XpRewards::CONCEPT_MINUTE);
    }

    #[test]
    fn test_decreasing_time_earns_nothing() {
        let minutes = |m| ConceptUpdate {
            time_spent: Some(m),
            ..Default::default()
        };
        let state = apply(&ProgressState::default(), concept("enums", minutes(30)));
        let action = concept("enums", minutes(5));
        assert_eq!(time_regression(&state, &action), Some((30, 5)));

        let next = apply(&state, action);
        assert_eq!(next.experience(), state.experience());
        assert_eq!(next.concepts["enums"].time_spent, 5);

        // Climbing back only pays for minutes past the new baseline
        let next = apply(&next, concept("enums", minutes(8)));
        assert_eq!(next.experience(), state.experience() + 3 * XpRewards::CONCEPT_MINUTE);
    }

    #[test]
    fn test_huge_reported_time_saturates_experience() {
        let state = apply(
            &ProgressState::default(),
            concept(
                "x",
                ConceptUpdate {
                    completed: Some(true),
                    time_spent: Some(u64::MAX),
                    ..Default::default()
                },
            ),
        );
        assert_eq!(state.experience(), u64::MAX);
        assert_eq!(state.level(), level_of(u64::MAX));

        let state = apply(
            &state,
            project(
                "y",
                ProjectUpdate {
                    completed: Some(true),
                    time_spent: Some(u64::MAX),
                    ..Default::default()
                },
            ),
        );
        assert_eq!(state.experience(), u64::MAX);
    }

    #[test]
    fn test_project_bonus_scales_with_difficulty() {
        let complete = |difficulty| ProjectUpdate {
            completed: Some(true),
            difficulty: Some(difficulty),
            time_spent: Some(20),
            ..Default::default()
        };

        let easy = apply(&ProgressState::default(), project("cli", complete(Difficulty::Beginner)));
        let hard = apply(&ProgressState::default(), project("os", complete(Difficulty::Advanced)));

        assert_eq!(easy.experience(), 100 + 20 * XpRewards::PROJECT_MINUTE);
        assert_eq!(hard.experience(), 300 + 20 * XpRewards::PROJECT_MINUTE);
        assert!(hard.projects["os"].started);
        assert!(hard.level() > 1);
    }

    #[test]
    fn test_project_steps_keep_order_without_duplicates() {
        let steps = |ids: &[&str]| ProjectUpdate {
            steps_completed: ids.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        let state = apply(&ProgressState::default(), project("web", steps(&["setup", "routes"])));
        let state = apply(&state, project("web", steps(&["routes", "deploy"])));

        let record = &state.projects["web"];
        assert_eq!(record.completed_steps, vec!["setup", "routes", "deploy"]);
        assert!(record.started);
        assert!(!record.completed);
    }

    #[test]
    fn test_add_achievement_once() {
        let grant = ProgressAction::AddAchievement {
            achievement_id: "first_steps".to_string(),
            rarity: Rarity::Epic,
            at: at(),
        };
        let state = apply(&ProgressState::default(), grant.clone());
        let again = apply(&state, grant);

        assert_eq!(state.experience(), Rarity::Epic.xp_reward());
        assert_eq!(state.level(), 2);
        assert_eq!(again, state);
        assert_eq!(again.achievements.len(), 1);
    }

    #[test]
    fn test_start_session_advances_streak() {
        let start = |d| ProgressAction::StartSession { at: at(), today: day(d) };

        let state = apply(&ProgressState::default(), start(5));
        assert_eq!(state.streak.current, 1);
        assert_eq!(state.last_session, Some(at()));

        let state = apply(&state, start(5));
        assert_eq!(state.streak.current, 1);

        let state = apply(&state, start(6));
        assert_eq!(state.streak.current, 2);
        assert_eq!(state.streak.longest, 2);

        let state = apply(&state, ProgressAction::UpdateStreak { today: day(9) });
        assert_eq!(state.streak.current, 1);
        assert_eq!(state.streak.longest, 2);
    }

    #[test]
    fn test_add_time_spent_buckets_by_day() {
        let log = |minutes, d| ProgressAction::AddTimeSpent { minutes, on: day(d) };
        let state = apply(&ProgressState::default(), log(20, 5));
        let state = apply(&state, log(15, 5));
        let state = apply(&state, log(10, 6));

        assert_eq!(state.total_time_spent, 45);
        assert_eq!(state.daily_minutes[&day(5)], 35);
        assert_eq!(state.daily_minutes[&day(6)], 10);
        assert_eq!(state.experience(), 0);
    }

    #[test]
    fn test_update_preferences_is_partial() {
        let state = apply(
            &ProgressState::default(),
            ProgressAction::UpdatePreferences(PreferencesUpdate {
                daily_goal_minutes: Some(45),
                ..Default::default()
            }),
        );
        assert_eq!(state.preferences.daily_goal_minutes, 45);
        assert!(state.preferences.notifications_enabled);
        assert!(state.preferences.tracking_enabled);
    }

    #[test]
    fn test_practice_and_skills() {
        let state = apply(
            &ProgressState::default(),
            ProgressAction::RecordPractice { lines_of_code: 120, error_free: true },
        );
        let state = apply(
            &state,
            ProgressAction::RecordPractice { lines_of_code: 30, error_free: false },
        );
        let state = apply(
            &state,
            ProgressAction::UpdateSkill { skill_id: "iterators".to_string(), level: 140.0 },
        );
        let state = apply(
            &state,
            ProgressAction::UpdateSkill { skill_id: "async".to_string(), level: f64::NAN },
        );

        assert_eq!(state.practice.lines_of_code, 150);
        assert_eq!(state.practice.error_free_sessions, 1);
        assert_eq!(state.practice.skills.get("iterators"), Some(&100.0));
        assert!(!state.practice.skills.contains_key("async"));
    }

    #[test]
    fn test_reset_and_import() {
        let state = apply(
            &ProgressState::default(),
            concept("closures", ConceptUpdate { completed: Some(true), ..Default::default() }),
        );

        let reset = apply(&state, ProgressAction::Reset);
        assert_eq!(reset, ProgressState::default());

        let imported = apply(&reset, ProgressAction::Import(Box::new(state.clone())));
        assert_eq!(imported, state);
    }

    #[test]
    fn test_import_rederives_level() {
        let mut forged = ProgressState::default();
        forged.experience = 300;
        forged.level = 17;

        let imported = apply(&ProgressState::default(), ProgressAction::Import(Box::new(forged)));
        assert_eq!(imported.level(), level_of(300));
    }

    #[test]
    fn test_score_is_capped() {
        let state = apply(
            &ProgressState::default(),
            concept("generics", ConceptUpdate { score: Some(250), ..Default::default() }),
        );
        assert_eq!(state.concepts["generics"].score, Some(100));
    }
}
