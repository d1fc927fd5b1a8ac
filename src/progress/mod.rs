//! Progress store: learner state and the reducer that advances it
//!
//! ```ignore
//! let state = apply(&state, ProgressAction::StartSession { at, today });
//! let overview = ProgressOverview::compute(&state, today);
//! ```

mod models;
mod projections;
mod reducer;
mod transfer;

pub use models::{
    AchievementRecord, ConceptProgress, Difficulty, Preferences, PracticeStats, ProgressState,
    ProjectProgress,
};
pub use projections::{
    concept_counts, daily_goal_percentage, minutes_on, project_counts, CompletionCount,
    ProgressOverview,
};
pub use reducer::{
    apply, time_regression, ConceptUpdate, PreferencesUpdate, ProgressAction, ProjectUpdate,
};
pub use transfer::{export, parse};
