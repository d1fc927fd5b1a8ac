//! Learner session - hosts one learner's progress
//!
//! Hydrates state from storage, runs every transition through the reducer,
//! lets the badge engine react to the new state, and writes the result back.
//!
//! # Usage
//!
//! ```ignore
//! let store = SqliteStore::open(&config.database_path())?;
//! let mut session = LearnerSession::open("ada", "progress:ada", store, BadgeEngine::default());
//!
//! session.subscribe(|event| println!("Unlocked {}", event.achievement_id));
//! session.start_session();
//! session.update_concept("ownership", ConceptUpdate { completed: Some(true), ..Default::default() });
//! ```

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::gamification::{
    local_today, BadgeEngine, BadgeProgress, EngineError, ListenerId, StatsSnapshot, UnlockEvent,
};
use crate::progress::{
    self, apply, time_regression, ConceptUpdate, Preferences, ProgressAction, ProgressOverview,
    ProgressState, ProjectUpdate,
};
use crate::storage::KeyValueStore;

/// One learner's state, badge engine and storage
pub struct LearnerSession<S: KeyValueStore> {
    learner_id: String,
    key: String,
    state: ProgressState,
    engine: BadgeEngine,
    store: S,
}

impl<S: KeyValueStore> LearnerSession<S> {
    /// Open a session, hydrating state from `store`.
    ///
    /// Missing or unreadable state falls back to the default state.
    pub fn open(learner_id: &str, key: &str, store: S, engine: BadgeEngine) -> Self {
        Self::open_with_preferences(learner_id, key, store, engine, Preferences::default())
    }

    /// Like [`open`](Self::open), with the preferences a brand-new learner starts with
    pub fn open_with_preferences(
        learner_id: &str,
        key: &str,
        store: S,
        mut engine: BadgeEngine,
        preferences: Preferences,
    ) -> Self {
        let state = load_state(&store, key)
            .unwrap_or_else(|| ProgressState::with_preferences(preferences));
        engine.restore(learner_id, unlock_records(&state));

        Self {
            learner_id: learner_id.to_string(),
            key: key.to_string(),
            state,
            engine,
            store,
        }
    }

    pub fn learner_id(&self) -> &str {
        &self.learner_id
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn engine(&self) -> &BadgeEngine {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current stats snapshot
    pub fn stats(&self) -> StatsSnapshot {
        StatsSnapshot::from_state(&self.state)
    }

    pub fn overview(&self, today: NaiveDate) -> ProgressOverview {
        ProgressOverview::compute(&self.state, today)
    }

    pub fn progress_towards(&self, achievement_id: &str) -> Result<BadgeProgress, EngineError> {
        self.engine
            .progress_towards(&self.learner_id, achievement_id, &self.stats())
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&UnlockEvent) + 'static,
    {
        self.engine.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.engine.unsubscribe(id)
    }

    // ========================================
    // TRANSITIONS
    // ========================================

    /// Apply a transition, grant whatever it made reachable, and persist.
    ///
    /// Returns the unlock events in grant order.
    pub fn dispatch(&mut self, action: ProgressAction) -> Vec<UnlockEvent> {
        if let Some((previous, reported)) = time_regression(&self.state, &action) {
            warn!(
                "Time spent went backwards ({} -> {} min) for learner {}; no XP granted for it",
                previous, reported, self.learner_id
            );
        }

        // The engine's unlock set must follow any change to the achievement records
        let touches_unlocks = matches!(
            action,
            ProgressAction::Reset
                | ProgressAction::Import(_)
                | ProgressAction::AddAchievement { .. }
        );
        self.commit(action);

        if touches_unlocks {
            self.engine
                .restore(&self.learner_id, unlock_records(&self.state));
        }

        self.reconcile_achievements()
    }

    /// Record the start of a session today
    pub fn start_session(&mut self) -> Vec<UnlockEvent> {
        self.dispatch(ProgressAction::StartSession {
            at: Utc::now(),
            today: local_today(),
        })
    }

    pub fn update_concept(&mut self, concept_id: &str, update: ConceptUpdate) -> Vec<UnlockEvent> {
        self.dispatch(ProgressAction::UpdateConcept {
            concept_id: concept_id.to_string(),
            update,
            at: Utc::now(),
        })
    }

    pub fn update_project(&mut self, project_id: &str, update: ProjectUpdate) -> Vec<UnlockEvent> {
        self.dispatch(ProgressAction::UpdateProject {
            project_id: project_id.to_string(),
            update,
            at: Utc::now(),
        })
    }

    /// Log minutes spent today. Ignored while tracking is disabled.
    pub fn log_minutes(&mut self, minutes: u64) -> Vec<UnlockEvent> {
        if !self.state.preferences.tracking_enabled {
            debug!("Time tracking disabled, dropping {} min", minutes);
            return Vec::new();
        }
        self.dispatch(ProgressAction::AddTimeSpent {
            minutes,
            on: local_today(),
        })
    }

    pub fn reset(&mut self) {
        self.dispatch(ProgressAction::Reset);
        info!("Progress reset for learner {}", self.learner_id);
    }

    // ========================================
    // EXPORT / IMPORT
    // ========================================

    /// Full JSON export of the current state
    pub fn export(&self) -> Result<String, serde_json::Error> {
        progress::export(&self.state)
    }

    /// Replace the state with previously exported text.
    ///
    /// Returns false, leaving the state untouched, if the text does not parse.
    pub fn import(&mut self, text: &str) -> bool {
        match progress::parse(text) {
            Ok(imported) => {
                self.dispatch(ProgressAction::Import(Box::new(imported)));
                info!("Imported progress for learner {}", self.learner_id);
                true
            }
            Err(e) => {
                warn!("Rejected progress import: {}", e);
                false
            }
        }
    }

    // ========================================
    // INTERNALS
    // ========================================

    fn commit(&mut self, action: ProgressAction) {
        debug!("Applying {} for learner {}", action.kind(), self.learner_id);
        self.state = apply(&self.state, action);
        self.persist();
    }

    /// Grant achievements until the state stops producing new ones.
    ///
    /// A grant adds XP, which can satisfy further XP or level requirements, so
    /// one pass is not always enough. Each pass either unlocks something new or
    /// ends the loop, so the catalogue size bounds the number of passes.
    fn reconcile_achievements(&mut self) -> Vec<UnlockEvent> {
        let mut unlocked = Vec::new();
        let max_passes = self.engine.catalogue().len() + 1;

        for _ in 0..max_passes {
            let stats = self.stats();
            let events = self.engine.check_unlocks(&self.learner_id, &stats);
            if events.is_empty() {
                return unlocked;
            }

            for event in &events {
                info!(
                    "Achievement unlocked for {}: {} (+{} XP)",
                    self.learner_id, event.achievement_id, event.xp_gained
                );
                self.commit(ProgressAction::AddAchievement {
                    achievement_id: event.achievement_id.clone(),
                    rarity: event.rarity,
                    at: event.unlocked_at,
                });
            }
            unlocked.extend(events);
        }

        warn!(
            "Achievement check for {} still granting after {} passes",
            self.learner_id, max_passes
        );
        unlocked
    }

    fn persist(&mut self) {
        let blob = match progress::export(&self.state) {
            Ok(blob) => blob,
            Err(e) => {
                warn!("Failed to serialize progress for {}: {}", self.learner_id, e);
                return;
            }
        };

        // The in-memory state stays authoritative if the write fails
        if let Err(e) = self.store.save(&self.key, &blob) {
            warn!("Failed to save progress for {}: {}", self.learner_id, e);
        }
    }
}

/// Read and parse persisted state, treating anything unusable as absent
fn load_state<S: KeyValueStore>(store: &S, key: &str) -> Option<ProgressState> {
    let blob = match store.load(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            debug!("No saved progress under {}", key);
            return None;
        }
        Err(e) => {
            warn!("Failed to load progress from {}: {}", key, e);
            return None;
        }
    };

    match progress::parse(&blob) {
        // Import re-derives the level from experience
        Ok(state) => Some(apply(
            &ProgressState::default(),
            ProgressAction::Import(Box::new(state)),
        )),
        Err(e) => {
            warn!("Discarding malformed progress under {}: {}", key, e);
            None
        }
    }
}

fn unlock_records(
    state: &ProgressState,
) -> impl Iterator<Item = (String, chrono::DateTime<Utc>)> + '_ {
    state
        .achievements
        .iter()
        .map(|record| (record.id.clone(), record.unlocked_at))
}
