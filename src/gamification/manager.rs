//! Badge engine - grants achievements exactly once per learner
//!
//! Holds the catalogue, the unlock set of every learner it has seen, and the
//! listeners notified when something unlocks. Everything runs synchronously on
//! the caller's thread.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::catalogue::Catalogue;
use super::checker::{is_met, measure};
use super::definitions::{AchievementDefinition, Rarity};
use super::stats::StatsSnapshot;

/// Errors returned by the badge engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Unknown achievement: {0}")]
    UnknownAchievement(String),
}

/// Emitted once when an achievement unlocks for a learner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnlockEvent {
    pub achievement_id: String,
    pub learner_id: String,
    pub unlocked_at: DateTime<Utc>,
    pub rarity: Rarity,
    /// Stats the requirement was evaluated against
    pub stats: StatsSnapshot,
    pub xp_gained: u64,
}

/// Progress towards a single achievement, for progress bars
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeProgress {
    pub current: f64,
    pub total: f64,
    /// 0.0 - 100.0
    pub percentage: f64,
    pub unlocked: bool,
}

/// Handle returned by [`BadgeEngine::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn Fn(&UnlockEvent)>;

pub struct BadgeEngine {
    catalogue: Catalogue,
    /// learner id -> achievement id -> unlock time
    unlocked: HashMap<String, BTreeMap<String, DateTime<Utc>>>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl BadgeEngine {
    pub fn new(catalogue: Catalogue) -> Self {
        Self {
            catalogue,
            unlocked: HashMap::new(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    // ========================================
    // LISTENERS
    // ========================================

    /// Register a callback invoked for every unlock, in grant order
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&UnlockEvent) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a callback. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    // ========================================
    // UNLOCK SET
    // ========================================

    /// Seed a learner's unlock set from persisted records, replacing what the
    /// engine held for that learner.
    pub fn restore<I>(&mut self, learner_id: &str, records: I)
    where
        I: IntoIterator<Item = (String, DateTime<Utc>)>,
    {
        self.unlocked
            .insert(learner_id.to_string(), records.into_iter().collect());
    }

    /// Drop everything known about a learner
    pub fn forget(&mut self, learner_id: &str) {
        self.unlocked.remove(learner_id);
    }

    pub fn is_unlocked(&self, learner_id: &str, achievement_id: &str) -> bool {
        self.unlocked
            .get(learner_id)
            .is_some_and(|set| set.contains_key(achievement_id))
    }

    /// Unlocked achievement ids for a learner, in catalogue order
    pub fn unlocked_ids(&self, learner_id: &str) -> Vec<&str> {
        self.catalogue
            .iter()
            .filter(|a| self.is_unlocked(learner_id, &a.id))
            .map(|a| a.id.as_str())
            .collect()
    }

    // ========================================
    // MAIN CHECK FUNCTIONS
    // ========================================

    /// Grant every achievement that is not yet unlocked and whose requirement
    /// the snapshot satisfies. Events come back in catalogue order.
    pub fn check_unlocks(&mut self, learner_id: &str, stats: &StatsSnapshot) -> Vec<UnlockEvent> {
        let eligible: Vec<usize> = self
            .catalogue
            .iter()
            .enumerate()
            .filter(|(_, a)| !self.is_unlocked(learner_id, &a.id))
            .filter(|(_, a)| is_met(&a.requirement, stats))
            .map(|(index, _)| index)
            .collect();

        eligible
            .into_iter()
            .filter_map(|index| self.grant(learner_id, index, stats))
            .collect()
    }

    /// One-time grant of a specific achievement.
    ///
    /// Returns `Ok(None)` when the learner already has it. The requirement is
    /// not re-checked here.
    pub fn award(
        &mut self,
        learner_id: &str,
        achievement_id: &str,
        stats: &StatsSnapshot,
    ) -> Result<Option<UnlockEvent>, EngineError> {
        let index = self.index_of(achievement_id)?;
        Ok(self.grant(learner_id, index, stats))
    }

    /// Progress towards an achievement. Unlocked achievements always report
    /// complete, whatever the snapshot says.
    pub fn progress_towards(
        &self,
        learner_id: &str,
        achievement_id: &str,
        stats: &StatsSnapshot,
    ) -> Result<BadgeProgress, EngineError> {
        let index = self.index_of(achievement_id)?;
        let achievement = self.definition(index);
        Ok(self.progress_of(learner_id, achievement, stats))
    }

    /// Progress towards every achievement in catalogue order
    pub fn all_progress(
        &self,
        learner_id: &str,
        stats: &StatsSnapshot,
    ) -> Vec<(&AchievementDefinition, BadgeProgress)> {
        self.catalogue
            .iter()
            .map(|a| (a, self.progress_of(learner_id, a, stats)))
            .collect()
    }

    fn progress_of(
        &self,
        learner_id: &str,
        achievement: &AchievementDefinition,
        stats: &StatsSnapshot,
    ) -> BadgeProgress {
        let total = achievement.requirement.target();

        if self.is_unlocked(learner_id, &achievement.id) {
            return BadgeProgress {
                current: total,
                total,
                percentage: 100.0,
                unlocked: true,
            };
        }

        let current = measure(&achievement.requirement, stats).unwrap_or(0.0);
        let percentage = if total <= 0.0 {
            if is_met(&achievement.requirement, stats) {
                100.0
            } else {
                0.0
            }
        } else {
            (current / total * 100.0).min(100.0)
        };

        BadgeProgress {
            current,
            total,
            percentage,
            unlocked: false,
        }
    }

    fn grant(
        &mut self,
        learner_id: &str,
        index: usize,
        stats: &StatsSnapshot,
    ) -> Option<UnlockEvent> {
        let (achievement_id, rarity) = {
            let achievement = self.definition(index);
            (achievement.id.clone(), achievement.rarity)
        };

        let set = self.unlocked.entry(learner_id.to_string()).or_default();
        if set.contains_key(&achievement_id) {
            return None;
        }

        let now = Utc::now();
        set.insert(achievement_id.clone(), now);

        let event = UnlockEvent {
            achievement_id,
            learner_id: learner_id.to_string(),
            unlocked_at: now,
            rarity,
            stats: stats.clone(),
            xp_gained: rarity.xp_reward(),
        };

        for (_, listener) in &self.listeners {
            listener(&event);
        }

        Some(event)
    }

    fn index_of(&self, achievement_id: &str) -> Result<usize, EngineError> {
        self.catalogue
            .iter()
            .position(|a| a.id == achievement_id)
            .ok_or_else(|| EngineError::UnknownAchievement(achievement_id.to_string()))
    }

    fn definition(&self, index: usize) -> &AchievementDefinition {
        // Indices only ever come from iterating this catalogue
        self.catalogue
            .iter()
            .nth(index)
            .unwrap_or_else(|| unreachable!("achievement index {index} out of range"))
    }
}

impl Default for BadgeEngine {
    fn default() -> Self {
        Self::new(Catalogue::builtin())
    }
}

impl fmt::Debug for BadgeEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BadgeEngine")
            .field("achievements", &self.catalogue.len())
            .field("learners", &self.unlocked.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
