//! Learnquest - progress and achievements for interactive learning
//!
//! Tracks a learner's advancement through lessons and projects and rewards it
//! with experience points, levels, daily streaks and unlockable achievements.
//!
//! ## Layers
//!
//! 1. **Gamification** (`gamification`): pure level and streak math, the
//!    achievement catalogue, and the badge engine that grants unlocks once.
//!
//! 2. **Progress store** (`progress`): the learner's state and the reducer that
//!    is the only way to change it.
//!
//! 3. **Session** (`session`): ties one learner's state, engine and storage
//!    together and keeps them consistent after every transition.

pub mod config;
pub mod gamification;
pub mod progress;
pub mod session;
pub mod storage;

pub use session::LearnerSession;
