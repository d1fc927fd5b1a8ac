//! Streak tracking system
//!
//! Tracks consecutive calendar days with learning activity.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Daily learning streak
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningStreak {
    pub current: u32,
    pub longest: u32,
    /// None until the first session
    pub last_active_date: Option<NaiveDate>,
}

impl LearningStreak {
    /// Check if the streak is still alive (activity today or yesterday)
    pub fn is_active(&self, today: NaiveDate) -> bool {
        let Some(last_date) = self.last_active_date else {
            return false;
        };

        let days_since = (today - last_date).num_days();
        (0..=1).contains(&days_since)
    }
}

/// Advance a streak for activity on `today`.
///
/// Same-day activity leaves the streak untouched. The day right after the last
/// active date extends it; anything else (a gap, a date in the past, or no
/// previous activity) starts a new run of one.
pub fn advance_streak(streak: &LearningStreak, today: NaiveDate) -> LearningStreak {
    let Some(last_date) = streak.last_active_date else {
        return LearningStreak {
            current: 1,
            longest: streak.longest.max(1),
            last_active_date: Some(today),
        };
    };

    match (today - last_date).num_days() {
        0 => streak.clone(),
        1 => {
            let current = streak.current + 1;
            LearningStreak {
                current,
                longest: streak.longest.max(current),
                last_active_date: Some(today),
            }
        }
        _ => LearningStreak {
            current: 1,
            // longest >= current must hold even on a fresh or corrupted record
            longest: streak.longest.max(1),
            last_active_date: Some(today),
        },
    }
}

/// Today's date in the learner's local calendar
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn streak(current: u32, longest: u32, last: u32) -> LearningStreak {
        LearningStreak {
            current,
            longest,
            last_active_date: Some(day(last)),
        }
    }

    #[test]
    fn test_continuation() {
        let next = advance_streak(&streak(3, 5, 5), day(6));
        assert_eq!(next, streak(4, 5, 6));
    }

    #[test]
    fn test_continuation_raises_longest() {
        let next = advance_streak(&streak(5, 5, 5), day(6));
        assert_eq!(next, streak(6, 6, 6));
    }

    #[test]
    fn test_reset_after_gap() {
        let next = advance_streak(&streak(3, 5, 5), day(10));
        assert_eq!(next, streak(1, 5, 10));
    }

    #[test]
    fn test_same_day_is_unchanged() {
        let s = streak(3, 5, 5);
        assert_eq!(advance_streak(&s, day(5)), s);
    }

    #[test]
    fn test_date_in_the_past_resets() {
        let next = advance_streak(&streak(3, 5, 5), day(2));
        assert_eq!(next, streak(1, 5, 2));
    }

    #[test]
    fn test_first_activity_starts_streak() {
        let next = advance_streak(&LearningStreak::default(), day(1));
        assert_eq!(next, streak(1, 1, 1));
    }

    #[test]
    fn test_longest_never_below_current() {
        let days = [1, 2, 3, 3, 7, 8, 2, 3, 4, 5, 6, 20, 21];
        let mut s = LearningStreak::default();
        for d in days {
            s = advance_streak(&s, day(d));
            assert!(s.longest >= s.current, "invariant broken at day {}", d);
        }
        assert_eq!(s.longest, 5);
        assert_eq!(s.current, 2);
    }

    #[test]
    fn test_is_active() {
        let s = streak(2, 2, 5);
        assert!(s.is_active(day(5)));
        assert!(s.is_active(day(6)));
        assert!(!s.is_active(day(7)));
        assert!(!LearningStreak::default().is_active(day(5)));
    }
}
