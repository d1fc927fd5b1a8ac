//! Integration tests for custom achievement catalogues driving a session

mod common;

use learnquest::gamification::{BadgeEngine, Catalogue, CatalogueError, Requirement};
use learnquest::progress::ProgressAction;

use common::{at, complete_concept, day, memory_session, LEARNER};

const CATALOGUE: &str = r#"
[[achievement]]
id = "three_days"
name = "Three Days"
description = "Learn three days in a row"
rarity = "common"
category = "dedication"
requirement = { kind = "streak", target = 3, consecutive_only = true }

[[achievement]]
id = "best_streak"
name = "Best Streak"
description = "Reach a three day streak once"
rarity = "uncommon"
category = "dedication"
requirement = { kind = "streak", target = 3 }

[[achievement]]
id = "mentor"
name = "Mentor"
description = "Review someone's code"
rarity = "rare"
category = "community"
requirement = { kind = "peer_review", target = 1 }

[[achievement]]
id = "rustacean"
name = "Rustacean"
description = "Reach 80 in ownership"
rarity = "epic"
category = "mastery"
requirement = { kind = "skill_mastery", target = 80.0, skill = "ownership" }
"#;

fn session() -> learnquest::LearnerSession<learnquest::storage::MemoryStore> {
    let catalogue = Catalogue::from_toml_str(CATALOGUE).expect("catalogue parses");
    memory_session(BadgeEngine::new(catalogue))
}

fn start(d: u32) -> ProgressAction {
    ProgressAction::StartSession { at: at(d), today: day(d) }
}

#[test]
fn test_catalogue_keeps_unknown_kinds() {
    let catalogue = Catalogue::from_toml_str(CATALOGUE).unwrap();
    assert_eq!(catalogue.len(), 4);
    assert_eq!(catalogue.get("mentor").unwrap().requirement, Requirement::Unknown);
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let doubled = format!("{}{}", CATALOGUE, CATALOGUE);
    let err = Catalogue::from_toml_str(&doubled).unwrap_err();
    assert!(matches!(err, CatalogueError::DuplicateId(id) if id == "three_days"));
}

#[test]
fn test_streak_badges_unlock_on_third_day() {
    let mut session = session();

    assert!(session.dispatch(start(1)).is_empty());
    assert!(session.dispatch(start(2)).is_empty());
    // A second session on the same day does not extend the streak
    assert!(session.dispatch(start(2)).is_empty());
    assert_eq!(session.state().streak.current, 2);

    let events = session.dispatch(start(3));
    let ids: Vec<&str> = events.iter().map(|e| e.achievement_id.as_str()).collect();
    assert_eq!(ids, vec!["three_days", "best_streak"]);
    assert_eq!(session.state().experience(), 10 + 25);
}

#[test]
fn test_unknown_kind_never_unlocks() {
    let mut session = session();
    for d in 1..=10 {
        session.dispatch(start(d));
        session.dispatch(complete_concept(&format!("c{}", d), Some(30), d));
    }

    assert!(!session.engine().is_unlocked(LEARNER, "mentor"));
    let progress = session.progress_towards("mentor").unwrap();
    assert_eq!(progress.percentage, 0.0);
}

#[test]
fn test_single_skill_mastery() {
    let mut session = session();

    let events = session.dispatch(ProgressAction::UpdateSkill {
        skill_id: "lifetimes".to_string(),
        level: 95.0,
    });
    assert!(events.is_empty());

    let events = session.dispatch(ProgressAction::UpdateSkill {
        skill_id: "ownership".to_string(),
        level: 80.0,
    });
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].achievement_id, "rustacean");
    assert_eq!(events[0].xp_gained, 100);
}
