//! Progress commands: status, sessions, concepts, projects, practice

use anyhow::{bail, Result};

use learnquest::gamification::local_today;
use learnquest::progress::{
    ConceptUpdate, Difficulty, PreferencesUpdate, ProgressAction, ProjectUpdate,
};

use super::{report_level_change, Session};

/// Show the learner's dashboard
pub fn status_command(session: &Session) -> Result<()> {
    let overview = session.overview(local_today());
    let level = &overview.level;

    println!("Learner: {}\n", session.learner_id());
    match level.next_level_xp {
        Some(next) => println!(
            "  Level {} ({}) - {} / {} XP ({:.0}%)",
            level.level,
            level.title,
            level.experience,
            next,
            level.progress_to_next() * 100.0
        ),
        None => println!(
            "  Level {} ({}) - {} XP (max level)",
            level.level, level.title, level.experience
        ),
    }

    let streak_state = if overview.streak_active { "" } else { " (inactive)" };
    println!(
        "  Streak: {} day(s){}, best {}",
        overview.current_streak, streak_state, overview.longest_streak
    );
    println!(
        "  Today: {} / {} min ({:.0}% of daily goal)",
        overview.minutes_today, overview.daily_goal_minutes, overview.daily_goal_percentage
    );
    println!(
        "  Concepts: {} / {}   Projects: {} / {}   Overall: {:.0}%",
        overview.concepts.completed,
        overview.concepts.total,
        overview.projects.completed,
        overview.projects.total,
        overview.overall_percentage
    );
    println!(
        "  Achievements: {} / {}",
        overview.achievements_unlocked,
        session.engine().catalogue().len()
    );

    Ok(())
}

pub fn start_command(session: &mut Session) -> Result<()> {
    let before = session.state().level();
    session.start_session();

    let streak = &session.state().streak;
    println!("Session started. Streak: {} day(s), best {}", streak.current, streak.longest);
    report_level_change(before, session);
    Ok(())
}

pub fn concept_command(session: &mut Session, id: &str, update: ConceptUpdate) -> Result<()> {
    let before_xp = session.state().experience();
    let before = session.state().level();
    session.update_concept(id, update);

    let gained = session.state().experience() - before_xp;
    let completed = session.state().concepts.get(id).is_some_and(|c| c.completed);
    println!(
        "Concept '{}' updated{} (+{} XP)",
        id,
        if completed { ", completed" } else { "" },
        gained
    );
    report_level_change(before, session);
    Ok(())
}

pub fn project_command(
    session: &mut Session,
    id: &str,
    difficulty: Option<&str>,
    complete: bool,
    minutes: Option<u64>,
    steps: Vec<String>,
    score: Option<u8>,
) -> Result<()> {
    let difficulty = match difficulty {
        Some(name) => match Difficulty::from_str(&name.to_lowercase()) {
            Some(d) => Some(d),
            None => bail!(
                "Unknown difficulty: {} (expected beginner, intermediate or advanced)",
                name
            ),
        },
        None => None,
    };

    let before_xp = session.state().experience();
    let before = session.state().level();
    session.update_project(
        id,
        ProjectUpdate {
            started: Some(true),
            completed: complete.then_some(true),
            difficulty,
            time_spent: minutes,
            score,
            steps_completed: steps,
            notes_count: None,
        },
    );

    let gained = session.state().experience() - before_xp;
    if let Some(project) = session.state().projects.get(id) {
        println!(
            "Project '{}' [{}]: {} step(s) done{} (+{} XP)",
            id,
            project.difficulty.as_str(),
            project.completed_steps.len(),
            if project.completed { ", completed" } else { "" },
            gained
        );
    }
    report_level_change(before, session);
    Ok(())
}

pub fn log_command(session: &mut Session, minutes: u64) -> Result<()> {
    if !session.state().preferences.tracking_enabled {
        println!("Time tracking is disabled (enable with `learnquest prefs --tracking true`).");
        return Ok(());
    }

    session.log_minutes(minutes);
    let overview = session.overview(local_today());
    println!(
        "Logged {} min. Today: {} / {} min ({:.0}%)",
        minutes, overview.minutes_today, overview.daily_goal_minutes, overview.daily_goal_percentage
    );
    Ok(())
}

pub fn practice_command(session: &mut Session, lines: u64, error_free: bool) -> Result<()> {
    let before = session.state().level();
    session.dispatch(ProgressAction::RecordPractice {
        lines_of_code: lines,
        error_free,
    });

    let practice = &session.state().practice;
    println!(
        "Practice recorded. Total lines: {}, error-free sessions: {}",
        practice.lines_of_code, practice.error_free_sessions
    );
    report_level_change(before, session);
    Ok(())
}

pub fn skill_command(session: &mut Session, id: &str, level: f64) -> Result<()> {
    if !level.is_finite() {
        bail!("Skill level must be a number between 0 and 100");
    }

    let before = session.state().level();
    session.dispatch(ProgressAction::UpdateSkill {
        skill_id: id.to_string(),
        level,
    });

    let stats = session.stats();
    println!(
        "Skill '{}' set to {:.0}. Average skill level: {:.1}",
        id,
        stats.skill_levels.get(id).copied().unwrap_or(0.0),
        stats.average_skill_level()
    );
    report_level_change(before, session);
    Ok(())
}

pub fn prefs_command(
    session: &mut Session,
    goal: Option<u32>,
    notifications: Option<bool>,
    tracking: Option<bool>,
) -> Result<()> {
    session.dispatch(ProgressAction::UpdatePreferences(PreferencesUpdate {
        daily_goal_minutes: goal,
        notifications_enabled: notifications,
        tracking_enabled: tracking,
    }));

    let prefs = &session.state().preferences;
    println!("Daily goal: {} min", prefs.daily_goal_minutes);
    println!("Notifications: {}", if prefs.notifications_enabled { "on" } else { "off" });
    println!("Time tracking: {}", if prefs.tracking_enabled { "on" } else { "off" });
    Ok(())
}
