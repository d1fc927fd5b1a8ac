//! Badges command implementation

use anyhow::Result;

use super::Session;

/// List achievements grouped by category, with progress bars for locked ones
pub fn badges_command(session: &Session, unlocked_only: bool) -> Result<()> {
    let stats = session.stats();
    let rows = session.engine().all_progress(session.learner_id(), &stats);

    let unlocked = rows.iter().filter(|(_, p)| p.unlocked).count();
    println!("Achievements ({} / {}):\n", unlocked, rows.len());

    let mut last_category = None;
    for (achievement, progress) in rows {
        if unlocked_only && !progress.unlocked {
            continue;
        }

        if last_category != Some(achievement.category) {
            println!("  {}", achievement.category.label());
            last_category = Some(achievement.category);
        }

        let marker = if progress.unlocked { "✓" } else { " " };
        println!(
            "    [{}] {} {} ({}, +{} XP) - {}",
            marker,
            achievement.icon,
            achievement.name,
            achievement.rarity.label(),
            achievement.xp_reward(),
            achievement.description
        );

        if !progress.unlocked {
            println!(
                "        {} {:.0} / {:.0}",
                bar(progress.percentage),
                progress.current,
                progress.total
            );
        }
    }

    Ok(())
}

fn bar(percentage: f64) -> String {
    const WIDTH: usize = 20;
    let filled = ((percentage / 100.0) * WIDTH as f64).round() as usize;
    let filled = filled.min(WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(WIDTH - filled))
}
