//! Export, import and reset commands

use std::path::Path;

use anyhow::{bail, Context, Result};

use super::Session;

pub fn export_command(session: &Session, output: Option<&Path>) -> Result<()> {
    let text = session.export().context("Failed to serialize progress")?;

    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write export: {}", path.display()))?;
            println!("Progress exported to {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

pub fn import_command(session: &mut Session, file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read import file: {}", file.display()))?;

    if !session.import(&text) {
        bail!("Import failed: {} is not a valid progress export", file.display());
    }

    let state = session.state();
    println!(
        "Progress imported: level {}, {} XP, {} achievement(s)",
        state.level(),
        state.experience(),
        state.achievements.len()
    );
    Ok(())
}

pub fn reset_command(session: &mut Session, yes: bool) -> Result<()> {
    if !yes {
        println!(
            "This erases all progress for learner {}. Re-run with --yes to confirm.",
            session.learner_id()
        );
        return Ok(());
    }

    session.reset();
    println!("Progress reset.");
    Ok(())
}
