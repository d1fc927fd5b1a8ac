use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use learnquest::config::Config;

mod cli;

#[derive(Parser)]
#[command(name = "learnquest")]
#[command(about = "Learnquest - track learning progress, XP, streaks and achievements")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.learnquest/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Act as this learner instead of the configured one
    #[arg(short, long, global = true)]
    learner: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a config file with a fresh learner id
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show level, streak, daily goal and completion
    Status,

    /// Start a learning session (advances the daily streak)
    Start,

    /// Record progress on a concept
    Concept {
        /// Concept id
        id: String,

        /// Mark the concept as completed
        #[arg(long)]
        complete: bool,

        /// Total minutes spent on the concept so far
        #[arg(long)]
        minutes: Option<u64>,

        /// Quiz score (0-100)
        #[arg(long)]
        score: Option<u8>,

        /// Completed exercise id (repeatable)
        #[arg(long = "exercise")]
        exercises: Vec<String>,

        /// Number of notes taken
        #[arg(long)]
        notes: Option<u32>,
    },

    /// Record progress on a project
    Project {
        /// Project id
        id: String,

        /// beginner, intermediate or advanced
        #[arg(long)]
        difficulty: Option<String>,

        /// Mark the project as completed
        #[arg(long)]
        complete: bool,

        /// Total minutes spent on the project so far
        #[arg(long)]
        minutes: Option<u64>,

        /// Completed step id (repeatable)
        #[arg(long = "step")]
        steps: Vec<String>,

        /// Project score (0-100)
        #[arg(long)]
        score: Option<u8>,
    },

    /// Log minutes spent learning today
    Log {
        minutes: u64,
    },

    /// Record a practice coding session
    Practice {
        /// Lines of code written
        #[arg(long, default_value_t = 0)]
        lines: u64,

        /// The session finished without compiler errors
        #[arg(long)]
        error_free: bool,
    },

    /// Set a skill level (0-100)
    Skill {
        id: String,
        level: f64,
    },

    /// Update learner preferences
    Prefs {
        /// Daily goal in minutes
        #[arg(long)]
        goal: Option<u32>,

        /// Enable or disable unlock notifications
        #[arg(long)]
        notifications: Option<bool>,

        /// Enable or disable time tracking
        #[arg(long)]
        tracking: Option<bool>,
    },

    /// List achievements and progress towards them
    Badges {
        /// Only show unlocked achievements
        #[arg(long)]
        unlocked: bool,
    },

    /// Export progress as JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace progress with a previous export
    Import {
        file: PathBuf,
    },

    /// Erase all progress for the learner
    Reset {
        /// Skip the safety check
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(Config::global_config_path);

    if let Some(Commands::Init { force }) = cli.command {
        init_logging(cli.verbose, "info");
        return cli::init::init_command(&config_path, force);
    }

    let first_run = !config_path.exists();
    let config = Config::load_or_init(&config_path)?;
    init_logging(cli.verbose, &config.logging.level);
    if first_run {
        tracing::info!(
            "Created config at {} for learner {}",
            config_path.display(),
            config.learner.id
        );
    }

    let mut session = cli::open_session(&config, &config_path, cli.learner)?;

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Init { .. } => unreachable!("handled before loading config"),
        Commands::Status => cli::progress::status_command(&session),
        Commands::Start => cli::progress::start_command(&mut session),
        Commands::Concept {
            id,
            complete,
            minutes,
            score,
            exercises,
            notes,
        } => {
            let update = learnquest::progress::ConceptUpdate {
                completed: complete.then_some(true),
                time_spent: minutes,
                score,
                exercises_completed: exercises,
                notes_count: notes,
            };
            cli::progress::concept_command(&mut session, &id, update)
        }
        Commands::Project {
            id,
            difficulty,
            complete,
            minutes,
            steps,
            score,
        } => cli::progress::project_command(
            &mut session,
            &id,
            difficulty.as_deref(),
            complete,
            minutes,
            steps,
            score,
        ),
        Commands::Log { minutes } => cli::progress::log_command(&mut session, minutes),
        Commands::Practice { lines, error_free } => {
            cli::progress::practice_command(&mut session, lines, error_free)
        }
        Commands::Skill { id, level } => cli::progress::skill_command(&mut session, &id, level),
        Commands::Prefs {
            goal,
            notifications,
            tracking,
        } => cli::progress::prefs_command(&mut session, goal, notifications, tracking),
        Commands::Badges { unlocked } => cli::badges::badges_command(&session, unlocked),
        Commands::Export { output } => cli::transfer::export_command(&session, output.as_deref()),
        Commands::Import { file } => cli::transfer::import_command(&mut session, &file),
        Commands::Reset { yes } => cli::transfer::reset_command(&mut session, yes),
    }
}

/// Initialize logging: RUST_LOG wins, then --verbose, then the configured level
fn init_logging(verbose: bool, configured: &str) {
    let log_level = if verbose { "debug" } else { configured };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
