//! Kwoon - Wing Chun training tracker
//!
//! Usage:
//!   kwoon init --name <NAME>     - Create a profile
//!   kwoon status                 - Belt, XP, stamina and today's challenge
//!   kwoon activities             - Activities open at the current belt
//!   kwoon train <activity>       - Complete one activity
//!   kwoon daily [--complete]     - Show or train today's challenge
//!   kwoon plan list|show|run     - Recommended and custom plans
//!   kwoon achievements           - Unlocked and pending achievements
//!   kwoon import|export          - Move a profile between machines
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  main.rs (this file) - Config, logging and command dispatch     │
//! │    │                                                            │
//! │    ├── context.rs: wires Dojo + JsonFileProfileRepository       │
//! │    └── commands/: one struct per subcommand                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod commands;
mod context;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::{
    AchievementsCommand, ActivitiesCommand, AvatarCommand, DailyCommand, EditCommand,
    ExportCommand, ImportCommand, InitCommand, PlanCommand, ResetCommand, StatusCommand,
    ThemeCommand, TrainCommand,
};
use context::Context;
use shared::KwoonConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kwoon")]
#[command(about = "Kwoon - Track your Wing Chun training, belts and streaks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the profile location
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new profile
    Init(InitCommand),
    /// Show belt, XP, stamina and today's challenge
    Status(StatusCommand),
    /// Change name, body metrics or avatar
    Edit(EditCommand),
    /// List activities
    Activities(ActivitiesCommand),
    /// Complete a single activity
    Train(TrainCommand),
    /// Today's challenge and streak
    Daily(DailyCommand),
    /// Training plans and sessions
    Plan(PlanCommand),
    /// List achievements
    Achievements(AchievementsCommand),
    /// Replace the profile with an exported document
    Import(ImportCommand),
    /// Print or save the profile document
    Export(ExportCommand),
    /// Show or switch the theme
    Theme(ThemeCommand),
    /// Show or switch the avatar
    Avatar(AvatarCommand),
    /// Delete the profile
    Reset(ResetCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = KwoonConfig::load(cli.config.as_deref())?;
    if let Some(profile) = cli.profile {
        config.profile_path = profile;
    }

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let (mut ctx, opened) = Context::open(&config, cli.json)?;
    if !cli.json && !matches!(cli.command, Commands::Export(_)) {
        ctx.report(&opened)?;
    }

    match cli.command {
        Commands::Init(cmd) => cmd.run(&mut ctx),
        Commands::Status(cmd) => cmd.run(&mut ctx),
        Commands::Edit(cmd) => cmd.run(&mut ctx),
        Commands::Activities(cmd) => cmd.run(&mut ctx),
        Commands::Train(cmd) => cmd.run(&mut ctx),
        Commands::Daily(cmd) => cmd.run(&mut ctx),
        Commands::Plan(cmd) => cmd.run(&mut ctx),
        Commands::Achievements(cmd) => cmd.run(&mut ctx),
        Commands::Import(cmd) => cmd.run(&mut ctx),
        Commands::Export(cmd) => cmd.run(&mut ctx),
        Commands::Theme(cmd) => cmd.run(&mut ctx),
        Commands::Avatar(cmd) => cmd.run(&mut ctx),
        Commands::Reset(cmd) => cmd.run(&mut ctx),
    }
}
