//! Topple CLI - run and inspect demolition levels headlessly

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, run};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "topple")]
#[command(about = "Headless runner for physics demolition levels", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a level, firing scripted or auto-play shots
    Run {
        /// Path to level JSON
        level: PathBuf,

        /// Number of 60 Hz frames to simulate
        #[arg(long, default_value = "1200")]
        frames: u32,

        /// Tuning overrides (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Let the auto-play agent choose and fire shots
        #[arg(long)]
        autoplay: bool,

        /// Scripted shots to fire (defaults to all available ammunition)
        #[arg(long)]
        shots: Option<u32>,

        /// How long each scripted shot is charged, in milliseconds
        #[arg(long, default_value = "1200")]
        hold_ms: f64,

        /// Print the final summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Audit a level file without simulating it
    Check {
        /// Path to level JSON
        level: PathBuf,

        /// Fail when the audit reports any issue
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            level,
            frames,
            config,
            autoplay,
            shots,
            hold_ms,
            json,
        } => run::run(run::RunArgs {
            level,
            frames,
            config,
            autoplay,
            shots,
            hold_ms,
            json,
        }),
        Commands::Check { level, strict } => check::run(&level, strict),
    }
}
