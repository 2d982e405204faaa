//! Warden CLI - plays a match over stdin/stdout or analyzes a recording.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Warden - geometric threat engine for an arena-control bot
#[derive(Parser, Debug)]
#[command(name = "warden")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log format on stderr
    #[arg(long, global = true, default_value = "compact")]
    log_format: cli::LogFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a match, reading the referee on stdin and answering on stdout
    Play {
        /// Ruleset overrides (JSON)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Save a recording of the match when input ends
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Report threats to my base for every turn of a recording
    Analyze {
        /// Recording file (.json)
        #[arg(required = true)]
        recording: PathBuf,

        /// Re-evaluate with these rules instead of the recorded ones
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::ReportFormat,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    cli::init_tracing(args.log_format);

    let result = match args.command {
        Commands::Play { rules, save } => cli::play::execute(rules.as_deref(), save.as_deref()),
        Commands::Analyze {
            recording,
            rules,
            format,
        } => cli::analyze::execute(&recording, rules.as_deref(), format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "warden failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
