//! Placer CLI, the command-line front end of the placement engine.
//!
//! Provides `placer run` to place a JSON problem, `placer check` to validate
//! one without simulating, and `placer init-config` to write a default
//! `placer.toml`.

#![warn(missing_docs)]

mod check;
mod init;
mod problem;
mod run;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Placer, a force-directed component placer.
#[derive(Parser, Debug)]
#[command(name = "placer", version, about = "Force-directed component placement")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Also print notes (phase transitions, run summary).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Place the components of a JSON problem file.
    Run(RunArgs),
    /// Validate a problem file and configuration without placing.
    Check(CheckArgs),
    /// Write a `placer.toml` holding the default configuration.
    InitConfig {
        /// Destination path.
        #[arg(default_value = placer_config::CONFIG_FILE_NAME)]
        path: String,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Arguments for the `placer run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Problem file (JSON placement input).
    pub problem: String,

    /// Path to a `placer.toml`; defaults to one in the current directory.
    #[arg(short, long)]
    pub config: Option<String>,

    /// Seed for the initial scatter, overriding the configuration.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Total iterations, overriding the configuration.
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Start unlocked components from the positions of an earlier outcome.
    #[arg(long)]
    pub initial: Option<String>,

    /// Write the outcome JSON here instead of stdout.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format for diagnostics and results.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Skip collision resolution.
    #[arg(long)]
    pub no_collision: bool,
}

/// Arguments for the `placer check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Problem file (JSON placement input).
    pub problem: String,

    /// Path to a `placer.toml`; defaults to one in the current directory.
    #[arg(short, long)]
    pub config: Option<String>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print notes as well as warnings.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => {
            std::env::var_os("NO_COLOR").is_none() && std::env::var_os("TERM").is_some()
        }
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
    };

    let result = match cli.command {
        Command::Run(ref args) => run::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
        Command::InitConfig { ref path, force } => init::run(path, force, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
