//! matlint CLI tool.
//!
//! Usage:
//! ```bash
//! matlint check [OPTIONS] [PATH]
//! matlint list-rules
//! matlint init
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Style checker for MATLAB code
#[derive(Parser)]
#[command(name = "matlint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check MATLAB files against the style rules
    Check {
        /// File or directory to check (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules, by id or name (comma-separated)
        #[arg(long)]
        rules: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Rule preset; overrides the `preset` key of the config
        #[arg(long)]
        preset: Option<String>,

        /// Lowest severity that makes the run fail
        #[arg(long, value_parser = parse_severity)]
        fail_on: Option<matlint_core::Severity>,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON report.
    Json,
    /// One line per finding.
    Compact,
    /// Annotated source snippets.
    Pretty,
}

fn parse_severity(s: &str) -> Result<matlint_core::Severity, String> {
    matlint_core::Severity::parse(s)
        .ok_or_else(|| format!("unknown severity '{s}' (expected must, should, may or info)"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("MATLINT_LOG").unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match dispatch(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:?}");
            ExitCode::from(commands::EXIT_ERROR)
        }
    }
}

fn dispatch(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Check {
            path,
            format,
            rules,
            exclude,
            preset,
            fail_on,
        } => {
            let args = commands::check::CheckArgs {
                path,
                format,
                rules,
                exclude,
                preset,
                fail_on,
            };
            commands::check::run(&args, cli.config.as_deref())
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init { force } => {
            commands::init::run(force)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
