//! `mfc`: run missing-file checks from the command line
//!
//! Exit codes: 0 when nothing needs attention, 1 on errors or an invalid
//! config, 2 when the check found missed or failed files.

mod commands;
mod display;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use commands::{Outcome, ScanArgs};

#[derive(Debug, Parser)]
#[command(
    name = "mfc",
    version,
    about = "Find files a scan should have covered but did not"
)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a check and report missing files
    Scan(ScanArgs),

    /// Load and validate a task config without fetching anything
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Write a starter task config
    Init {
        #[arg(short, long, default_value = "mfc-task.yaml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn log_filter(verbose: u8, quiet: bool) -> EnvFilter {
    let default = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };
    EnvFilter::try_from_env("MFC_LOG").unwrap_or_else(|_| EnvFilter::new(default))
}

fn init_tracing(verbose: u8, quiet: bool) {
    // stdout carries results; logs go to stderr
    tracing_subscriber::registry()
        .with(log_filter(verbose, quiet))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<Outcome> {
    match cli.command {
        Command::Scan(args) => commands::scan(&args, cli.json).await,
        Command::Validate { config } => commands::validate(&config, cli.json),
        Command::Init { output, force } => commands::init(&output, force),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(outcome) => outcome.into(),
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_flags() {
        let cli = Cli::try_parse_from([
            "mfc", "-vv", "--json", "scan", "--config", "task.yaml", "--no-parallel", "-o", "out.json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
        match cli.command {
            Command::Scan(args) => {
                assert_eq!(args.config, PathBuf::from("task.yaml"));
                assert_eq!(args.output, Some(PathBuf::from("out.json")));
                assert!(args.no_parallel);
                assert!(!args.no_analysis);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_scan_requires_config() {
        assert!(Cli::try_parse_from(["mfc", "scan"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["mfc", "-q", "-v", "validate", "-c", "t.yaml"]).is_err());
    }

    #[test]
    fn test_init_default_output() {
        let cli = Cli::try_parse_from(["mfc", "init"]).unwrap();
        match cli.command {
            Command::Init { output, force } => {
                assert_eq!(output, PathBuf::from("mfc-task.yaml"));
                assert!(!force);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
