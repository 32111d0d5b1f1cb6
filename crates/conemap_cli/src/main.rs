//! conemap CLI: required-time propagation for mapped AIGs.
//!
//! Provides `conemap required` to propagate required times through a mapped
//! network read from JSON, and `conemap check-config` to validate a
//! `conemap.toml` without running anything.

#![warn(missing_docs)]

mod check_config;
mod required;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// conemap: required times for priority-cut mapped networks.
#[derive(Parser, Debug)]
#[command(name = "conemap", version, about = "Required-time propagation for mapped AIGs")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to the `conemap.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Propagate required times through a mapped network.
    Required(RequiredArgs),
    /// Load and validate the configuration file.
    CheckConfig,
}

/// Arguments for the `conemap required` subcommand.
#[derive(Parser, Debug)]
pub struct RequiredArgs {
    /// Mapped network in JSON form.
    pub network: PathBuf,

    /// Output format for the report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Re-derive the result independently and fail on any inconsistency.
    #[arg(long)]
    pub check: bool,
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

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable table.
    Text,
    /// Machine-readable JSON.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Configuration file to load.
    pub config: PathBuf,
}

impl GlobalArgs {
    fn from_cli(cli: &Cli) -> Self {
        let color = match cli.color {
            ColorChoice::Auto => std::env::var_os("TERM").is_some_and(|t| t != "dumb"),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };
        Self {
            quiet: cli.quiet,
            color,
            config: cli
                .config
                .clone()
                .unwrap_or_else(|| PathBuf::from(conemap_config::CONFIG_FILE_NAME)),
        }
    }
}

fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    let global = GlobalArgs::from_cli(&cli);

    let result = match cli.command {
        Command::Required(ref args) => required::run(args, &global),
        Command::CheckConfig => check_config::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
