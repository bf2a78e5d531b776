//! CLI module for tally
//!
//! ## Commands
//!
//! - `run [SCOPE]...` - Run the registered suites (the default when no subcommand is given)
//! - `list [SCOPE]...` - List the selected methods and their markers
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()`/`run_with()` functions handle errors and exit.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{OutputFormat, RunConfig, Verbosity};
use crate::registry::Registry;
use crate::samples;
use crate::version::TALLY_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create a usage error (exit code 2).
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode(2))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// A minimal unittest-style test runner
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(version = TALLY_VERSION)]
#[command(about = "Run unittest-style test cases", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Options for the default `run` action
    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run test cases
    Run(RunArgs),

    /// List the selected test methods without running them
    List {
        /// Case (`Case`) or method (`Case::method`, `Case.method`) to list
        #[arg(value_name = "SCOPE")]
        scopes: Vec<String>,
        /// Filter methods by keyword
        #[arg(short = 'k', value_name = "EXPR")]
        keyword: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Case (`Case`) or method (`Case::method`, `Case.method`) to run
    #[arg(value_name = "SCOPE")]
    pub scopes: Vec<String>,

    /// One line per test method
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Print failures and the summary, no per-method progress
    #[arg(short, long)]
    pub quiet: bool,

    /// Stop the run on the first failure or error
    #[arg(short = 'x', long = "failfast")]
    pub fail_fast: bool,

    /// Only run methods whose `Case::method` path contains EXPR
    #[arg(short = 'k', value_name = "EXPR")]
    pub keyword: Option<String>,

    /// Report format
    #[arg(long, value_enum, default_value_t = FormatArg::Human)]
    pub format: FormatArg,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// End a test method at its first failed assertion
    #[arg(long)]
    pub stop_on_first_failure: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatArg {
    #[default]
    Human,
    Json,
}

impl RunArgs {
    /// Map the flags onto a [`RunConfig`].
    pub fn to_config(&self) -> RunConfig {
        let verbosity = if self.verbose {
            Verbosity::Verbose
        } else if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        };
        let format = match self.format {
            FormatArg::Human => OutputFormat::Human,
            FormatArg::Json => OutputFormat::Json,
        };
        let mut config = RunConfig::new()
            .with_verbosity(verbosity)
            .with_fail_fast(self.fail_fast)
            .with_stop_on_first_failure(self.stop_on_first_failure)
            .with_scopes(self.scopes.iter().cloned())
            .with_format(format)
            .with_color(!self.no_color);
        if let Some(keyword) = &self.keyword {
            config = config.with_keyword(keyword.clone());
        }
        config
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point, running the sample suites.
pub fn run() {
    run_with(samples::suites::registry());
}

/// CLI entry point for a caller-provided registry.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run_with(registry: Registry) {
    let cli = Cli::parse();

    match execute(cli, &registry) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli, registry: &Registry) -> CliResult<ExitCode> {
    match cli.command {
        Some(Command::Run(args)) => commands::run_suites(registry, &args.to_config()),
        Some(Command::List { scopes, keyword }) => {
            let mut out = std::io::stdout();
            commands::list_suites(registry, &scopes, keyword.as_deref(), &mut out)
        }
        None => commands::run_suites(registry, &cli.run.to_config()),
    }
}

// ============================================================================
// Tests
// ============================================================================
