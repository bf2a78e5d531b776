//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::io::Write;

use crate::case::Marker;
use crate::config::{OutputFormat, RunConfig};
use crate::registry::{Registry, Scope};
use crate::reporter::{ConsoleReporter, JsonReporter};
use crate::result::RunResult;
use crate::runner::Runner;

use super::{CliError, CliResult, ExitCode};

/// Run the selected methods and report them in the configured format.
pub fn run_suites(registry: &Registry, config: &RunConfig) -> CliResult<ExitCode> {
    let scopes = parse_scopes(registry, &config.scopes)?;
    tracing::debug!(scopes = scopes.len(), keyword = ?config.keyword, "starting run");

    let runner = Runner::new(config.clone());
    let result = match config.format {
        OutputFormat::Human => {
            let mut reporter = ConsoleReporter::stdout(config.verbosity)
                .with_color(config.color)
                .with_timing(config.show_timing);
            let result = runner.run(registry, &mut reporter);
            reporter.into_inner().map_err(write_error)?;
            result
        }
        OutputFormat::Json => {
            let mut reporter = JsonReporter::stdout().with_timing(config.show_timing);
            let result = runner.run(registry, &mut reporter);
            reporter.into_inner().map_err(write_error)?;
            result
        }
    };

    Ok(exit_code(&result))
}

/// Print `Case::method` for every selected method, with its marker.
pub fn list_suites(
    registry: &Registry,
    scopes: &[String],
    keyword: Option<&str>,
    out: &mut impl Write,
) -> CliResult<ExitCode> {
    let scopes = parse_scopes(registry, scopes)?;
    let selected = registry.select(&scopes, keyword);
    if selected.is_empty() {
        writeln!(out, "No tests collected").map_err(write_error)?;
        return Ok(ExitCode::SUCCESS);
    }

    for item in &selected {
        let case = registry
            .suites()
            .get(item.suite)
            .map(|s| s.name())
            .unwrap_or_default();
        let marker = match &item.info.marker {
            Marker::None => String::new(),
            Marker::Skip(reason) => format!(" [skip: {reason}]"),
            Marker::ExpectedFailure(reason) if reason.is_empty() => " [expected failure]".to_string(),
            Marker::ExpectedFailure(reason) => format!(" [expected failure: {reason}]"),
        };
        writeln!(out, "{case}::{}{marker}", item.info.name).map_err(write_error)?;
    }
    let noun = if selected.len() == 1 { "test" } else { "tests" };
    writeln!(out, "\n{} {noun} collected", selected.len()).map_err(write_error)?;
    Ok(ExitCode::SUCCESS)
}

/// 0 when the run was successful, 1 otherwise.
pub fn exit_code(result: &RunResult) -> ExitCode {
    if result.was_successful() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn parse_scopes(registry: &Registry, scopes: &[String]) -> CliResult<Vec<Scope>> {
    let scopes: Vec<Scope> = scopes.iter().map(|s| Scope::parse(s)).collect();
    if let Some(unknown) = registry.unknown_scopes(&scopes).first() {
        return Err(CliError::usage(format!("Error: no test case named '{}'", unknown.case)));
    }
    Ok(scopes)
}

fn write_error(err: std::io::Error) -> CliError {
    CliError::failure(format!("Error writing report: {err}"))
}
