//! Run configuration for tally.

use tally_core::Tolerance;

/// Run configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// How much the console reporter prints per method
    pub verbosity: Verbosity,
    /// Stop the run after the first method that fails it
    pub fail_fast: bool,
    /// Failed assertions return `Err` instead of being recorded softly
    pub stop_on_first_failure: bool,
    /// Keep only methods whose `Case::method` path contains this text
    pub keyword: Option<String>,
    /// Case or method selectors; empty selects everything
    pub scopes: Vec<String>,
    pub format: OutputFormat,
    /// Emit ANSI colors in human output
    pub color: bool,
    /// Print elapsed times in the summary
    pub show_timing: bool,
    /// Tolerance used by `assert_approx_eq`
    pub tolerance: Tolerance,
}

/// Console output detail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Summary only
    Quiet,
    /// One status character per method
    #[default]
    Normal,
    /// One line per method
    Verbose,
}

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Normal,
            fail_fast: false,
            stop_on_first_failure: false,
            keyword: None,
            scopes: Vec::new(),
            format: OutputFormat::Human,
            color: true,
            show_timing: true,
            tolerance: Tolerance::default(),
        }
    }
}

impl RunConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn with_stop_on_first_failure(mut self, stop: bool) -> Self {
        self.stop_on_first_failure = stop;
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Hide elapsed times, for deterministic output
    pub fn with_timing(mut self, show_timing: bool) -> Self {
        self.show_timing = show_timing;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }
}
