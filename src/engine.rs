//! Multi-source lint runs
//!
//! A [`Linter`] binds a configured rule set to a parser and lints many
//! source units. Units are fully independent: each gets its own tree and
//! its own fresh visitors, so units can run on parallel workers with no
//! shared mutable state, and per-worker results are merged afterwards.
//! There is no mid-traversal cancellation; callers wanting a cutoff check
//! results between sources.

use crate::config::{ConfigDiagnostic, LintConfig};
use crate::lang::{ParseError, SourceParser};
use crate::registry::{ConfiguredRules, Registry, RuleFault, TreeReport};
use crate::violation::{Severity, Violation};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One source unit to lint
#[derive(Debug, Clone)]
pub struct Source {
    /// Name used for exclusion matching and reporting
    pub name: String,
    /// Source text
    pub text: String,
}

impl Source {
    pub fn new(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            text: text.to_string(),
        }
    }
}

/// Violations and faults for one source unit
#[derive(Debug)]
pub struct SourceReport {
    /// Source name
    pub name: String,
    /// Ordered violations for this unit
    pub violations: Vec<Violation>,
    /// Per-rule execution faults for this unit
    pub faults: Vec<RuleFault>,
}

/// A source unit that failed to parse
#[derive(Debug)]
pub struct SourceError {
    pub name: String,
    pub error: ParseError,
}

/// Result of a lint run
#[derive(Debug, Default)]
pub struct LintRun {
    /// Per-source reports, in input order
    pub reports: Vec<SourceReport>,

    /// Sources that failed to parse
    pub parse_errors: Vec<SourceError>,

    /// Sources processed (parsed or not)
    pub sources_processed: usize,

    /// Total error-severity violations
    pub error_count: usize,

    /// Total warning-severity violations
    pub warning_count: usize,

    /// Processing duration
    pub duration: Duration,
}

impl LintRun {
    pub fn has_errors(&self) -> bool {
        self.error_count > 0 || !self.parse_errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count > 0
    }

    /// Check if the run is clean (no violations, parse errors, or faults)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings() && self.faults().next().is_none()
    }

    /// Get exit code (0 = success, 1 = warnings, 2 = errors)
    pub fn exit_code(&self) -> i32 {
        if self.has_errors() {
            2
        } else if self.has_warnings() {
            1
        } else {
            0
        }
    }

    /// All rule faults across sources
    pub fn faults(&self) -> impl Iterator<Item = &RuleFault> {
        self.reports.iter().flat_map(|r| r.faults.iter())
    }

    /// Merge another run into this one
    pub fn merge(&mut self, other: LintRun) {
        self.reports.extend(other.reports);
        self.parse_errors.extend(other.parse_errors);
        self.sources_processed += other.sources_processed;
        self.error_count += other.error_count;
        self.warning_count += other.warning_count;
        self.duration += other.duration;
    }

    fn from_report(name: &str, report: TreeReport) -> Self {
        let error_count = report
            .violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
            .count();
        let warning_count = report.violations.len() - error_count;
        Self {
            reports: vec![SourceReport {
                name: name.to_string(),
                violations: report.violations,
                faults: report.faults,
            }],
            parse_errors: Vec::new(),
            sources_processed: 1,
            error_count,
            warning_count,
            duration: Duration::ZERO,
        }
    }

    fn from_parse_error(name: &str, error: ParseError) -> Self {
        Self {
            reports: Vec::new(),
            parse_errors: vec![SourceError {
                name: name.to_string(),
                error,
            }],
            sources_processed: 1,
            error_count: 0,
            warning_count: 0,
            duration: Duration::ZERO,
        }
    }
}

/// A configured rule set bound to a parser
pub struct Linter {
    configured: ConfiguredRules,
    parser: Arc<dyn SourceParser>,
    parallel: bool,
    jobs: usize,
}

impl Linter {
    /// Resolve `registry` against `config` and bind the result to a
    /// parser. Configuration diagnostics are logged once here and kept
    /// on the linter for callers that want to surface them.
    pub fn new(registry: &Registry, config: &LintConfig, parser: Arc<dyn SourceParser>) -> Self {
        let configured = registry.configured(config);
        for diag in &configured.diagnostics {
            log::warn!("configuration: {}", diag);
        }
        Self {
            configured,
            parser,
            parallel: true,
            jobs: 0,
        }
    }

    /// Enable or disable parallel processing across sources
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the number of parallel jobs (0 = auto-detect)
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Start-up configuration diagnostics for this rule set
    pub fn config_diagnostics(&self) -> &[ConfigDiagnostic] {
        &self.configured.diagnostics
    }

    /// Lint one source unit
    pub fn lint_source(&self, source: &Source) -> LintRun {
        log::debug!("linting `{}`", source.name);
        match self.parser.parse(&source.text) {
            Ok(tree) => {
                let report = self.configured.lint_tree(&tree, &source.name);
                LintRun::from_report(&source.name, report)
            }
            Err(error) => LintRun::from_parse_error(&source.name, error),
        }
    }

    /// Lint multiple source units, in parallel when enabled
    pub fn lint_sources(&self, sources: &[Source]) -> LintRun {
        let start = Instant::now();

        let results: Vec<LintRun> = match self.thread_pool() {
            Some(pool) => {
                pool.install(|| sources.par_iter().map(|s| self.lint_source(s)).collect())
            }
            None => sources.iter().map(|s| self.lint_source(s)).collect(),
        };

        let mut combined = LintRun::default();
        for result in results {
            combined.merge(result);
        }

        combined.duration = start.elapsed();
        combined
    }

    fn thread_pool(&self) -> Option<rayon::ThreadPool> {
        if !self.parallel {
            return None;
        }
        let threads = if self.jobs > 0 {
            self.jobs
        } else {
            num_cpus::get()
        };
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => Some(pool),
            Err(e) => {
                log::warn!("thread pool unavailable, linting serially: {}", e);
                None
            }
        }
    }
}
