//! Check outcomes and run reporting.
//!
//! Each check produces an outcome independently of the others. A check may
//! additionally be declared as expected to fail; the expectation is an
//! explicit tag on the result, so an expected mismatch is recorded without
//! failing the run and an unexpected pass stays visible.

use std::fmt;
use tracing::{info, warn};

/// What a single check observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Passed,

    /// The check ran and its assertion did not hold.
    Failed(String),

    /// A precondition was not met; the check did not run.
    Skipped(String),
}

/// Declared expectation for a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    Pass,

    /// The check ordinarily fails; a failure is not a regression.
    Fail,
}

/// Terminal status of a check, derived from outcome and expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Passed,
    Failed,
    Skipped,

    /// Failed, but was declared expected to fail.
    ExpectedFailure,

    /// Passed despite being declared expected to fail.
    UnexpectedPass,
}

/// Result of one check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub expectation: Expectation,
    pub outcome: CheckOutcome,
}

impl CheckResult {
    pub fn new(name: &'static str, expectation: Expectation, outcome: CheckOutcome) -> Self {
        Self {
            name,
            expectation,
            outcome,
        }
    }

    /// Derive the terminal status. Skips dominate: a check that never ran
    /// has nothing to hold an expectation against.
    pub fn status(&self) -> CheckStatus {
        match (&self.outcome, self.expectation) {
            (CheckOutcome::Skipped(_), _) => CheckStatus::Skipped,
            (CheckOutcome::Passed, Expectation::Pass) => CheckStatus::Passed,
            (CheckOutcome::Failed(_), Expectation::Pass) => CheckStatus::Failed,
            (CheckOutcome::Failed(_), Expectation::Fail) => CheckStatus::ExpectedFailure,
            (CheckOutcome::Passed, Expectation::Fail) => CheckStatus::UnexpectedPass,
        }
    }

    /// Reason attached to a failed or skipped outcome.
    pub fn detail(&self) -> Option<&str> {
        match &self.outcome {
            CheckOutcome::Passed => None,
            CheckOutcome::Failed(reason) | CheckOutcome::Skipped(reason) => Some(reason),
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.status() {
            CheckStatus::Passed => "passed",
            CheckStatus::Failed => "FAILED",
            CheckStatus::Skipped => "skipped",
            CheckStatus::ExpectedFailure => "expected failure",
            CheckStatus::UnexpectedPass => "UNEXPECTED PASS",
        };

        match self.detail() {
            Some(detail) => write!(f, "{}: {} ({})", self.name, status, detail),
            None => write!(f, "{}: {}", self.name, status),
        }
    }
}

/// Results of one verification run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    results: Vec<CheckResult>,
}

impl RunReport {
    /// Record one check result.
    pub fn push(&mut self, result: CheckResult) {
        info!("{}", result);

        if result.status() == CheckStatus::UnexpectedPass {
            warn!(
                check = result.name,
                "check passed despite being declared expected to fail"
            );
        }

        self.results.push(result);
    }

    /// All recorded results, in execution order.
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    /// Look up a check result by name.
    pub fn result(&self, name: &str) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// True when any check failed outright. Expected failures and
    /// unexpected passes do not fail a run.
    pub fn failed(&self) -> bool {
        self.results
            .iter()
            .any(|r| r.status() == CheckStatus::Failed)
    }

    /// Check results that passed despite an expected-failure declaration.
    pub fn unexpected_passes(&self) -> impl Iterator<Item = &CheckResult> {
        self.results
            .iter()
            .filter(|r| r.status() == CheckStatus::UnexpectedPass)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            writeln!(f, "{}", result)?;
        }
        Ok(())
    }
}
