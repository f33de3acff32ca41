//! # Result Reporting
//!
//! Reporters receive one [`TestResult`] per executed call, in execution
//! order, followed by a single `flush` once every suite has run.

pub mod console;
pub mod junit;

use crate::domain::TestResult;
use crate::error::ReportError;

pub use console::ConsoleReporter;
pub use junit::JUnitReporter;

pub trait Reporter: Send {
    fn report(&mut self, result: &TestResult);

    fn flush(&mut self) -> Result<(), ReportError>;
}

/// Forwards every result to each inner reporter.
#[derive(Default)]
pub struct MultiReporter {
    reporters: Vec<Box<dyn Reporter>>,
}

impl MultiReporter {
    pub fn new(reporters: Vec<Box<dyn Reporter>>) -> Self {
        Self { reporters }
    }

    pub fn push(&mut self, reporter: Box<dyn Reporter>) {
        self.reporters.push(reporter);
    }
}

impl Reporter for MultiReporter {
    fn report(&mut self, result: &TestResult) {
        for reporter in &mut self.reporters {
            reporter.report(result);
        }
    }

    /// Flushes every reporter even if one fails; the first error is returned.
    fn flush(&mut self) -> Result<(), ReportError> {
        let mut first_error = None;
        for reporter in &mut self.reporters {
            if let Err(err) = reporter.flush() {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Keeps results in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub results: Vec<TestResult>,
    pub flushed: bool,
}

impl Reporter for CollectingReporter {
    fn report(&mut self, result: &TestResult) {
        self.results.push(result.clone());
    }

    fn flush(&mut self) -> Result<(), ReportError> {
        self.flushed = true;
        Ok(())
    }
}
