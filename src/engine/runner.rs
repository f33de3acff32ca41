use tracing::{info, instrument};

use crate::config::RunConfig;
use crate::domain::{Suite, TestResult};
use crate::engine::call::CallExecutor;
use crate::environment::VariableStore;
use crate::error::ReportError;
use crate::http::Transport;
use crate::report::Reporter;

/// Totals for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped_cases: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn success(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, result: &TestResult) {
        if result.passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Drives suites → cases → calls strictly in order. Each case gets a fresh
/// [`VariableStore`] that lives exactly as long as the case.
pub struct SuiteRunner {
    config: RunConfig,
    transport: Box<dyn Transport>,
}

impl SuiteRunner {
    pub fn new(config: RunConfig, transport: Box<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Run every suite, hand each call's result to `reporter`, then flush it.
    /// Call failures never stop the run; only the final flush can fail.
    pub async fn run(
        &self,
        suites: &[Suite],
        reporter: &mut dyn Reporter,
    ) -> Result<RunSummary, ReportError> {
        let mut summary = RunSummary::default();
        for suite in suites {
            self.run_suite(suite, reporter, &mut summary).await;
        }
        reporter.flush()?;
        Ok(summary)
    }

    #[instrument(skip_all, fields(suite = %suite.name))]
    async fn run_suite(&self, suite: &Suite, reporter: &mut dyn Reporter, summary: &mut RunSummary) {
        let executor = CallExecutor::new(&self.config, self.transport.as_ref());
        info!(cases = suite.cases.len(), "running suite");

        for case in &suite.cases {
            if case.is_ignored() {
                info!(
                    case = %case.name,
                    reason = case.ignore_reason.as_deref().unwrap_or_default(),
                    "skipping ignored case"
                );
                summary.skipped_cases += 1;
                continue;
            }

            let mut vars = VariableStore::new();
            for (index, call) in case.calls.iter().enumerate() {
                let result = executor.execute(suite, case, index, call, &mut vars).await;
                summary.record(&result);
                reporter.report(&result);
            }
        }
    }
}
