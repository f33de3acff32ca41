use std::io::{self, Stdout, Write};

use crate::domain::TestResult;
use crate::error::ReportError;

use super::Reporter;

/// Prints a PASS/FAIL line per call and a summary on flush.
pub struct ConsoleReporter<W: Write + Send = Stdout> {
    out: W,
    passed: usize,
    failed: usize,
}

impl ConsoleReporter<Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for ConsoleReporter<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            passed: 0,
            failed: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_result(&mut self, result: &TestResult) -> io::Result<()> {
        let status = if result.passed() { "PASS" } else { "FAIL" };
        writeln!(
            self.out,
            "{status} {} / {} #{}: {} ({} ms)",
            result.suite,
            result.case,
            result.call_index + 1,
            result.description,
            result.duration.as_millis()
        )?;
        if let Some(cause) = result.cause() {
            writeln!(self.out, "     {cause}")?;
        }
        Ok(())
    }
}

impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    fn report(&mut self, result: &TestResult) {
        if result.passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        // Console output is best effort; a closed stdout must not stop the run.
        let _ = self.write_result(result);
    }

    fn flush(&mut self) -> Result<(), ReportError> {
        writeln!(
            self.out,
            "\n{} calls, {} passed, {} failed",
            self.passed + self.failed,
            self.passed,
            self.failed
        )?;
        self.out.flush()?;
        Ok(())
    }
}
