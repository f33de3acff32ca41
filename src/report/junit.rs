use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::info;

use crate::domain::TestResult;
use crate::error::ReportError;

use super::Reporter;

pub const REPORT_FILE: &str = "junit.xml";

/// Collects results and writes them as a JUnit XML document on flush: one
/// `<testsuite>` per suite, one `<testcase>` per call.
pub struct JUnitReporter {
    dir: PathBuf,
    results: Vec<TestResult>,
}

impl JUnitReporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            results: Vec::new(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(REPORT_FILE)
    }

    /// Suites in the order they first reported.
    fn grouped(&self) -> Vec<(&str, Vec<&TestResult>)> {
        let mut groups: Vec<(&str, Vec<&TestResult>)> = Vec::new();
        for result in &self.results {
            match groups.iter_mut().find(|(name, _)| *name == result.suite) {
                Some((_, members)) => members.push(result),
                None => groups.push((result.suite.as_str(), vec![result])),
            }
        }
        groups
    }

    pub fn render(&self) -> Result<Vec<u8>, ReportError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let failures = self.results.iter().filter(|r| !r.passed()).count();
        let tests = self.results.len().to_string();
        let failures = failures.to_string();
        let time = seconds(self.results.iter());
        emit(
            &mut writer,
            Event::Start(BytesStart::new("testsuites").with_attributes([
                ("tests", tests.as_str()),
                ("failures", failures.as_str()),
                ("time", time.as_str()),
            ])),
        )?;

        for (suite, members) in self.grouped() {
            write_suite(&mut writer, suite, &members)?;
        }

        emit(&mut writer, Event::End(BytesEnd::new("testsuites")))?;
        Ok(writer.into_inner())
    }

    fn write_to(&self, dir: &Path) -> Result<PathBuf, ReportError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(REPORT_FILE);
        fs::write(&path, self.render()?)?;
        Ok(path)
    }
}

impl Reporter for JUnitReporter {
    fn report(&mut self, result: &TestResult) {
        self.results.push(result.clone());
    }

    fn flush(&mut self) -> Result<(), ReportError> {
        let path = self.write_to(&self.dir)?;
        info!(path = %path.display(), "junit report written");
        Ok(())
    }
}

fn write_suite(
    writer: &mut Writer<Vec<u8>>,
    suite: &str,
    members: &[&TestResult],
) -> Result<(), ReportError> {
    let tests = members.len().to_string();
    let failures = members.iter().filter(|r| !r.passed()).count().to_string();
    let time = seconds(members.iter().copied());
    emit(
        writer,
        Event::Start(BytesStart::new("testsuite").with_attributes([
            ("name", suite),
            ("tests", tests.as_str()),
            ("failures", failures.as_str()),
            ("time", time.as_str()),
        ])),
    )?;

    for result in members {
        let name = format!(
            "{} #{}: {}",
            result.case,
            result.call_index + 1,
            result.description
        );
        let time = format!("{:.3}", result.duration.as_secs_f64());
        let testcase = BytesStart::new("testcase").with_attributes([
            ("name", name.as_str()),
            ("classname", suite),
            ("time", time.as_str()),
        ]);

        match result.cause() {
            None => emit(writer, Event::Empty(testcase))?,
            Some(cause) => {
                let message = cause.to_string();
                emit(writer, Event::Start(testcase))?;
                emit(
                    writer,
                    Event::Start(
                        BytesStart::new("failure").with_attributes([("message", message.as_str())]),
                    ),
                )?;
                if let Some(body) = result.response.as_ref().map(|r| r.body.as_str()) {
                    emit(writer, Event::Text(BytesText::new(body)))?;
                }
                emit(writer, Event::End(BytesEnd::new("failure")))?;
                emit(writer, Event::End(BytesEnd::new("testcase")))?;
            }
        }
    }

    emit(writer, Event::End(BytesEnd::new("testsuite")))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), ReportError> {
    writer
        .write_event(event)
        .map_err(|e| ReportError::Xml(e.to_string()))
}

fn seconds<'a>(results: impl Iterator<Item = &'a TestResult>) -> String {
    let total: f64 = results.map(|r| r.duration.as_secs_f64()).sum();
    format!("{total:.3}")
}
