//! # Response Expectations
//!
//! Checks declared in a call's `expect` block, evaluated in a fixed order
//! against a completed response:
//!
//! status code → content type → headers → body schema → body paths → absent
//!
//! Evaluation stops at the first failing check.

use std::path::PathBuf;

use jsonschema::Validator;
use serde_json::Value;
use tracing::debug;

use crate::config::RunConfig;
use crate::domain::Expect;
use crate::engine::body::normalize;
use crate::engine::path::{resolve, values_match};
use crate::error::{CallError, Check, ExpectationFailure};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::storage;

const NOT_FOUND: &str = "<not found>";

/// Where a body schema document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    File(PathBuf),
    Uri(String),
}

impl SchemaSource {
    fn label(&self) -> String {
        match self {
            SchemaSource::File(path) => path.display().to_string(),
            SchemaSource::Uri(uri) => uri.clone(),
        }
    }
}

/// A single assertable property of a response.
#[derive(Debug, Clone, PartialEq)]
pub enum Expectation<'a> {
    StatusCode(u16),
    ContentType(&'a str),
    Header { name: &'a str, value: &'a str },
    BodySchema(SchemaSource),
    BodyPath { path: &'a str, expected: &'a Value },
    Absent(&'a str),
}

/// Build the ordered list of checks declared by `expect`. Fields that are
/// not set produce no check.
pub fn expectations<'a>(
    expect: &'a Expect,
    suite_dir: &str,
    config: &RunConfig,
) -> Vec<Expectation<'a>> {
    let mut plan = Vec::new();

    if let Some(code) = expect.status_code {
        plan.push(Expectation::StatusCode(code));
    }

    if let Some(content_type) = expect.content_type.as_deref().filter(|c| !c.is_empty()) {
        plan.push(Expectation::ContentType(content_type));
    }

    for (name, value) in &expect.headers {
        plan.push(Expectation::Header { name, value });
    }

    // When both are declared the URI wins.
    if let Some(uri) = expect.schema_uri() {
        plan.push(Expectation::BodySchema(SchemaSource::Uri(
            config.absolute_url(uri),
        )));
    } else if let Some(file) = expect.schema_file() {
        plan.push(Expectation::BodySchema(SchemaSource::File(
            storage::asset_path(&config.suite_root, suite_dir, file),
        )));
    }

    for (path, expected) in &expect.body {
        plan.push(Expectation::BodyPath { path, expected });
    }

    for path in &expect.absent {
        plan.push(Expectation::Absent(path));
    }

    plan
}

/// Response body normalized on first use, so calls without body checks
/// never need a parseable body.
pub struct ResponseBody<'r> {
    response: &'r HttpResponse,
    parsed: Option<Value>,
}

impl<'r> ResponseBody<'r> {
    pub fn new(response: &'r HttpResponse) -> Self {
        Self {
            response,
            parsed: None,
        }
    }

    pub fn value(&mut self) -> Result<&Value, CallError> {
        let parsed = match self.parsed.take() {
            Some(value) => value,
            None => normalize(
                &self.response.body,
                self.response.header("content-type").unwrap_or_default(),
            )?,
        };
        let value: &Value = self.parsed.insert(parsed);
        Ok(value)
    }
}

/// Run `plan` in order, stopping at the first failure. Schema documents are
/// only loaded when their check is reached.
pub async fn evaluate(
    plan: &[Expectation<'_>],
    response: &HttpResponse,
    body: &mut ResponseBody<'_>,
    transport: &dyn Transport,
) -> Result<(), CallError> {
    for expectation in plan {
        debug!(?expectation, "checking");
        match expectation {
            Expectation::StatusCode(code) => check_status(*code, response)?,
            Expectation::ContentType(expected) => check_content_type(expected, response)?,
            Expectation::Header { name, value } => check_header(name, value, response)?,
            Expectation::BodySchema(source) => {
                let label = source.label();
                let schema = load_schema(source, transport).await?;
                let validator = compile_schema(schema, label.clone()).await?;
                check_schema(&validator, &label, response)?;
            }
            Expectation::BodyPath { path, expected } => {
                check_body_path(path, expected, body.value()?)?
            }
            Expectation::Absent(path) => check_absent(path, body.value()?)?,
        }
    }
    Ok(())
}

pub fn check_status(expected: u16, response: &HttpResponse) -> Result<(), ExpectationFailure> {
    if response.status == expected {
        return Ok(());
    }
    Err(ExpectationFailure::new(
        Check::StatusCode,
        expected.to_string(),
        response.status.to_string(),
    ))
}

pub fn check_content_type(expected: &str, response: &HttpResponse) -> Result<(), ExpectationFailure> {
    let actual = response.media_type();
    if actual == expected {
        return Ok(());
    }
    Err(ExpectationFailure::new(Check::ContentType, expected, actual))
}

pub fn check_header(name: &str, expected: &str, response: &HttpResponse) -> Result<(), ExpectationFailure> {
    match response.header(name) {
        Some(actual) if actual == expected => Ok(()),
        actual => Err(ExpectationFailure::new(
            Check::Header(name.to_string()),
            expected,
            actual.unwrap_or(NOT_FOUND),
        )),
    }
}

pub fn check_body_path(path: &str, expected: &Value, body: &Value) -> Result<(), ExpectationFailure> {
    match resolve(body, path) {
        Some(actual) if values_match(actual, expected) => Ok(()),
        actual => Err(ExpectationFailure::new(
            Check::BodyPath(path.to_string()),
            expected.to_string(),
            actual.map_or_else(|| NOT_FOUND.to_string(), Value::to_string),
        )),
    }
}

pub fn check_absent(path: &str, body: &Value) -> Result<(), ExpectationFailure> {
    match resolve(body, path) {
        None => Ok(()),
        Some(actual) => Err(ExpectationFailure::new(
            Check::Absent(path.to_string()),
            "no value",
            actual.to_string(),
        )),
    }
}

/// Compile a schema document. Remote `$ref`s are fetched with a blocking
/// client while building, so this must stay off the async workers.
pub async fn compile_schema(schema: Value, label: String) -> Result<Validator, CallError> {
    tokio::task::spawn_blocking(move || {
        jsonschema::options()
            .build(&schema)
            .map_err(|e| CallError::InvalidExpectation(format!("Invalid schema `{label}`: {e}")))
    })
    .await
    .map_err(|e| CallError::InvalidExpectation(format!("Schema compilation aborted: {e}")))?
}

/// Validate the raw response body, reporting every violation in one failure.
pub fn check_schema(validator: &Validator, label: &str, response: &HttpResponse) -> Result<(), CallError> {
    let instance: Value =
        serde_json::from_slice(&response.body).map_err(|e| CallError::MalformedBody {
            content_type: response.media_type(),
            message: e.to_string(),
        })?;

    let violations: Vec<String> = validator
        .iter_errors(&instance)
        .map(|err| err.to_string())
        .collect();
    if violations.is_empty() {
        return Ok(());
    }

    Err(ExpectationFailure::new(
        Check::BodySchema,
        format!("body matching `{label}`"),
        violations.join("; "),
    )
    .into())
}

async fn load_schema(source: &SchemaSource, transport: &dyn Transport) -> Result<Value, CallError> {
    match source {
        SchemaSource::File(path) => storage::read_json_asset(path),
        SchemaSource::Uri(uri) => {
            let response = transport
                .send(&HttpRequest::get(uri.clone()))
                .await
                .map_err(CallError::Transport)?;
            if !(200..300).contains(&response.status) {
                return Err(CallError::InvalidExpectation(format!(
                    "Can't fetch schema `{uri}`: status {}",
                    response.status
                )));
            }
            serde_json::from_slice(&response.body).map_err(|e| {
                CallError::InvalidExpectation(format!("Failed to parse schema `{uri}`: {e}"))
            })
        }
    }
}
