use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::config::RunConfig;
use crate::domain::{Call, Outcome, ResponseSnapshot, Suite, TestCase, TestResult};
use crate::engine::path::resolve;
use crate::engine::template::build_request;
use crate::environment::VariableStore;
use crate::error::CallError;
use crate::http::Transport;
use crate::testing::{ResponseBody, evaluate, expectations};

/// Runs one call: build → send → check → remember.
pub struct CallExecutor<'a> {
    config: &'a RunConfig,
    transport: &'a dyn Transport,
}

/// What is known about a call so far, kept even when it fails.
struct CallTrace {
    description: String,
    response: Option<ResponseSnapshot>,
}

impl<'a> CallExecutor<'a> {
    pub fn new(config: &'a RunConfig, transport: &'a dyn Transport) -> Self {
        Self { config, transport }
    }

    /// Execute `call` and produce its result. Variables are only added to
    /// `vars` when every expectation passed and every `remember` path was
    /// found.
    #[instrument(skip_all, fields(suite = %suite.name, case = %case.name, index))]
    pub async fn execute(
        &self,
        suite: &Suite,
        case: &TestCase,
        index: usize,
        call: &Call,
        vars: &mut VariableStore,
    ) -> TestResult {
        let start = Instant::now();
        let mut trace = CallTrace {
            description: format!("{} {}", call.on.method, call.on.url),
            response: None,
        };

        let outcome = match self.run(suite, call, vars, &mut trace).await {
            Ok(captured) => {
                debug!(?captured, "remember");
                vars.extend(captured);
                Outcome::Passed
            }
            Err(err) => {
                debug!(%err, "call failed");
                Outcome::Failed(err)
            }
        };

        TestResult {
            suite: suite.qualified_name(),
            case: case.name.clone(),
            call_index: index,
            description: trace.description,
            outcome,
            response: trace.response,
            duration: start.elapsed(),
        }
    }

    async fn run(
        &self,
        suite: &Suite,
        call: &Call,
        vars: &VariableStore,
        trace: &mut CallTrace,
    ) -> Result<Vec<(String, Value)>, CallError> {
        let request = build_request(&call.on, &suite.directory, vars, self.config)?;
        trace.description = request.to_string();
        if self.config.debug {
            info!(
                %request,
                headers = ?request.headers,
                body = %String::from_utf8_lossy(&request.body),
                "sending request"
            );
        } else {
            debug!(%request, "sending request");
        }

        let response = self
            .transport
            .send(&request)
            .await
            .map_err(CallError::Transport)?;
        trace.response = Some(ResponseSnapshot::from(&response));
        if self.config.debug {
            info!(status = response.status, headers = ?response.headers, body = %response.body_text(), "response");
        } else {
            debug!(status = response.status, "response");
        }

        let plan = expectations(&call.expect, &suite.directory, self.config);
        let mut body = ResponseBody::new(&response);
        evaluate(&plan, &response, &mut body, self.transport).await?;

        if call.remember.is_empty() {
            return Ok(Vec::new());
        }

        let parsed = body.value()?;
        call.remember
            .iter()
            .map(|(variable, path)| {
                resolve(parsed, path)
                    .map(|value| (variable.clone(), value.clone()))
                    .ok_or_else(|| CallError::Capture {
                        variable: variable.clone(),
                        path: path.clone(),
                    })
            })
            .collect()
    }
}
