use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::CallError;
use crate::http::HttpResponse;

/// What a reporter gets to see of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSnapshot {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl From<&HttpResponse> for ResponseSnapshot {
    fn from(response: &HttpResponse) -> Self {
        Self {
            status: response.status,
            headers: response.headers.clone(),
            body: response.body_text(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Passed,
    Failed(CallError),
}

/// The record produced for every executed call.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    pub suite: String,
    pub case: String,
    pub call_index: usize,
    /// `METHOD url` of the dispatched request, or of the declared one when
    /// the call failed before dispatch.
    pub description: String,
    pub outcome: Outcome,
    pub response: Option<ResponseSnapshot>,
    pub duration: Duration,
}

impl TestResult {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, Outcome::Passed)
    }

    pub fn cause(&self) -> Option<&CallError> {
        match &self.outcome {
            Outcome::Passed => None,
            Outcome::Failed(err) => Some(err),
        }
    }
}
