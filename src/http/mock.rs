use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::client::Transport;
use super::request::HttpRequest;
use super::response::HttpResponse;

/// Replays queued responses in order and records every request it sees.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, String>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new(responses: impl IntoIterator<Item = Result<HttpResponse, String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn json(status: u16, body: &str) -> Result<HttpResponse, String> {
        Ok(HttpResponse::new(status)
            .with_header("Content-Type", "application/json")
            .with_body(body.to_string()))
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, String> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no response queued".to_string()))
    }
}
