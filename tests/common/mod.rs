#![allow(dead_code)]

use admin_console::{ApiResult, HttpRequest, HttpResponse, LoadingObserver, Transport};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Transport that replays canned responses and records what it was sent.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<ApiResult<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
    interleave: bool,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<ApiResult<HttpResponse>>) -> Self {
        ScriptedTransport {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            interleave: false,
        }
    }

    /// Yields before answering so that joined callers take turns.
    pub fn interleaved(responses: Vec<ApiResult<HttpResponse>>) -> Self {
        ScriptedTransport {
            interleave: true,
            ..ScriptedTransport::new(responses)
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        if self.interleave {
            tokio::task::yield_now().await;
        }
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::new(599, "script exhausted")))
    }
}

pub fn ok(body: &str) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::new(200, body))
}

pub fn status(code: u16, body: &str) -> ApiResult<HttpResponse> {
    Ok(HttpResponse::new(code, body))
}

/// Observer that logs every callback in order.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<&'static str>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events().iter().filter(|e| **e == event).count()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl LoadingObserver for RecordingObserver {
    fn show(&self) {
        self.events.lock().unwrap().push("show");
    }

    fn hide(&self) {
        self.events.lock().unwrap().push("hide");
    }
}
