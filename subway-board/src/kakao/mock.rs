//! Scripted arrival source for testing without network access.
//!
//! Responses are served in order, one per fetch. Clones share the script and
//! the call counter, so a test can keep a handle after moving a clone into a
//! `RefreshManager`.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Mutex;

use crate::domain::StationId;

use super::error::FetchError;
use super::source::ArrivalSource;

/// One scripted outcome.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// 2xx with this body
    Body(String),
    /// Non-success status
    Status(u16),
    /// Connection-level failure
    Transport(String),
    /// Never completes; exercises the refresh deadline
    Stall,
}

impl MockResponse {
    pub fn body(body: impl Into<String>) -> Self {
        MockResponse::Body(body.into())
    }
}

/// Mock source that serves scripted responses.
#[derive(Debug, Clone, Default)]
pub struct MockArrivalSource {
    script: Arc<Mutex<VecDeque<MockResponse>>>,
    calls: Arc<AtomicUsize>,
}

impl MockArrivalSource {
    pub fn new(responses: impl IntoIterator<Item = MockResponse>) -> Self {
        Self {
            script: Arc::new(Mutex::new(responses.into_iter().collect())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Append a response to the end of the script.
    pub async fn push(&self, response: MockResponse) {
        self.script.lock().await.push_back(response);
    }

    /// Number of fetches performed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of responses not yet served.
    pub async fn remaining(&self) -> usize {
        self.script.lock().await.len()
    }
}

impl ArrivalSource for MockArrivalSource {
    async fn fetch(&self, station: &StationId) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().await.pop_front();

        match next {
            Some(MockResponse::Body(body)) => Ok(body),
            Some(MockResponse::Status(status)) => Err(FetchError::Status {
                status,
                message: format!("mock status for station {station}"),
            }),
            Some(MockResponse::Transport(message)) => Err(FetchError::Transport(message)),
            Some(MockResponse::Stall) => std::future::pending().await,
            None => Err(FetchError::Unclassified(format!(
                "no scripted response left for station {station}"
            ))),
        }
    }
}
