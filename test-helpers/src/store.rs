//! State behind the mock endpoints.
//!
//! The store is created explicitly and handed to the server, so every test
//! gets its own and can inspect or reset it.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use payloads::scouting::{PlayerSummary, ReportSummary, ScoutSummary};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// A canned reply that takes priority over the dataset.
#[derive(Debug, Clone)]
pub enum MockReply {
    Json { status: u16, body: Value },
    /// A bare status with a non-JSON body.
    Status(u16),
}

impl MockReply {
    /// A 200 with `body`.
    pub fn page(body: Value) -> Self {
        Self::Json { status: 200, body }
    }

    /// An error status with `{"error": message}`.
    pub fn error(status: u16, message: &str) -> Self {
        Self::Json {
            status,
            body: json!({ "error": message }),
        }
    }

    pub(crate) fn into_response(self) -> HttpResponse {
        match self {
            Self::Json { status, body } => HttpResponse::build(status_code(status))
                .json(body),
            Self::Status(status) => HttpResponse::build(status_code(status))
                .content_type("text/plain")
                .body(format!("status {status}")),
        }
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// One request as the server saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Default)]
struct StoreInner {
    players: Vec<PlayerSummary>,
    scouts: Vec<ScoutSummary>,
    reports: Vec<ReportSummary>,
    scripts: HashMap<String, VecDeque<MockReply>>,
    requests: Vec<RecordedRequest>,
}

#[derive(Clone, Default)]
pub struct MockStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_players(&self, players: Vec<PlayerSummary>) {
        self.inner.lock().unwrap().players = players;
    }

    pub fn set_scouts(&self, scouts: Vec<ScoutSummary>) {
        self.inner.lock().unwrap().scouts = scouts;
    }

    pub fn set_reports(&self, reports: Vec<ReportSummary>) {
        self.inner.lock().unwrap().reports = reports;
    }

    pub fn players(&self) -> Vec<PlayerSummary> {
        self.inner.lock().unwrap().players.clone()
    }

    pub fn scouts(&self) -> Vec<ScoutSummary> {
        self.inner.lock().unwrap().scouts.clone()
    }

    pub fn reports(&self) -> Vec<ReportSummary> {
        self.inner.lock().unwrap().reports.clone()
    }

    /// Queue replies for `path`. They are served in order before the
    /// dataset is consulted again.
    pub fn script(&self, path: &str, replies: impl IntoIterator<Item = MockReply>) {
        self.inner
            .lock()
            .unwrap()
            .scripts
            .entry(path.to_string())
            .or_default()
            .extend(replies);
    }

    pub(crate) fn next_scripted(&self, path: &str) -> Option<MockReply> {
        self.inner
            .lock()
            .unwrap()
            .scripts
            .get_mut(path)
            .and_then(VecDeque::pop_front)
    }

    pub(crate) fn record(&self, path: &str, query: &[(String, String)]) {
        self.inner.lock().unwrap().requests.push(RecordedRequest {
            path: path.to_string(),
            query: query.to_vec(),
        });
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn requests_for(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }

    /// Forget scripts, recorded requests and data.
    pub fn reset(&self) {
        *self.inner.lock().unwrap() = StoreInner::default();
    }
}
