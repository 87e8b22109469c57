// src/test_utils/mock_backend.rs
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;

/// Scripted reply for the submission endpoint.
#[derive(Debug, Clone)]
pub enum SubmitReply {
    Ok(Value),
    Status(u16),
}

/// Scripted reply for the result endpoint.
#[derive(Debug, Clone)]
pub enum PollReply {
    Json(Value),
    /// Body returned verbatim with a JSON content type, for malformed-response tests.
    Raw(String),
    Status(u16),
}

#[derive(Clone)]
struct MockBackendState {
    submit_replies: Arc<Mutex<VecDeque<SubmitReply>>>,
    poll_replies: Arc<Mutex<VecDeque<PollReply>>>,
    submissions: Arc<Mutex<Vec<Value>>>,
    polled_ids: Arc<Mutex<Vec<String>>>,
    poll_instants: Arc<Mutex<Vec<Instant>>>,
}

async fn submission_handler(
    State(state): State<MockBackendState>,
    Json(payload): Json<Value>,
) -> Response {
    log::debug!("Mock backend received submission: {:?}", payload);
    state.submissions.lock().unwrap().push(payload);

    match state.submit_replies.lock().unwrap().pop_front() {
        Some(SubmitReply::Ok(body)) => Json(body).into_response(),
        Some(SubmitReply::Status(code)) => status_from(code).into_response(),
        None => {
            log::error!("Mock backend ran out of submission replies");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

async fn result_handler(
    State(state): State<MockBackendState>,
    Path(request_id): Path<String>,
) -> Response {
    log::debug!("Mock backend polled for request {}", request_id);
    state.polled_ids.lock().unwrap().push(request_id);
    state.poll_instants.lock().unwrap().push(Instant::now());

    match state.poll_replies.lock().unwrap().pop_front() {
        Some(PollReply::Json(body)) => Json(body).into_response(),
        Some(PollReply::Raw(body)) => (
            StatusCode::OK,
            [("content-type", "application/json")],
            body,
        )
            .into_response(),
        Some(PollReply::Status(code)) => status_from(code).into_response(),
        None => {
            log::error!("Mock backend ran out of poll replies");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

fn status_from(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// In-process stand-in for both backend origins, serving the submission and
/// result endpoints from one listener with scripted replies.
pub struct MockBackend {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    submissions: Arc<Mutex<Vec<Value>>>,
    polled_ids: Arc<Mutex<Vec<String>>>,
    poll_instants: Arc<Mutex<Vec<Instant>>>,
}

impl MockBackend {
    pub async fn start(
        submit_replies: Vec<SubmitReply>,
        poll_replies: Vec<PollReply>,
    ) -> Self {
        let state = MockBackendState {
            submit_replies: Arc::new(Mutex::new(VecDeque::from(submit_replies))),
            poll_replies: Arc::new(Mutex::new(VecDeque::from(poll_replies))),
            submissions: Arc::new(Mutex::new(Vec::new())),
            polled_ids: Arc::new(Mutex::new(Vec::new())),
            poll_instants: Arc::new(Mutex::new(Vec::new())),
        };
        let submissions = state.submissions.clone();
        let polled_ids = state.polled_ids.clone();
        let poll_instants = state.poll_instants.clone();

        let app = Router::new()
            .route("/api/v1/submission", post(submission_handler))
            .route("/api/v1/submissions/{request_id}", get(result_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap_or_else(|e| {
            panic!("Failed to bind mock backend to 127.0.0.1:0. Error: {}", e);
        });
        let addr = listener.local_addr().unwrap();
        log::info!("Mock backend listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap_or_else(|e| {
                    log::error!("Mock backend error: {}", e);
                });
        });

        MockBackend {
            addr,
            shutdown_tx,
            submissions,
            polled_ids,
            poll_instants,
        }
    }

    pub fn address(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Submission bodies received, in arrival order.
    pub fn submissions(&self) -> Vec<Value> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    /// Request ids polled, in arrival order.
    pub fn polled_ids(&self) -> Vec<String> {
        self.polled_ids.lock().unwrap().clone()
    }

    pub fn poll_count(&self) -> usize {
        self.polled_ids.lock().unwrap().len()
    }

    /// Arrival instants of poll requests, for spacing assertions.
    pub fn poll_instants(&self) -> Vec<Instant> {
        self.poll_instants.lock().unwrap().clone()
    }

    pub async fn shutdown(self) {
        if self.shutdown_tx.send(()).is_err() {
            log::warn!("Mock backend shutdown signal already sent or receiver dropped");
        }
    }
}
