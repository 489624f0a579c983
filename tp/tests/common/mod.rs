//! In-process stand-in for the planning service, served with axum

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// One request received by the stub
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: serde_json::Value,
}

/// A scripted answer: status, raw body and an optional delay before replying
#[derive(Debug, Clone)]
pub struct Reply {
    status: u16,
    body: String,
    delay: Duration,
}

impl Reply {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn ok(body: &str) -> Self {
        Self::new(200, body)
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Clone, Default)]
struct StubState {
    requests: Arc<Mutex<Vec<Recorded>>>,
    plans: Arc<Mutex<VecDeque<Reply>>>,
    chats: Arc<Mutex<VecDeque<Reply>>>,
    chats_by_question: Arc<Mutex<HashMap<String, Reply>>>,
}

impl StubState {
    fn record(&self, method: &Method, uri: &Uri, body: &Bytes) {
        let body = serde_json::from_slice(body).unwrap_or(serde_json::Value::Null);
        self.requests.lock().expect("requests lock").push(Recorded {
            method: method.to_string(),
            path: uri.path().to_string(),
            body,
        });
    }
}

async fn plan_trip(State(state): State<StubState>, method: Method, uri: Uri, body: Bytes) -> Response {
    state.record(&method, &uri, &body);
    let reply = state.plans.lock().expect("plans lock").pop_front();
    respond(reply).await
}

async fn chat(State(state): State<StubState>, method: Method, uri: Uri, body: Bytes) -> Response {
    state.record(&method, &uri, &body);
    let question = serde_json::from_slice::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["question"].as_str().map(str::to_string))
        .unwrap_or_default();
    let reply = state
        .chats_by_question
        .lock()
        .expect("chats by question lock")
        .remove(&question)
        .or_else(|| state.chats.lock().expect("chats lock").pop_front());
    respond(reply).await
}

async fn respond(reply: Option<Reply>) -> Response {
    let Some(reply) = reply else {
        return (StatusCode::NOT_IMPLEMENTED, "no scripted reply").into_response();
    };
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    let status = StatusCode::from_u16(reply.status).expect("valid status code");
    (status, [(header::CONTENT_TYPE, "application/json")], reply.body).into_response()
}

/// Scripts the stub before it starts listening
#[derive(Default)]
pub struct StubBuilder {
    state: StubState,
}

impl StubBuilder {
    /// Queue an answer for the next plan request
    pub fn plan(self, reply: Reply) -> Self {
        self.state.plans.lock().expect("plans lock").push_back(reply);
        self
    }

    /// Queue an answer for the next chat request without a dedicated answer
    pub fn chat(self, reply: Reply) -> Self {
        self.state.chats.lock().expect("chats lock").push_back(reply);
        self
    }

    /// Answer a specific chat question, whatever order it arrives in
    pub fn chat_for(self, question: &str, reply: Reply) -> Self {
        self.state
            .chats_by_question
            .lock()
            .expect("chats by question lock")
            .insert(question.to_string(), reply);
        self
    }

    pub async fn start(self) -> StubServer {
        let app = Router::new()
            .route("/plan-trip", post(plan_trip))
            .route("/generate-plan", post(plan_trip))
            .route("/chat", post(chat))
            .with_state(self.state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub listener");
        let address: SocketAddr = listener.local_addr().expect("stub listener local addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });
            server.await.expect("run stub server");
        });

        StubServer {
            base_url: format!("http://{address}"),
            state: self.state,
            shutdown: Some(shutdown_tx),
        }
    }
}

/// Running stub; shuts down when dropped
pub struct StubServer {
    pub base_url: String,
    state: StubState,
    shutdown: Option<oneshot::Sender<()>>,
}

impl StubServer {
    pub fn builder() -> StubBuilder {
        StubBuilder::default()
    }

    /// Every request received so far, in arrival order
    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().expect("requests lock").clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// A base URL on which nothing is listening
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let address = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{address}")
}
