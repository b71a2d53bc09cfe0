//! In-process backend and recording doubles shared by the unit tests.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::{json, Value};
use shared::domain::{Identity, Session, UserId};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{config::Settings, Navigator, Notifier, PortalClient};

#[derive(Clone, Debug)]
pub(crate) enum Canned {
    Json(Value),
    Status(StatusCode),
    Raw(&'static str),
}

#[derive(Clone, Debug)]
pub(crate) struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
    pub raw_body: String,
}

#[derive(Clone, Default)]
pub(crate) struct MockBackend {
    responses: Arc<Mutex<HashMap<(String, String), Canned>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockBackend {
    pub async fn respond(&self, method: &str, path: &str, canned: Canned) {
        self.responses
            .lock()
            .await
            .insert((method.to_string(), path.to_string()), canned);
    }

    pub async fn respond_json(&self, method: &str, path: &str, body: Value) {
        self.respond(method, path, Canned::Json(body)).await;
    }

    pub async fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().await.clone()
    }

    pub async fn hits(&self, method: &str, path: &str) -> usize {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub async fn total_hits(&self) -> usize {
        self.requests.lock().await.len()
    }
}

async fn handle(
    State(backend): State<MockBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let raw_body = String::from_utf8_lossy(&body).into_owned();
    backend.requests.lock().await.push(Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        raw_body,
    });

    let canned = backend
        .responses
        .lock()
        .await
        .get(&(method.to_string(), uri.path().to_string()))
        .cloned();
    match canned {
        Some(Canned::Json(value)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            value.to_string(),
        )
            .into_response(),
        Some(Canned::Raw(text)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            text,
        )
            .into_response(),
        Some(Canned::Status(status)) => status.into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub(crate) async fn spawn_backend() -> (String, MockBackend) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let backend = MockBackend::default();
    let app = Router::new().fallback(handle).with_state(backend.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), backend)
}

/// Address nothing listens on; requests to it fail at connect time.
pub(crate) async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    alerts: std::sync::Mutex<Vec<String>>,
    infos: std::sync::Mutex<Vec<String>>,
    confirm_answer: AtomicBool,
}

impl RecordingNotifier {
    pub fn answering(answer: bool) -> Self {
        let notifier = Self::default();
        notifier.confirm_answer.store(answer, Ordering::SeqCst);
        notifier
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().expect("alerts").clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().expect("infos").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().expect("alerts").push(message.to_string());
    }

    fn inform(&self, message: &str) {
        self.infos.lock().expect("infos").push(message.to_string());
    }

    fn confirm(&self, _question: &str) -> bool {
        self.confirm_answer.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub(crate) struct RecordingNavigator {
    targets: std::sync::Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().expect("targets").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: &str) {
        self.targets.lock().expect("targets").push(target.to_string());
    }
}

pub(crate) struct Harness {
    pub client: Arc<PortalClient>,
    pub backend: MockBackend,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
}

pub(crate) fn test_settings(base_url: &str) -> Settings {
    Settings {
        switch_account_delay_ms: 10,
        ..Settings::with_base_url(base_url)
    }
}

pub(crate) fn sample_identity() -> Identity {
    Identity {
        id: UserId(1),
        username: "a".into(),
        nickname: None,
        avatar_url: "/images/default-avatar.png".into(),
    }
}

pub(crate) fn ok(data: Value) -> Value {
    json!({ "code": 200, "msg": "success", "data": data })
}

pub(crate) async fn harness_with(session: Session, notifier: RecordingNotifier) -> Harness {
    let (url, backend) = spawn_backend().await;
    let notifier = Arc::new(notifier);
    let navigator = Arc::new(RecordingNavigator::default());
    let client = PortalClient::new_with_session(
        test_settings(&url),
        notifier.clone(),
        navigator.clone(),
        session,
    )
    .expect("client");
    Harness {
        client,
        backend,
        notifier,
        navigator,
    }
}

pub(crate) async fn harness() -> Harness {
    harness_with(Session::anonymous(), RecordingNotifier::default()).await
}

pub(crate) async fn signed_in_harness() -> Harness {
    harness_with(
        Session::signed_in(sample_identity()),
        RecordingNotifier::default(),
    )
    .await
}

/// Client whose backend refuses every connection.
pub(crate) async fn offline_harness(session: Session) -> Harness {
    let url = unreachable_url().await;
    let notifier = Arc::new(RecordingNotifier::default());
    let navigator = Arc::new(RecordingNavigator::default());
    let client = PortalClient::new_with_session(
        test_settings(&url),
        notifier.clone(),
        navigator.clone(),
        session,
    )
    .expect("client");
    Harness {
        client,
        backend: MockBackend::default(),
        notifier,
        navigator,
    }
}
