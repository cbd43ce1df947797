//! Mock auth backend and app wiring shared by the integration tests

#![allow(dead_code)]

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{from_fn_with_state, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use campus_applications::{CampusApp, StorageBackends};
use campus_core::CampusConfig;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

pub const REFRESH_TOKEN: &str = "refresh-faculty";
pub const ACCESS_TOKEN: &str = "access-faculty";
/// Refresh token the mock rejects with a server error
pub const BROKEN_REFRESH_TOKEN: &str = "refresh-broken";
/// How long the PDF listing takes to answer
pub const SLOW_RESPONSE: Duration = Duration::from_secs(30);

#[derive(Clone, Default)]
pub struct Calls {
    pub total: Arc<AtomicUsize>,
    pub login: Arc<AtomicUsize>,
    pub refresh: Arc<AtomicUsize>,
    pub register: Arc<AtomicUsize>,
}

impl Calls {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

async fn count_all(State(calls): State<Calls>, request: Request, next: Next) -> Response {
    calls.total.fetch_add(1, Ordering::SeqCst);
    next.run(request).await
}

async fn login(State(calls): State<Calls>, Json(body): Json<Value>) -> Response {
    calls.login.fetch_add(1, Ordering::SeqCst);
    match body["email"].as_str() {
        Some("faculty@college.edu") => {
            Json(json!({"user": {"role": "faculty"}, "refresh": REFRESH_TOKEN})).into_response()
        }
        Some("norefresh@college.edu") => Json(json!({"user": {"role": "faculty"}})).into_response(),
        Some("flaky@college.edu") => {
            Json(json!({"user": {"role": "faculty"}, "refresh": BROKEN_REFRESH_TOKEN}))
                .into_response()
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "No active account found with the given credentials"})),
        )
            .into_response(),
    }
}

async fn refresh(State(calls): State<Calls>, Json(body): Json<Value>) -> Response {
    calls.refresh.fetch_add(1, Ordering::SeqCst);
    if body["refresh"] == REFRESH_TOKEN {
        Json(json!({"access": ACCESS_TOKEN})).into_response()
    } else if body["refresh"] == BROKEN_REFRESH_TOKEN {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "Server error"})),
        )
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Token is invalid or expired"})),
        )
            .into_response()
    }
}

async fn register(State(calls): State<Calls>, Json(body): Json<Value>) -> Response {
    calls.register.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::CREATED,
        Json(json!({"user": {"role": body["role"], "username": body["username"]}})),
    )
        .into_response()
}

/// Only answers callers holding the faculty access token
async fn students(request: Request) -> Response {
    let expected = format!("Bearer {}", ACCESS_TOKEN);
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(expected.as_str());

    if authorized {
        Json(json!({"students": [
            {"student_id": "1", "name": "Asha"},
            {"student_id": "2", "name": "Ravi"}
        ]}))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Authentication credentials were not provided."})),
        )
            .into_response()
    }
}

async fn slow_pdfs() -> Json<Value> {
    tokio::time::sleep(SLOW_RESPONSE).await;
    Json(json!([]))
}

pub struct TestBackend {
    pub base_url: String,
    pub calls: Calls,
}

impl TestBackend {
    pub fn config(&self) -> CampusConfig {
        let mut config = CampusConfig::default();
        config.api.base_url = self.base_url.clone();
        config.api.timeout_seconds = 5;
        config
    }

    pub fn app(&self, backends: StorageBackends) -> CampusApp {
        CampusApp::with_backends(self.config(), backends).unwrap()
    }
}

pub async fn spawn_backend() -> TestBackend {
    let calls = Calls::default();
    let app = Router::new()
        .route("/api/auth/login/", post(login))
        .route("/api/auth/token/refresh/", post(refresh))
        .route("/api/auth/register/", post(register))
        .route("/api/students/", get(students))
        .route("/api/get-all-pdfs/", get(slow_pdfs))
        .layer(from_fn_with_state(calls.clone(), count_all))
        .with_state(calls.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestBackend {
        base_url: format!("http://127.0.0.1:{}/api", port),
        calls,
    }
}
