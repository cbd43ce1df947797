//! In-process mock of the campus backend
//!
//! Spawns an axum router on an ephemeral port and records every request it
//! sees, so tests can assert both on decoded results and on what was sent.

#![allow(dead_code)]

use axum::extract::{Path, Query, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::{from_fn_with_state, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use campus_api::{ApiClientConfig, CampusClient};
use campus_core::{Role, StaticToken, TokenProvider};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const REFRESH_TOKEN: &str = "refresh-1";
pub const ACCESS_TOKEN: &str = "access-1";

#[derive(Clone, Default)]
pub struct MockState {
    pub hits: Arc<AtomicUsize>,
    pub last_auth: Arc<Mutex<Option<String>>>,
    pub last_content_type: Arc<Mutex<Option<String>>>,
    pub bodies: Arc<Mutex<Vec<Value>>>,
    pub malformed: Arc<AtomicBool>,
}

impl MockState {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_auth(&self) -> Option<String> {
        self.last_auth.lock().unwrap().clone()
    }

    pub fn last_body(&self) -> Option<Value> {
        self.bodies.lock().unwrap().last().cloned()
    }

    fn push_body(&self, body: Value) {
        self.bodies.lock().unwrap().push(body);
    }
}

pub struct MockBackend {
    pub base_url: String,
    pub state: MockState,
}

impl MockBackend {
    /// Client with a fixed bearer token
    pub fn client_with_token(&self, token: &str, role: Role) -> CampusClient {
        self.client(Arc::new(StaticToken::new(token, role)))
    }

    pub fn anonymous_client(&self) -> CampusClient {
        self.client(Arc::new(StaticToken::anonymous()))
    }

    pub fn client(&self, credentials: Arc<dyn TokenProvider>) -> CampusClient {
        let config = ApiClientConfig::new(self.base_url.clone())
            .with_timeout(5)
            .with_assistant_endpoint(format!("{}/assistant/generate/", self.base_url));
        CampusClient::new(config, credentials).unwrap()
    }
}

async fn record(State(state): State<MockState>, request: Request, next: Next) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let auth = header_text(request.headers(), header::AUTHORIZATION);
    let content_type = header_text(request.headers(), header::CONTENT_TYPE);
    *state.last_auth.lock().unwrap() = auth;
    *state.last_content_type.lock().unwrap() = content_type;
    next.run(request).await
}

fn header_text(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn login(Json(body): Json<Value>) -> Response {
    match body["email"].as_str() {
        Some("norefresh@college.edu") => Json(json!({"user": {"role": "faculty"}})).into_response(),
        Some("weird@college.edu") => {
            Json(json!({"user": {"role": "default"}, "refresh": REFRESH_TOKEN})).into_response()
        }
        Some(email) if body["password"] == "secret" => {
            let role = email.split('@').next().unwrap_or("student");
            Json(json!({"user": {"role": role, "email": email}, "refresh": REFRESH_TOKEN}))
                .into_response()
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "No active account found with the given credentials"})),
        )
            .into_response(),
    }
}

async fn refresh(Json(body): Json<Value>) -> Response {
    if body["refresh"] == REFRESH_TOKEN {
        Json(json!({"access": ACCESS_TOKEN})).into_response()
    } else if body["refresh"] == "empty" {
        Json(json!({})).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Token is invalid or expired"})),
        )
            .into_response()
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    (
        StatusCode::CREATED,
        Json(json!({"user": {"role": body["role"], "username": body["username"]}})),
    )
        .into_response()
}

async fn events(State(state): State<MockState>) -> Json<Value> {
    if state.malformed.load(Ordering::SeqCst) {
        return Json(json!({"oops": true}));
    }
    Json(json!([
        {"id": 1, "title": "Sports day", "description": "Annual meet", "event_datetime": "2025-09-13T10:30:00Z"},
        {"id": 2, "title": "Exam notice", "description": "", "event_datetime": "2025-10-01T09:00:00Z"}
    ]))
}

async fn add_event(State(state): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
    state.push_body(body);
    Json(json!({"message": "Event created"}))
}

async fn holidays() -> Json<Value> {
    Json(json!([
        {"id": 1, "name": "Diwali", "date": "2025-10-20", "type": "Festival"},
        {"id": 2, "name": "Gandhi Jayanti", "date": "2025-10-02", "type": "National"},
        {"id": 3, "name": "Christmas", "date": "2025-12-25", "type": "Festival"}
    ]))
}

async fn all_students() -> Json<Value> {
    Json(json!({"students": [
        {"student_id": 1, "name": "Asha", "semester": 2, "division": "A", "gender": "F"},
        {"student_id": "2", "name": "Ravi", "semester": 2, "division": "A", "gender": "M"}
    ]}))
}

async fn students_by_semester(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    if query.get("semester").map(String::as_str) == Some("2") {
        Json(json!({"students": [
            {"student_id": "1", "name": "Asha"},
            {"student_id": "2", "name": "Ravi"}
        ]}))
    } else {
        Json(json!({"students": []}))
    }
}

async fn upload_roster(headers: HeaderMap) -> Response {
    let is_multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));
    if is_multipart {
        Json(json!({"message": "Uploaded"})).into_response()
    } else {
        (StatusCode::BAD_REQUEST, Json(json!({"detail": "Expected a file"}))).into_response()
    }
}

async fn register_student(State(state): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
    state.push_body(body);
    Json(json!({"message": "registered"}))
}

async fn update_marks(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.push_body(json!({"id": id, "marks": body["marks"]}));
    Json(json!({"message": "updated"}))
}

async fn update_attendance(State(state): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
    state.push_body(body);
    Json(json!({"message": "Attendance updated"}))
}

async fn live_attendance(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    if query.get("date").map(String::as_str) == Some("2025-09-13") {
        Json(json!({"students": [
            {"student_id": "1", "name": "Asha", "status": "P"}
        ]}))
    } else {
        Json(json!({"students": []}))
    }
}

async fn generate_quiz(State(state): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
    state.push_body(body);
    Json(json!({"status": "success"}))
}

async fn quizzes(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    match query.get("topic").map(String::as_str) {
        Some("broken") => Json(json!({"status": "error", "quizzes": []})),
        Some(_) => Json(json!({
            "status": "success",
            "count": 2,
            "quizzes": [
                {"question": "BFS uses?", "option1": "Queue", "option2": "Stack", "option3": "", "option4": null, "answer": "Queue"},
                {"question": "DFS uses?", "option1": "Queue", "option2": "Stack", "option3": "Heap", "option4": "Tree", "answer": "Stack"}
            ]
        })),
        None => Json(json!({"status": "error"})),
    }
}

async fn progress(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    match query.get("semester").map(String::as_str) {
        Some("3") => Json(json!({"status": "success", "data": {"3": {
            "Graphs": {"average_marks": 72.5, "students": [
                {"student_id": "1", "name": "Asha", "marks": 80},
                {"student_id": "2", "name": "Ravi", "marks": 65}
            ]}
        }}})),
        _ => Json(json!({"status": "success", "data": {}})),
    }
}

async fn pdfs(Query(query): Query<HashMap<String, String>>) -> Response {
    match query.get("download") {
        Some(id) => (
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"notes-{}.pdf\"", id),
                ),
            ],
            b"%PDF-1.4 fake".to_vec(),
        )
            .into_response(),
        None => Json(json!([
            {"id": 7, "title": "Graphs", "file": "/media/pdfs/graphs.pdf", "uploaded_at": "2025-09-01T08:00:00Z"}
        ]))
        .into_response(),
    }
}

async fn upload_pdf() -> Json<Value> {
    Json(json!({"message": "PDF uploaded"}))
}

async fn timetable(Path((semester, division)): Path<(String, String)>) -> Response {
    if semester == "1" && division == "A" {
        Json(json!({"status": "success", "data": {"data": {
            "Monday": {
                "10:00-11:00": {"subject": "Maths", "teacher": "Rao"},
                "9:00-10:00": {"subject": "DSA", "teacher": "Singh"},
                "11:00-12:00": null
            }
        }}}))
        .into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "No timetable found"})),
        )
            .into_response()
    }
}

async fn upload_timetable() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"detail": "Invalid file format"})),
    )
        .into_response()
}

async fn assistant(State(state): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
    state.push_body(body);
    Json(json!({"candidates": [{"content": {"parts": [{"text": "Open the muster page. Upload the roster"}]}}]}))
}

pub fn router(state: MockState) -> Router {
    Router::new()
        .route("/api/auth/login/", post(login))
        .route("/api/auth/token/refresh/", post(refresh))
        .route("/api/auth/register/", post(register))
        .route("/api/get-events/", get(events))
        .route("/api/add-event/", post(add_event))
        .route("/api/holidays/", get(holidays))
        .route("/api/holidays/upload/", post(upload_roster))
        .route("/api/students/all/", get(all_students))
        .route("/api/students/", get(students_by_semester).post(upload_roster))
        .route("/api/students/register/", post(register_student))
        .route("/api/students/{id}/update-marks/", put(update_marks))
        .route("/api/attendance/update/", put(update_attendance))
        .route("/api/attendance/live/", get(live_attendance))
        .route("/api/generate-quiz/", post(generate_quiz))
        .route("/api/api/quiz/", get(quizzes))
        .route("/api/marks-by-topic/", get(progress))
        .route("/api/get-all-pdfs/", get(pdfs))
        .route("/api/upload-pdf/", post(upload_pdf))
        .route("/api/timetable/{semester}/{division}/", get(timetable))
        .route("/api/generate-timetable/", post(upload_timetable))
        .route("/api/assistant/generate/", post(assistant))
        .layer(from_fn_with_state(state.clone(), record))
        .with_state(state)
}

/// Start the mock backend on an ephemeral port
pub async fn spawn_backend() -> MockBackend {
    let state = MockState::default();
    let app = router(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend {
        base_url: format!("http://127.0.0.1:{}/api", port),
        state,
    }
}

/// Address nothing is listening on
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/api", port)
}
