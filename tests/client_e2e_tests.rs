//! End-to-end tests driving the HTTP client against a mock scheduling API
//!
//! The mock is a small axum router served on an ephemeral port. It records
//! what the client sent so the tests can check headers and wire shapes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use shiftdesk::core::validation::BulkField;
use shiftdesk::prelude::*;
use std::sync::Mutex;

// =============================================================================
// Mock API
// =============================================================================

#[derive(Default)]
struct Recorded {
    auth_headers: Vec<Option<String>>,
    bulk_bodies: Vec<Value>,
    assign_bodies: Vec<Value>,
    export_range: Option<(String, String)>,
}

type Shared = Arc<Mutex<Recorded>>;

fn record_auth(shared: &Shared, headers: &HeaderMap) {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    shared.lock().unwrap().auth_headers.push(value);
}

async fn list_employees(State(shared): State<Shared>, headers: HeaderMap) -> impl IntoResponse {
    record_auth(&shared, &headers);
    Json(json!([
        {
            "id": 1, "fullName": "Alice Moreau", "email": "alice@example.com",
            "phone": "555-0101", "role": "Nurse", "maxWeeklyHours": 38, "isActive": true
        },
        {
            "id": 2, "fullName": "Bob Stone", "email": "bob@example.com",
            "phone": "555-0102", "role": "Clerk", "maxWeeklyHours": 20, "isActive": false,
            "availabilityNotes": "weekends only"
        }
    ]))
}

async fn bulk_create(State(shared): State<Shared>, Json(body): Json<Value>) -> impl IntoResponse {
    let rejected: Vec<Value> = body
        .as_array()
        .map(|rows| {
            rows.iter()
                .filter(|row| row["email"] == "taken@example.com")
                .map(|row| row["email"].clone())
                .collect()
        })
        .unwrap_or_default();
    shared.lock().unwrap().bulk_bodies.push(body);
    Json(json!({ "rejectedEmails": rejected }))
}

async fn list_shifts(State(shared): State<Shared>, headers: HeaderMap) -> impl IntoResponse {
    record_auth(&shared, &headers);
    if !headers.contains_key(AUTHORIZATION) {
        return (StatusCode::UNAUTHORIZED, "missing token").into_response();
    }
    Json(json!([
        {
            "id": 1, "shiftDate": "2024-03-04T00:00:00", "startTime": "09:00",
            "endTime": "17:00", "shiftType": "Morning", "isConfirmed": false,
            "isInformed": false, "assignments": []
        },
        {
            "id": 2, "shiftDate": "2024-03-05", "startTime": "13:00",
            "endTime": "21:00", "shiftType": "Evening", "isConfirmed": true
        }
    ]))
    .into_response()
}

async fn confirm_shift(Path(id): Path<i64>) -> impl IntoResponse {
    if id == 1 {
        (StatusCode::BAD_REQUEST, "Shift has no assigned employees".to_string())
    } else {
        (StatusCode::OK, String::new())
    }
}

async fn assign(
    State(shared): State<Shared>,
    Path(_id): Path<i64>,
    Json(body): Json<Value>,
) -> StatusCode {
    shared.lock().unwrap().assign_bodies.push(body);
    StatusCode::NO_CONTENT
}

async fn export_one(Path(id): Path<i64>) -> impl IntoResponse {
    format!("%PDF-1.4 shift {}", id).into_bytes()
}

#[derive(Deserialize)]
struct RangeQuery {
    from: String,
    to: String,
}

async fn export_range(
    State(shared): State<Shared>,
    Query(range): Query<RangeQuery>,
) -> impl IntoResponse {
    shared.lock().unwrap().export_range = Some((range.from, range.to));
    b"%PDF-1.4 range".to_vec()
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    if body["email"] == "admin@example.com" && body["password"] == "secret" {
        Json(json!({ "token": "jwt-123" })).into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn spawn_mock() -> (String, Shared) {
    let shared: Shared = Arc::new(Mutex::new(Recorded::default()));

    let api = Router::new()
        .route("/employees", get(list_employees))
        .route("/employees/bulk", post(bulk_create))
        .route("/shifts", get(list_shifts))
        .route("/shifts/{id}/confirm", patch(confirm_shift))
        .route("/shifts/{id}/assign", post(assign))
        .route("/shifts/export", get(export_range))
        .route("/shifts/export/{id}", get(export_one))
        .route("/auth/login", post(login))
        .with_state(shared.clone());
    let app = Router::new().nest("/api", api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api", addr), shared)
}

fn client(base_url: &str, session: Arc<Session>) -> Arc<HttpApiClient> {
    let config = ClientConfig {
        api_url: base_url.to_string(),
        timeout_secs: 5,
        ..ClientConfig::default()
    };
    Arc::new(HttpApiClient::new(config, session).unwrap())
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_requests_carry_bearer_token() {
    let (url, shared) = spawn_mock().await;
    let session = Arc::new(Session::in_memory());
    let api = client(&url, session.clone());

    api.list_employees().await.unwrap();
    session.login("jwt-abc", false).unwrap();
    let employees = api.list_employees().await.unwrap();

    assert_eq!(employees.len(), 2);
    assert_eq!(employees[1].availability_notes.as_deref(), Some("weekends only"));

    let headers = shared.lock().unwrap().auth_headers.clone();
    assert_eq!(headers, vec![None, Some("Bearer jwt-abc".to_string())]);
}

#[tokio::test]
async fn test_unauthorized_maps_to_api_error() {
    let (url, _shared) = spawn_mock().await;
    let api = client(&url, Arc::new(Session::in_memory()));

    let err = api.list_shifts().await.unwrap_err();
    assert!(matches!(err, ClientError::Api(ApiError::Unauthorized { .. })));
    assert_eq!(err.error_code(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_shift_listing_over_http() {
    let (url, _shared) = spawn_mock().await;
    let session = Arc::new(Session::in_memory());
    session.login("jwt", false).unwrap();

    let mut view = ShiftsView::new(client(&url, session), 8);
    view.refresh().await.unwrap();

    let first = view.listing().find(1).unwrap();
    assert_eq!(first.shift_date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    assert!(view.listing().find(2).unwrap().allows(ShiftAction::Export));

    view.set_query("evening");
    let ids: Vec<ShiftId> = view.listing().filtered().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![2]);
}

#[tokio::test]
async fn test_rejection_body_becomes_user_message() {
    let (url, _shared) = spawn_mock().await;
    let api = client(&url, Arc::new(Session::in_memory()));

    let err = api.confirm_shift(1).await.unwrap_err();
    assert_eq!(err.user_message(), "Shift has no assigned employees");
    assert_eq!(err.status().map(|s| s.as_u16()), Some(400));
    assert!(err.is_recoverable());

    api.confirm_shift(2).await.unwrap();
}

#[tokio::test]
async fn test_bulk_submit_wire_shape_and_rejections() {
    let (url, shared) = spawn_mock().await;
    let mut view = EmployeesView::new(client(&url, Arc::new(Session::in_memory())), 8);

    let bulk = view.bulk_mut();
    let first = bulk.rows()[0].key();
    let second = bulk.add_row();
    for (key, email) in [(first, "new@example.com"), (second, "taken@example.com")] {
        bulk.set(key, BulkField::FullName, "Casey Lin");
        bulk.set(key, BulkField::Email, email);
        bulk.set(key, BulkField::Role, "Porter");
        bulk.set(key, BulkField::Phone, "555-0199");
        bulk.set(key, BulkField::AvailabilityNotes, "mornings");
    }

    let outcome = view.submit_bulk().await.unwrap();
    assert_eq!(outcome.submitted, 2);
    assert_eq!(outcome.rejected_emails, vec!["taken@example.com"]);
    assert!(outcome.message().starts_with("Some emails were rejected"));
    assert_eq!(view.listing().records().len(), 2);
    assert_eq!(view.bulk().len(), 1);

    let body = shared.lock().unwrap().bulk_bodies[0].clone();
    assert_eq!(body[0]["fullName"], "Casey Lin");
    assert_eq!(body[0]["maxWeeklyHours"], 40);
    assert_eq!(body[1]["availabilityNotes"], "mornings");
}

#[tokio::test]
async fn test_assign_body_uses_employee_ids() {
    let (url, shared) = spawn_mock().await;
    let api = client(&url, Arc::new(Session::in_memory()));

    api.assign_employees(7, &[3, 1]).await.unwrap();
    let body = shared.lock().unwrap().assign_bodies[0].clone();
    assert_eq!(body, json!({ "employeeIds": [3, 1] }));
}

#[tokio::test]
async fn test_exports_and_file_names() {
    let (url, shared) = spawn_mock().await;
    let api = client(&url, Arc::new(Session::in_memory()));

    let single = api.export_shift(9).await.unwrap();
    assert_eq!(single.file_name, "Shift_9.pdf");
    assert_eq!(single.bytes, b"%PDF-1.4 shift 9");

    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
    );
    let doc = api.export_range(range).await.unwrap();
    assert_eq!(doc.file_name, "Shifts_2024-03-01_to_2024-03-31.pdf");
    assert_eq!(
        shared.lock().unwrap().export_range,
        Some(("2024-03-01".to_string(), "2024-03-31".to_string()))
    );

    let dir = tempfile::tempdir().unwrap();
    let saved = doc.save_to(dir.path()).unwrap();
    assert!(saved.ends_with("Shifts_2024-03-01_to_2024-03-31.pdf"));
}

#[tokio::test]
async fn test_login_flow_sets_session() {
    let (url, shared) = spawn_mock().await;
    let session = Arc::new(Session::in_memory());
    let api = client(&url, session.clone());
    let auth = AuthFlow::new(api.clone(), session.clone());

    let err = auth
        .login(&Credentials::new("admin@example.com", "wrong"), false)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Invalid email or password.");
    assert_eq!(Route::Shifts.resolve(&session), Route::Login);

    auth.login(&Credentials::new("admin@example.com", "secret"), true)
        .await
        .unwrap();
    assert_eq!(Route::Shifts.resolve(&session), Route::Shifts);

    api.list_shifts().await.unwrap();
    let last = shared.lock().unwrap().auth_headers.last().cloned().flatten();
    assert_eq!(last.as_deref(), Some("Bearer jwt-123"));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(&format!("http://{}/api", addr), Arc::new(Session::in_memory()));
    let err = api.list_employees().await.unwrap_err();
    assert_eq!(err.error_code(), "TRANSPORT_ERROR");
    assert!(err.user_message().contains("load employees"));
}
