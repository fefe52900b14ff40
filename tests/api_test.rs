//! Integration tests for API endpoints.
//!
//! The router runs over the in-memory Unit of Work, so requests go through
//! the real middleware, extractors and services without a database or Redis.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use lms_api::{create_router, AppState};

use common::{services_at, store};

fn app() -> Router {
    let store = store();
    create_router(AppState::from_container(&services_at(&store, Utc::now())))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Register an account and return its token and id
async fn register(app: &Router, name: &str, role: &str) -> (String, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "email": format!("{}@example.com", name),
            "password": "secret1",
            "name": name,
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let token = body["data"]["accessToken"].as_str().unwrap().to_string();
    let id = body["data"]["user"]["id"].as_str().unwrap().to_string();
    (token, id)
}

#[tokio::test]
async fn test_root_and_health() {
    let app = app();

    let (status, _) = send(&app, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"]["database"]["status"], "disabled");
}

#[tokio::test]
async fn test_protected_routes_require_bearer_token() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/api/courses", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, Method::GET, "/api/courses", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validation_and_duplicates() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"email": "not-an-email", "password": "secret1", "name": "Ada"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"email": "ada@example.com", "password": "secret1", "name": "Ada"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["user"]["role"], "student");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"email": "ADA@example.com", "password": "secret1", "name": "Ada"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": "ada@example.com", "password": "wrong-one"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_assignment_flow_over_http() {
    let app = app();
    let (teacher, _) = register(&app, "tess", "teacher").await;
    let (student, student_id) = register(&app, "sam", "student").await;

    let start = Utc::now();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/courses",
        Some(&teacher),
        Some(json!({
            "title": "Databases",
            "description": "Relational theory",
            "startDate": start.to_rfc3339(),
            "endDate": (start + Duration::days(90)).to_rfc3339(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let course_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/courses/{}/enroll", course_id),
        Some(&student),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["title"], "Databases");

    // Students cannot create assignments
    let assignment = json!({
        "courseId": course_id,
        "title": "HW1",
        "description": "Normalize the schema",
        "deadline": (Utc::now() + Duration::days(7)).to_rfc3339(),
        "totalPoints": 100,
    });
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/assignments",
        Some(&student),
        Some(assignment.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/assignments",
        Some(&teacher),
        Some(assignment),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let assignment_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/assignments/{}/submit", assignment_id),
        Some(&student),
        Some(json!({"fileUrl": "https://files.example.com/hw1.pdf"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["grade"], Value::Null);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/assignments/grade",
        Some(&teacher),
        Some(json!({
            "assignmentId": assignment_id,
            "studentId": student_id,
            "grade": 150,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/assignments/grade",
        Some(&teacher),
        Some(json!({
            "assignmentId": assignment_id,
            "studentId": student_id,
            "grade": 90,
            "feedback": "Good work",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/assignments/{}", assignment_id),
        Some(&student),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["submission"]["grade"], 90.0);
    assert_eq!(body["data"]["submission"]["feedback"], "Good work");
    assert!(body["data"].get("submissions").is_none());

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/assignments/course/{}", course_id),
        Some(&teacher),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["submissions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_course_is_not_found() {
    let app = app();
    let (student, _) = register(&app, "sam", "student").await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/courses/{}/enroll", uuid::Uuid::new_v4()),
        Some(&student),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_account_routes_act_on_the_caller() {
    let app = app();
    let (token, id) = register(&app, "sam", "student").await;

    let (status, body) = send(&app, Method::GET, "/api/auth/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.as_str());
    assert!(body["data"].get("passwordHash").is_none());

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/auth/settings",
        Some(&token),
        Some(json!({"settingsType": "display", "settings": {"theme": "neon"}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/auth/settings",
        Some(&token),
        Some(json!({"settingsType": "language", "settings": "Deutsch"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["settings"]["language"], "Deutsch");

    let (status, _) = send(&app, Method::DELETE, "/api/auth/account", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    // The token outlives the account but no longer authenticates
    let (status, _) = send(&app, Method::GET, "/api/auth/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_assignment_bodies_are_checked_after_role_and_ownership() {
    let app = app();
    let (teacher, _) = register(&app, "tess", "teacher").await;
    let (rival, _) = register(&app, "rita", "teacher").await;
    let (student, _) = register(&app, "sam", "student").await;

    let start = Utc::now();
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/courses",
        Some(&teacher),
        Some(json!({
            "title": "Databases",
            "description": "Relational theory",
            "startDate": start.to_rfc3339(),
            "endDate": (start + Duration::days(90)).to_rfc3339(),
        })),
    )
    .await;
    let course_id = body["data"]["id"].as_str().unwrap().to_string();

    let blank_title = json!({
        "courseId": course_id,
        "title": "",
        "description": "d",
        "deadline": (start + Duration::days(7)).to_rfc3339(),
        "totalPoints": 10,
    });
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/assignments",
        Some(&student),
        Some(blank_title.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{}", body);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/assignments",
        Some(&rival),
        Some(json!({"courseId": course_id})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/assignments",
        Some(&teacher),
        Some(json!({"courseId": uuid::Uuid::new_v4(), "title": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/assignments",
        Some(&teacher),
        Some(blank_title),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/assignments",
        Some(&teacher),
        Some(json!({
            "courseId": course_id,
            "title": "HW1",
            "description": "d",
            "deadline": (start + Duration::days(7)).to_rfc3339(),
            "totalPoints": 10,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let assignment_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/assignments/grade",
        Some(&student),
        Some(json!({"assignmentId": assignment_id})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/assignments/{}", assignment_id),
        Some(&teacher),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Assignment retrieved successfully");

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/assignments/course/{}", course_id),
        Some(&teacher),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Assignments retrieved successfully");
}
