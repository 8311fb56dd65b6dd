use axum::http::StatusCode;
use school_registry::api::{self, AppState};
use school_registry::db::init_db;
use school_registry::Repository;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

async fn setup_test_app() -> (axum::Router, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");
    let state = AppState::new(Arc::new(Repository::new(pool)));
    (api::create_router(state), temp_dir)
}

async fn request(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = axum::http::Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn maya() -> Value {
    json!({
        "name": "Maya Chen",
        "email": "maya@school.test",
        "phone": "555-0101",
        "grade": "10th",
        "date_of_birth": "2008-04-17"
    })
}

#[tokio::test]
async fn test_list_students_starts_empty() {
    let (app, _temp) = setup_test_app().await;

    let (status, body) = request(&app, "GET", "/students", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_create_student_returns_created_representation() {
    let (app, _temp) = setup_test_app().await;

    let (status, body) = request(&app, "POST", "/students", Some(maya())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Maya Chen");
    assert_eq!(body["email"], "maya@school.test");
    assert_eq!(body["date_of_birth"], "2008-04-17");
    assert!(body["created_at"].is_string());

    let (status, list) = request(&app, "GET", "/students", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([body]));
}

#[tokio::test]
async fn test_create_student_duplicate_email_is_conflict() {
    let (app, _temp) = setup_test_app().await;

    let (status, _) = request(&app, "POST", "/students", Some(maya())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(&app, "POST", "/students", Some(maya())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("maya@school.test"));
}

#[tokio::test]
async fn test_create_student_bad_date_is_bad_request() {
    let (app, _temp) = setup_test_app().await;

    let mut payload = maya();
    payload["date_of_birth"] = json!("17-04-2008");
    let (status, body) = request(&app, "POST", "/students", Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("date_of_birth"));
}

#[tokio::test]
async fn test_create_student_missing_field_is_bad_request() {
    let (app, _temp) = setup_test_app().await;

    let mut payload = maya();
    payload.as_object_mut().unwrap().remove("phone");
    let (status, body) = request(&app, "POST", "/students", Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, list) = request(&app, "GET", "/students", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_update_student_replaces_fields() {
    let (app, _temp) = setup_test_app().await;

    let (_, created) = request(&app, "POST", "/students", Some(maya())).await;

    let mut payload = maya();
    payload["grade"] = json!("11th");
    payload["phone"] = json!("555-0199");
    let (status, body) = request(&app, "PUT", "/students/1", Some(payload)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grade"], "11th");
    assert_eq!(body["phone"], "555-0199");
    assert_eq!(body["created_at"], created["created_at"]);
}

#[tokio::test]
async fn test_update_missing_student_is_not_found() {
    let (app, _temp) = setup_test_app().await;

    let (status, _) = request(&app, "PUT", "/students/77", Some(maya())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_student_then_not_found() {
    let (app, _temp) = setup_test_app().await;

    request(&app, "POST", "/students", Some(maya())).await;

    let (status, body) = request(&app, "DELETE", "/students/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, list) = request(&app, "GET", "/students", None).await;
    assert_eq!(list, json!([]));

    let (status, _) = request(&app, "DELETE", "/students/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = request(&app, "GET", "/students/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_student_by_id() {
    let (app, _temp) = setup_test_app().await;

    let (_, created) = request(&app, "POST", "/students", Some(maya())).await;
    let (status, body) = request(&app, "GET", "/students/1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);
}
