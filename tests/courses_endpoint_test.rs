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

async fn create_teacher(app: &axum::Router, name: &str, email: &str) -> i64 {
    let (status, body) = request(
        app,
        "POST",
        "/teachers",
        Some(json!({
            "name": name,
            "email": email,
            "phone": "555",
            "subject": "Math",
            "experience": 5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_create_course_includes_teacher_name() {
    let (app, _temp) = setup_test_app().await;
    let teacher_id = create_teacher(&app, "A. Lin", "a@x.com").await;
    assert_eq!(teacher_id, 1);

    let (status, body) = request(
        &app,
        "POST",
        "/courses",
        Some(json!({"name": "Algebra", "teacher_id": 1, "credits": 3})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["teacher_id"], 1);
    assert_eq!(body["teacher_name"], "A. Lin");
    assert_eq!(body["credits"], 3);
    assert_eq!(body["description"], Value::Null);
}

#[tokio::test]
async fn test_course_description_reads_back_after_create() {
    let (app, _temp) = setup_test_app().await;
    create_teacher(&app, "A. Lin", "a@x.com").await;

    let (status, created) = request(
        &app,
        "POST",
        "/courses",
        Some(json!({
            "name": "Algebra",
            "description": "Linear equations",
            "teacher_id": 1,
            "credits": 3
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["description"], "Linear equations");

    let (status, fetched) = request(&app, "GET", "/courses/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (_, list) = request(&app, "GET", "/api/courses", None).await;
    assert_eq!(list[0]["description"], "Linear equations");
}

#[tokio::test]
async fn test_create_course_with_unknown_teacher_is_unprocessable() {
    let (app, _temp) = setup_test_app().await;

    let (status, body) = request(
        &app,
        "POST",
        "/courses",
        Some(json!({"name": "Algebra", "teacher_id": 999999, "credits": 3})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("999999"));

    let (_, list) = request(&app, "GET", "/courses", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_create_course_missing_credits_is_bad_request() {
    let (app, _temp) = setup_test_app().await;
    create_teacher(&app, "A. Lin", "a@x.com").await;

    let (status, _) = request(
        &app,
        "POST",
        "/courses",
        Some(json!({"name": "Algebra", "teacher_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_course_moves_to_other_teacher() {
    let (app, _temp) = setup_test_app().await;
    create_teacher(&app, "A. Lin", "a@x.com").await;
    let osei = create_teacher(&app, "B. Osei", "b@x.com").await;

    let (_, created) = request(
        &app,
        "POST",
        "/courses",
        Some(json!({"name": "Algebra", "description": "Intro", "teacher_id": 1, "credits": 3})),
    )
    .await;

    let (status, body) = request(
        &app,
        "PUT",
        "/courses/1",
        Some(json!({"name": "Algebra II", "description": null, "teacher_id": osei, "credits": 4})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Algebra II");
    assert_eq!(body["description"], Value::Null);
    assert_eq!(body["teacher_name"], "B. Osei");
    assert_eq!(body["credits"], 4);
    assert_eq!(body["created_at"], created["created_at"]);
}

#[tokio::test]
async fn test_update_course_with_unknown_teacher_is_unprocessable() {
    let (app, _temp) = setup_test_app().await;
    create_teacher(&app, "A. Lin", "a@x.com").await;
    request(
        &app,
        "POST",
        "/courses",
        Some(json!({"name": "Algebra", "teacher_id": 1, "credits": 3})),
    )
    .await;

    let (status, _) = request(
        &app,
        "PUT",
        "/courses/1",
        Some(json!({"name": "Algebra", "teacher_id": 50, "credits": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_missing_course_is_not_found() {
    let (app, _temp) = setup_test_app().await;
    create_teacher(&app, "A. Lin", "a@x.com").await;

    let (status, _) = request(
        &app,
        "PUT",
        "/courses/9",
        Some(json!({"name": "Algebra", "teacher_id": 1, "credits": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_course() {
    let (app, _temp) = setup_test_app().await;
    create_teacher(&app, "A. Lin", "a@x.com").await;
    request(
        &app,
        "POST",
        "/courses",
        Some(json!({"name": "Algebra", "teacher_id": 1, "credits": 3})),
    )
    .await;

    let (status, _) = request(&app, "DELETE", "/courses/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request(&app, "DELETE", "/courses/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
