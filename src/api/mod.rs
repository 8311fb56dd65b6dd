pub mod courses;
pub mod health;
pub mod records;
pub mod students;
pub mod teachers;

use crate::db::Repository;
use crate::domain::{Course, Student, Teacher};
use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
}

impl AppState {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Also served under /api, the prefix the browser frontend uses.
    Router::new()
        .merge(resource_routes())
        .nest("/api", resource_routes())
        .layer(cors)
        .with_state(state)
}

fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route(
            "/students",
            get(records::list::<Student>).post(students::create_student),
        )
        .route(
            "/students/:id",
            put(students::update_student)
                .get(records::get::<Student>)
                .delete(records::delete::<Student>),
        )
        .route(
            "/teachers",
            get(records::list::<Teacher>).post(teachers::create_teacher),
        )
        .route(
            "/teachers/:id",
            put(teachers::update_teacher)
                .get(records::get::<Teacher>)
                .delete(records::delete::<Teacher>),
        )
        .route(
            "/courses",
            get(records::list::<Course>).post(courses::create_course),
        )
        .route(
            "/courses/:id",
            put(courses::update_course)
                .get(records::get::<Course>)
                .delete(records::delete::<Course>),
        )
}
