//! HTTP surface: router, shared state and per-resource handlers.

mod auth;
mod error;
mod leads;
mod projects;

pub use auth::AuthUser;
pub use error::ApiError;

use axum::routing::{delete, get, post, put};
use axum::Router;
use clienttrack_core::db::Database;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::jwt::JwtKeys;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub keys: JwtKeys,
}

pub fn create_router(db: Database, keys: JwtKeys) -> Router {
    let state = AppState { db, keys };

    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/leads", post(leads::create_lead).get(leads::get_leads))
        .route("/leads/{id}", delete(leads::delete_lead))
        .route(
            "/projects",
            post(projects::create_project).get(projects::get_projects),
        )
        .route("/projects/dashboard", get(projects::get_dashboard))
        .route("/projects/{id}", put(projects::update_project))
        .route("/projects/{id}/notes", post(projects::add_follow_up_note))
        .route("/projects/convert/{lead_id}", post(projects::convert_lead))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
