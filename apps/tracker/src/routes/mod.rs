pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::jobs::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/", get(handlers::handle_list))
        .route(
            "/add",
            get(handlers::handle_add_form).post(handlers::handle_add),
        )
        .route(
            "/update_job_status/:id",
            post(handlers::handle_update_status),
        )
        .route("/delete/:id", post(handlers::handle_delete))
        .route(
            "/edit/:id",
            get(handlers::handle_edit_form).post(handlers::handle_edit),
        )
        .with_state(state)
}
