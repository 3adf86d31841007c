pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::coaching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/generate-question",
            post(handlers::handle_generate_question),
        )
        .route("/coach-answer", post(handlers::handle_coach_answer))
        .with_state(state)
}
