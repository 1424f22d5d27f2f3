pub mod bfhl;
pub mod health;
pub mod timeout;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/bfhl", post(bfhl::bfhl))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            timeout::request_timeout,
        ))
        .with_state(state)
}
