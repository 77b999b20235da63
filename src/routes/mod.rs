mod health;
mod practice;

use axum::response::{IntoResponse, Response};
use axum::Router;

use crate::response::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .nest("/api/sessions", practice::sessions_router())
        .nest("/api/usage", practice::usage_router());

    for path in ["/health", "/api/health"] {
        app = app.nest(path, health::router());
    }

    app.fallback(fallback_handler).with_state(state)
}

async fn fallback_handler() -> Response {
    AppError::not_found("Endpoint not found").into_response()
}
