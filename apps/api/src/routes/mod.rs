pub mod diagnostics;

use std::any::Any;
use std::path::Path;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::cors::cors_middleware;
use crate::errors::{AppError, ErrorBody};
use crate::optimize::handlers;
use crate::state::AppState;

async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "not found".to_string(),
            details: None,
        }),
    )
}

fn api_router(max_body_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/optimize", post(handlers::handle_optimize))
        .route("/test", get(diagnostics::handle_test))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_body_bytes))
}

/// Serves the front-end directory, falling back to `index.html`.
fn static_files(dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")))
}

pub fn build_router(state: AppState) -> Router {
    let base_path = state.config.base_path.clone();
    let static_dir = state.config.static_dir.clone();

    let api = api_router(state.config.max_body_bytes).with_state(state);

    // axum refuses to nest at the root
    let app = if base_path.is_empty() {
        Router::new().merge(api)
    } else {
        Router::new().nest(&base_path, api)
    };

    let app = match static_dir {
        Some(dir) => app.fallback_service(static_files(&dir)),
        None => app.fallback(not_found),
    };

    with_middleware(app)
}

/// Panic recovery inside CORS so even a crashed handler answers with the
/// error envelope and the CORS header set.
pub fn with_middleware(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(cors_middleware))
        .layer(TraceLayer::new_for_http())
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic_message(err.as_ref());
    AppError::Internal(anyhow::anyhow!("handler panicked: {message}")).into_response()
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
