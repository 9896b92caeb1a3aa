use axum::Json;
use serde_json::{json, Value};

/// GET {base}/test
/// Liveness check that never touches the provider.
pub async fn handle_test() -> Json<Value> {
    Json(diagnostic_body())
}

pub fn diagnostic_body() -> Value {
    json!({
        "status": "ok",
        "message": "API test succeeded"
    })
}
