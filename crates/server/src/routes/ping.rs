use axum::Json;

/// Liveness check
pub async fn ping() -> Json<()> {
    Json(())
}
