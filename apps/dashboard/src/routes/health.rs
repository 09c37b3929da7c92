/// GET /
/// Plain-text liveness check.
pub async fn liveness_handler() -> &'static str {
    "Backend is running"
}
