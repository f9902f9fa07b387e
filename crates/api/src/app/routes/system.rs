/// Liveness probe.
pub async fn ping() -> &'static str {
    "pong"
}
