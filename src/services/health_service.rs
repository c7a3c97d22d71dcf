use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether the content store answers, along with the number of attached displays.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let displays = state.hub().connection_count().await;

    match state.store().get_config().await {
        Ok(_) => HealthResponse::ok(displays),
        Err(err) => {
            warn!(error = %err, "content store health check failed (degraded mode)");
            HealthResponse::degraded(displays)
        }
    }
}
