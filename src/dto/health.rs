use serde::Serialize;
use utoipa::ToSchema;

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Number of display clients currently attached to the broadcast hub.
    pub displays: usize,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(displays: usize) -> Self {
        Self {
            status: "ok".to_string(),
            displays,
        }
    }

    /// Create a health response indicating the content store cannot be read.
    pub fn degraded(displays: usize) -> Self {
        Self {
            status: "degraded".to_string(),
            displays,
        }
    }
}
