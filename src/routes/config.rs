use axum::{Json, Router, extract::State, routing::get};
use axum_valid::Valid;

use crate::{
    dao::models::DisplayConfigEntity, dto::content::UpdateConfigRequest, error::AppError,
    services::content_service, state::SharedState,
};

/// Display configuration endpoints.
pub fn router() -> Router<SharedState> {
    Router::new().route("/api/config", get(get_config).put(update_config))
}

/// Read the current display configuration.
#[utoipa::path(
    get,
    path = "/api/config",
    tag = "config",
    responses((status = 200, description = "Display configuration", body = DisplayConfigEntity))
)]
pub async fn get_config(
    State(state): State<SharedState>,
) -> Result<Json<DisplayConfigEntity>, AppError> {
    Ok(Json(content_service::get_config(&state).await?))
}

/// Merge the provided settings into the display configuration.
#[utoipa::path(
    put,
    path = "/api/config",
    tag = "config",
    request_body = UpdateConfigRequest,
    responses(
        (status = 200, description = "Configuration updated", body = DisplayConfigEntity),
        (status = 400, description = "Timing out of range")
    )
)]
pub async fn update_config(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<UpdateConfigRequest>>,
) -> Result<Json<DisplayConfigEntity>, AppError> {
    Ok(Json(content_service::update_config(&state, payload).await?))
}
