use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use axum_valid::Valid;

use crate::{
    dao::models::{EntityId, OfferEntity, PhraseEntity, TeamEntity, VideoEntity},
    dto::content::{
        CreateOfferRequest, CreatePhraseRequest, CreateTeamRequest, CreateVideoRequest,
        UpdateOfferRequest, UpdatePhraseRequest, UpdateTeamRequest, UpdateVideoRequest,
    },
    error::AppError,
    services::content_service,
    state::SharedState,
};

/// Operator endpoints mutating the venue content shown on displays.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/teams", get(list_teams).post(create_team))
        .route(
            "/api/teams/{id}",
            get(get_team).put(update_team).delete(delete_team),
        )
        .route("/api/videos", get(list_videos).post(create_video))
        .route(
            "/api/videos/{id}",
            get(get_video).put(update_video).delete(delete_video),
        )
        .route("/api/offers", get(list_offers).post(create_offer))
        .route(
            "/api/offers/{id}",
            get(get_offer).put(update_offer).delete(delete_offer),
        )
        .route("/api/phrases", get(list_phrases).post(create_phrase))
        .route(
            "/api/phrases/{id}",
            get(get_phrase).put(update_phrase).delete(delete_phrase),
        )
}

/// List teams on the waiting list, oldest first.
#[utoipa::path(
    get,
    path = "/api/teams",
    tag = "teams",
    responses((status = 200, description = "Waiting teams", body = [TeamEntity]))
)]
pub async fn list_teams(
    State(state): State<SharedState>,
) -> Result<Json<Vec<TeamEntity>>, AppError> {
    Ok(Json(content_service::list_teams(&state).await?))
}

/// Retrieve a team by its identifier.
#[utoipa::path(
    get,
    path = "/api/teams/{id}",
    tag = "teams",
    params(("id" = u32, Path, description = "Identifier of the team")),
    responses(
        (status = 200, description = "Team", body = TeamEntity),
        (status = 404, description = "Unknown team")
    )
)]
pub async fn get_team(
    State(state): State<SharedState>,
    Path(id): Path<EntityId>,
) -> Result<Json<TeamEntity>, AppError> {
    Ok(Json(content_service::get_team(&state, id).await?))
}

/// Add a team to the waiting list.
#[utoipa::path(
    post,
    path = "/api/teams",
    tag = "teams",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created", body = TeamEntity),
        (status = 400, description = "Invalid team")
    )
)]
pub async fn create_team(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateTeamRequest>>,
) -> Result<(StatusCode, Json<TeamEntity>), AppError> {
    let team = content_service::create_team(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

/// Update the provided fields of a team.
#[utoipa::path(
    put,
    path = "/api/teams/{id}",
    tag = "teams",
    params(("id" = u32, Path, description = "Identifier of the team")),
    request_body = UpdateTeamRequest,
    responses(
        (status = 200, description = "Team updated", body = TeamEntity),
        (status = 404, description = "Unknown team")
    )
)]
pub async fn update_team(
    State(state): State<SharedState>,
    Path(id): Path<EntityId>,
    Valid(Json(payload)): Valid<Json<UpdateTeamRequest>>,
) -> Result<Json<TeamEntity>, AppError> {
    Ok(Json(content_service::update_team(&state, id, payload).await?))
}

/// Remove a team from the waiting list.
#[utoipa::path(
    delete,
    path = "/api/teams/{id}",
    tag = "teams",
    params(("id" = u32, Path, description = "Identifier of the team")),
    responses(
        (status = 204, description = "Team deleted"),
        (status = 404, description = "Unknown team")
    )
)]
pub async fn delete_team(
    State(state): State<SharedState>,
    Path(id): Path<EntityId>,
) -> Result<StatusCode, AppError> {
    content_service::delete_team(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the video playlist in playback order.
#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses((status = 200, description = "Videos", body = [VideoEntity]))
)]
pub async fn list_videos(
    State(state): State<SharedState>,
) -> Result<Json<Vec<VideoEntity>>, AppError> {
    Ok(Json(content_service::list_videos(&state).await?))
}

/// Retrieve a video by its identifier.
#[utoipa::path(
    get,
    path = "/api/videos/{id}",
    tag = "videos",
    params(("id" = u32, Path, description = "Identifier of the video")),
    responses(
        (status = 200, description = "Video", body = VideoEntity),
        (status = 404, description = "Unknown video")
    )
)]
pub async fn get_video(
    State(state): State<SharedState>,
    Path(id): Path<EntityId>,
) -> Result<Json<VideoEntity>, AppError> {
    Ok(Json(content_service::get_video(&state, id).await?))
}

/// Append a video to the playlist.
#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Video registered", body = VideoEntity),
        (status = 400, description = "Invalid video")
    )
)]
pub async fn create_video(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateVideoRequest>>,
) -> Result<(StatusCode, Json<VideoEntity>), AppError> {
    let video = content_service::create_video(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(video)))
}

#[utoipa::path(
    put,
    path = "/api/videos/{id}",
    tag = "videos",
    params(("id" = u32, Path, description = "Identifier of the video")),
    request_body = UpdateVideoRequest,
    responses(
        (status = 200, description = "Video updated", body = VideoEntity),
        (status = 404, description = "Unknown video")
    )
)]
pub async fn update_video(
    State(state): State<SharedState>,
    Path(id): Path<EntityId>,
    Valid(Json(payload)): Valid<Json<UpdateVideoRequest>>,
) -> Result<Json<VideoEntity>, AppError> {
    Ok(Json(content_service::update_video(&state, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/videos/{id}",
    tag = "videos",
    params(("id" = u32, Path, description = "Identifier of the video")),
    responses(
        (status = 204, description = "Video deleted"),
        (status = 404, description = "Unknown video")
    )
)]
pub async fn delete_video(
    State(state): State<SharedState>,
    Path(id): Path<EntityId>,
) -> Result<StatusCode, AppError> {
    content_service::delete_video(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List every special offer, active or not.
#[utoipa::path(
    get,
    path = "/api/offers",
    tag = "offers",
    responses((status = 200, description = "Offers", body = [OfferEntity]))
)]
pub async fn list_offers(
    State(state): State<SharedState>,
) -> Result<Json<Vec<OfferEntity>>, AppError> {
    Ok(Json(content_service::list_offers(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/offers/{id}",
    tag = "offers",
    params(("id" = u32, Path, description = "Identifier of the offer")),
    responses(
        (status = 200, description = "Offer", body = OfferEntity),
        (status = 404, description = "Unknown offer")
    )
)]
pub async fn get_offer(
    State(state): State<SharedState>,
    Path(id): Path<EntityId>,
) -> Result<Json<OfferEntity>, AppError> {
    Ok(Json(content_service::get_offer(&state, id).await?))
}

/// Create a special offer.
#[utoipa::path(
    post,
    path = "/api/offers",
    tag = "offers",
    request_body = CreateOfferRequest,
    responses(
        (status = 201, description = "Offer created", body = OfferEntity),
        (status = 400, description = "Invalid offer")
    )
)]
pub async fn create_offer(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateOfferRequest>>,
) -> Result<(StatusCode, Json<OfferEntity>), AppError> {
    let offer = content_service::create_offer(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(offer)))
}

/// Update an offer, including toggling its `active` flag.
#[utoipa::path(
    put,
    path = "/api/offers/{id}",
    tag = "offers",
    params(("id" = u32, Path, description = "Identifier of the offer")),
    request_body = UpdateOfferRequest,
    responses(
        (status = 200, description = "Offer updated", body = OfferEntity),
        (status = 404, description = "Unknown offer")
    )
)]
pub async fn update_offer(
    State(state): State<SharedState>,
    Path(id): Path<EntityId>,
    Valid(Json(payload)): Valid<Json<UpdateOfferRequest>>,
) -> Result<Json<OfferEntity>, AppError> {
    Ok(Json(content_service::update_offer(&state, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/offers/{id}",
    tag = "offers",
    params(("id" = u32, Path, description = "Identifier of the offer")),
    responses(
        (status = 204, description = "Offer deleted"),
        (status = 404, description = "Unknown offer")
    )
)]
pub async fn delete_offer(
    State(state): State<SharedState>,
    Path(id): Path<EntityId>,
) -> Result<StatusCode, AppError> {
    content_service::delete_offer(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List every motivational phrase, active or not.
#[utoipa::path(
    get,
    path = "/api/phrases",
    tag = "phrases",
    responses((status = 200, description = "Phrases", body = [PhraseEntity]))
)]
pub async fn list_phrases(
    State(state): State<SharedState>,
) -> Result<Json<Vec<PhraseEntity>>, AppError> {
    Ok(Json(content_service::list_phrases(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/phrases/{id}",
    tag = "phrases",
    params(("id" = u32, Path, description = "Identifier of the phrase")),
    responses(
        (status = 200, description = "Phrase", body = PhraseEntity),
        (status = 404, description = "Unknown phrase")
    )
)]
pub async fn get_phrase(
    State(state): State<SharedState>,
    Path(id): Path<EntityId>,
) -> Result<Json<PhraseEntity>, AppError> {
    Ok(Json(content_service::get_phrase(&state, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/phrases",
    tag = "phrases",
    request_body = CreatePhraseRequest,
    responses(
        (status = 201, description = "Phrase created", body = PhraseEntity),
        (status = 400, description = "Invalid phrase")
    )
)]
pub async fn create_phrase(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreatePhraseRequest>>,
) -> Result<(StatusCode, Json<PhraseEntity>), AppError> {
    let phrase = content_service::create_phrase(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(phrase)))
}

#[utoipa::path(
    put,
    path = "/api/phrases/{id}",
    tag = "phrases",
    params(("id" = u32, Path, description = "Identifier of the phrase")),
    request_body = UpdatePhraseRequest,
    responses(
        (status = 200, description = "Phrase updated", body = PhraseEntity),
        (status = 404, description = "Unknown phrase")
    )
)]
pub async fn update_phrase(
    State(state): State<SharedState>,
    Path(id): Path<EntityId>,
    Valid(Json(payload)): Valid<Json<UpdatePhraseRequest>>,
) -> Result<Json<PhraseEntity>, AppError> {
    Ok(Json(content_service::update_phrase(&state, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/phrases/{id}",
    tag = "phrases",
    params(("id" = u32, Path, description = "Identifier of the phrase")),
    responses(
        (status = 204, description = "Phrase deleted"),
        (status = 404, description = "Unknown phrase")
    )
)]
pub async fn delete_phrase(
    State(state): State<SharedState>,
    Path(id): Path<EntityId>,
) -> Result<StatusCode, AppError> {
    content_service::delete_phrase(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
