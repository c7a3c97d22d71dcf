//! Business logic behind the `/api/*` mutation gateway. Every successful write
//! to the content store is handed to the broadcast hub so attached displays
//! converge on the new state. Writes are serialized with their broadcast so
//! displays see events in commit order.

use tracing::debug;

use crate::{
    dao::models::{
        DisplayConfigEntity, EntityId, OfferEntity, PhraseEntity, TeamEntity, VideoEntity,
    },
    dto::{
        content::{
            CreateOfferRequest, CreatePhraseRequest, CreateTeamRequest, CreateVideoRequest,
            UpdateConfigRequest, UpdateOfferRequest, UpdatePhraseRequest, UpdateTeamRequest,
            UpdateVideoRequest,
        },
        ws::{DeletedEntity, DisplayMessage},
    },
    error::ServiceError,
    state::SharedState,
};

fn not_found(kind: &str, id: EntityId) -> ServiceError {
    ServiceError::NotFound(format!("{kind} `{id}` not found"))
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

pub async fn list_teams(state: &SharedState) -> Result<Vec<TeamEntity>, ServiceError> {
    Ok(state.store().list_teams().await?)
}

pub async fn get_team(state: &SharedState, id: EntityId) -> Result<TeamEntity, ServiceError> {
    state
        .store()
        .find_team(id)
        .await?
        .ok_or_else(|| not_found("team", id))
}

pub async fn create_team(
    state: &SharedState,
    payload: CreateTeamRequest,
) -> Result<TeamEntity, ServiceError> {
    let _writes = state.lock_writes().await;
    let team = state.store().create_team(payload.into()).await?;
    debug!(team_id = team.id, name = %team.name, "team created");
    state.publish(DisplayMessage::TeamCreated(team.clone())).await;
    Ok(team)
}

pub async fn update_team(
    state: &SharedState,
    id: EntityId,
    payload: UpdateTeamRequest,
) -> Result<TeamEntity, ServiceError> {
    let _writes = state.lock_writes().await;
    let team = state
        .store()
        .update_team(id, payload.into())
        .await?
        .ok_or_else(|| not_found("team", id))?;
    state.publish(DisplayMessage::TeamUpdated(team.clone())).await;
    Ok(team)
}

pub async fn delete_team(state: &SharedState, id: EntityId) -> Result<(), ServiceError> {
    let _writes = state.lock_writes().await;
    if !state.store().delete_team(id).await? {
        return Err(not_found("team", id));
    }
    state
        .publish(DisplayMessage::TeamDeleted(DeletedEntity { id }))
        .await;
    Ok(())
}

// ---------------------------------------------------------------------------
// Videos
// ---------------------------------------------------------------------------

pub async fn list_videos(state: &SharedState) -> Result<Vec<VideoEntity>, ServiceError> {
    Ok(state.store().list_videos().await?)
}

pub async fn get_video(state: &SharedState, id: EntityId) -> Result<VideoEntity, ServiceError> {
    state
        .store()
        .find_video(id)
        .await?
        .ok_or_else(|| not_found("video", id))
}

pub async fn create_video(
    state: &SharedState,
    payload: CreateVideoRequest,
) -> Result<VideoEntity, ServiceError> {
    let _writes = state.lock_writes().await;
    let video = state.store().create_video(payload.into()).await?;
    debug!(video_id = video.id, url = %video.url, "video registered");
    state
        .publish(DisplayMessage::VideoCreated(video.clone()))
        .await;
    Ok(video)
}

pub async fn update_video(
    state: &SharedState,
    id: EntityId,
    payload: UpdateVideoRequest,
) -> Result<VideoEntity, ServiceError> {
    let _writes = state.lock_writes().await;
    let video = state
        .store()
        .update_video(id, payload.into())
        .await?
        .ok_or_else(|| not_found("video", id))?;
    state
        .publish(DisplayMessage::VideoUpdated(video.clone()))
        .await;
    Ok(video)
}

pub async fn delete_video(state: &SharedState, id: EntityId) -> Result<(), ServiceError> {
    let _writes = state.lock_writes().await;
    if !state.store().delete_video(id).await? {
        return Err(not_found("video", id));
    }
    state
        .publish(DisplayMessage::VideoDeleted(DeletedEntity { id }))
        .await;
    Ok(())
}

// ---------------------------------------------------------------------------
// Offers
// ---------------------------------------------------------------------------

pub async fn list_offers(state: &SharedState) -> Result<Vec<OfferEntity>, ServiceError> {
    Ok(state.store().list_offers().await?)
}

pub async fn get_offer(state: &SharedState, id: EntityId) -> Result<OfferEntity, ServiceError> {
    state
        .store()
        .find_offer(id)
        .await?
        .ok_or_else(|| not_found("offer", id))
}

pub async fn create_offer(
    state: &SharedState,
    payload: CreateOfferRequest,
) -> Result<OfferEntity, ServiceError> {
    let _writes = state.lock_writes().await;
    let offer = state.store().create_offer(payload.into()).await?;
    state
        .publish(DisplayMessage::OfferCreated(offer.clone()))
        .await;
    Ok(offer)
}

pub async fn update_offer(
    state: &SharedState,
    id: EntityId,
    payload: UpdateOfferRequest,
) -> Result<OfferEntity, ServiceError> {
    let _writes = state.lock_writes().await;
    let offer = state
        .store()
        .update_offer(id, payload.into())
        .await?
        .ok_or_else(|| not_found("offer", id))?;
    state
        .publish(DisplayMessage::OfferUpdated(offer.clone()))
        .await;
    Ok(offer)
}

pub async fn delete_offer(state: &SharedState, id: EntityId) -> Result<(), ServiceError> {
    let _writes = state.lock_writes().await;
    if !state.store().delete_offer(id).await? {
        return Err(not_found("offer", id));
    }
    state
        .publish(DisplayMessage::OfferDeleted(DeletedEntity { id }))
        .await;
    Ok(())
}

// ---------------------------------------------------------------------------
// Phrases
// ---------------------------------------------------------------------------

pub async fn list_phrases(state: &SharedState) -> Result<Vec<PhraseEntity>, ServiceError> {
    Ok(state.store().list_phrases().await?)
}

pub async fn get_phrase(state: &SharedState, id: EntityId) -> Result<PhraseEntity, ServiceError> {
    state
        .store()
        .find_phrase(id)
        .await?
        .ok_or_else(|| not_found("phrase", id))
}

pub async fn create_phrase(
    state: &SharedState,
    payload: CreatePhraseRequest,
) -> Result<PhraseEntity, ServiceError> {
    let _writes = state.lock_writes().await;
    let phrase = state.store().create_phrase(payload.into()).await?;
    state
        .publish(DisplayMessage::PhraseCreated(phrase.clone()))
        .await;
    Ok(phrase)
}

pub async fn update_phrase(
    state: &SharedState,
    id: EntityId,
    payload: UpdatePhraseRequest,
) -> Result<PhraseEntity, ServiceError> {
    let _writes = state.lock_writes().await;
    let phrase = state
        .store()
        .update_phrase(id, payload.into())
        .await?
        .ok_or_else(|| not_found("phrase", id))?;
    state
        .publish(DisplayMessage::PhraseUpdated(phrase.clone()))
        .await;
    Ok(phrase)
}

pub async fn delete_phrase(state: &SharedState, id: EntityId) -> Result<(), ServiceError> {
    let _writes = state.lock_writes().await;
    if !state.store().delete_phrase(id).await? {
        return Err(not_found("phrase", id));
    }
    state
        .publish(DisplayMessage::PhraseDeleted(DeletedEntity { id }))
        .await;
    Ok(())
}

// ---------------------------------------------------------------------------
// Display configuration
// ---------------------------------------------------------------------------

pub async fn get_config(state: &SharedState) -> Result<DisplayConfigEntity, ServiceError> {
    Ok(state.store().get_config().await?)
}

pub async fn update_config(
    state: &SharedState,
    payload: UpdateConfigRequest,
) -> Result<DisplayConfigEntity, ServiceError> {
    let _writes = state.lock_writes().await;
    let config = state.store().update_config(payload.into()).await?;
    debug!(
        waiting_list_display_time = config.waiting_list_display_time,
        popup_display_duration = config.popup_display_duration,
        "display config updated"
    );
    state
        .publish(DisplayMessage::ConfigUpdated(config.clone()))
        .await;
    Ok(config)
}
