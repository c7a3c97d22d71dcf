pub mod memory;

use futures::{future::BoxFuture, try_join};

use crate::dao::models::{
    DisplayConfigEntity, DisplayConfigPatch, EntityId, NewOffer, NewPhrase, NewTeam, NewVideo,
    OfferEntity, OfferPatch, PhraseEntity, PhrasePatch, TeamEntity, TeamPatch, VideoEntity,
    VideoPatch,
};
use crate::dao::storage::StorageResult;
use crate::dto::ws::Snapshot;

pub use self::memory::MemoryContentStore;

/// Abstraction over the source of truth for venue content.
///
/// Only the mutation gateway calls the `create_*`, `update_*` and `delete_*`
/// operations; the broadcast hub restricts itself to the list getters when
/// assembling snapshots.
pub trait ContentStore: Send + Sync {
    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>>;
    fn find_team(&self, id: EntityId) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    fn create_team(&self, team: NewTeam) -> BoxFuture<'static, StorageResult<TeamEntity>>;
    fn update_team(
        &self,
        id: EntityId,
        patch: TeamPatch,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    fn delete_team(&self, id: EntityId) -> BoxFuture<'static, StorageResult<bool>>;

    fn list_videos(&self) -> BoxFuture<'static, StorageResult<Vec<VideoEntity>>>;
    fn find_video(&self, id: EntityId) -> BoxFuture<'static, StorageResult<Option<VideoEntity>>>;
    fn create_video(&self, video: NewVideo) -> BoxFuture<'static, StorageResult<VideoEntity>>;
    fn update_video(
        &self,
        id: EntityId,
        patch: VideoPatch,
    ) -> BoxFuture<'static, StorageResult<Option<VideoEntity>>>;
    fn delete_video(&self, id: EntityId) -> BoxFuture<'static, StorageResult<bool>>;

    fn list_offers(&self) -> BoxFuture<'static, StorageResult<Vec<OfferEntity>>>;
    fn find_offer(&self, id: EntityId) -> BoxFuture<'static, StorageResult<Option<OfferEntity>>>;
    fn create_offer(&self, offer: NewOffer) -> BoxFuture<'static, StorageResult<OfferEntity>>;
    fn update_offer(
        &self,
        id: EntityId,
        patch: OfferPatch,
    ) -> BoxFuture<'static, StorageResult<Option<OfferEntity>>>;
    fn delete_offer(&self, id: EntityId) -> BoxFuture<'static, StorageResult<bool>>;

    fn list_phrases(&self) -> BoxFuture<'static, StorageResult<Vec<PhraseEntity>>>;
    fn find_phrase(&self, id: EntityId)
    -> BoxFuture<'static, StorageResult<Option<PhraseEntity>>>;
    fn create_phrase(&self, phrase: NewPhrase) -> BoxFuture<'static, StorageResult<PhraseEntity>>;
    fn update_phrase(
        &self,
        id: EntityId,
        patch: PhrasePatch,
    ) -> BoxFuture<'static, StorageResult<Option<PhraseEntity>>>;
    fn delete_phrase(&self, id: EntityId) -> BoxFuture<'static, StorageResult<bool>>;

    fn get_config(&self) -> BoxFuture<'static, StorageResult<DisplayConfigEntity>>;
    fn update_config(
        &self,
        patch: DisplayConfigPatch,
    ) -> BoxFuture<'static, StorageResult<DisplayConfigEntity>>;
}

/// Assemble a full-state snapshot from the five getters.
///
/// Fails as a whole if any single getter fails.
pub async fn load_snapshot(store: &dyn ContentStore) -> StorageResult<Snapshot> {
    let (teams, videos, offers, phrases, config) = try_join!(
        store.list_teams(),
        store.list_videos(),
        store.list_offers(),
        store.list_phrases(),
        store.get_config(),
    )?;

    Ok(Snapshot {
        teams,
        videos,
        offers,
        phrases,
        config,
    })
}
