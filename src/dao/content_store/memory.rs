use std::sync::Arc;

use futures::{FutureExt, future::BoxFuture};
use indexmap::IndexMap;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::ContentStore;
use crate::dao::{
    models::{
        DisplayConfigEntity, DisplayConfigPatch, EntityId, NewOffer, NewPhrase, NewTeam, NewVideo,
        OfferEntity, OfferPatch, PhraseEntity, PhrasePatch, TeamEntity, TeamPatch, VideoEntity,
        VideoPatch,
    },
    storage::StorageResult,
};

/// Content used to populate a fresh in-memory store.
#[derive(Debug, Clone, Default)]
pub struct SeedContent {
    pub teams: Vec<NewTeam>,
    pub videos: Vec<NewVideo>,
    pub offers: Vec<NewOffer>,
    pub phrases: Vec<NewPhrase>,
    pub config: DisplayConfigEntity,
}

/// Keyed collection with a monotonic id counter.
///
/// Ids are handed out once and never recycled, even after deletion, and
/// iteration follows insertion order.
#[derive(Debug)]
struct Arena<T> {
    next_id: EntityId,
    items: IndexMap<EntityId, T>,
}

impl<T: Clone> Arena<T> {
    fn new() -> Self {
        Self {
            next_id: 1,
            items: IndexMap::new(),
        }
    }

    fn insert_with(&mut self, build: impl FnOnce(EntityId) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let item = build(id);
        self.items.insert(id, item.clone());
        item
    }

    fn list(&self) -> Vec<T> {
        self.items.values().cloned().collect()
    }

    fn get(&self, id: EntityId) -> Option<T> {
        self.items.get(&id).cloned()
    }

    fn update(&mut self, id: EntityId, change: impl FnOnce(&mut T)) -> Option<T> {
        let item = self.items.get_mut(&id)?;
        change(item);
        Some(item.clone())
    }

    fn remove(&mut self, id: EntityId) -> bool {
        self.items.shift_remove(&id).is_some()
    }
}

#[derive(Debug)]
struct Collections {
    teams: Arena<TeamEntity>,
    videos: Arena<VideoEntity>,
    offers: Arena<OfferEntity>,
    phrases: Arena<PhraseEntity>,
    config: DisplayConfigEntity,
}

impl Collections {
    fn insert_team(&mut self, team: NewTeam) -> TeamEntity {
        self.teams.insert_with(|id| TeamEntity {
            id,
            name: team.name,
            match_type: team.match_type,
            photo_url: team.photo_url,
            players: team.players,
            created_at: OffsetDateTime::now_utc(),
        })
    }

    fn insert_video(&mut self, video: NewVideo) -> VideoEntity {
        self.videos.insert_with(|id| VideoEntity {
            id,
            name: video.name,
            url: video.url,
            size: video.size,
            created_at: OffsetDateTime::now_utc(),
        })
    }

    fn insert_offer(&mut self, offer: NewOffer) -> OfferEntity {
        self.offers.insert_with(|id| OfferEntity {
            id,
            title: offer.title,
            description: offer.description,
            active: offer.active,
            created_at: OffsetDateTime::now_utc(),
        })
    }

    fn insert_phrase(&mut self, phrase: NewPhrase) -> PhraseEntity {
        self.phrases.insert_with(|id| PhraseEntity {
            id,
            text: phrase.text,
            active: phrase.active,
            created_at: OffsetDateTime::now_utc(),
        })
    }
}

/// Process-local content store backed by ordered arenas behind a Tokio lock.
#[derive(Clone)]
pub struct MemoryContentStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryContentStore {
    /// Empty store with the default display configuration.
    pub fn new() -> Self {
        Self::seeded(SeedContent::default())
    }

    /// Store pre-populated with `seed`, assigning ids in the order given.
    pub fn seeded(seed: SeedContent) -> Self {
        let mut collections = Collections {
            teams: Arena::new(),
            videos: Arena::new(),
            offers: Arena::new(),
            phrases: Arena::new(),
            config: DisplayConfigEntity { id: 1, ..seed.config },
        };
        for team in seed.teams {
            collections.insert_team(team);
        }
        for video in seed.videos {
            collections.insert_video(video);
        }
        for offer in seed.offers {
            collections.insert_offer(offer);
        }
        for phrase in seed.phrases {
            collections.insert_phrase(phrase);
        }

        Self {
            inner: Arc::new(RwLock::new(collections)),
        }
    }
}

impl Default for MemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore for MemoryContentStore {
    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let inner = self.inner.clone();
        async move { Ok(inner.read().await.teams.list()) }.boxed()
    }

    fn find_team(&self, id: EntityId) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let inner = self.inner.clone();
        async move { Ok(inner.read().await.teams.get(id)) }.boxed()
    }

    fn create_team(&self, team: NewTeam) -> BoxFuture<'static, StorageResult<TeamEntity>> {
        let inner = self.inner.clone();
        async move { Ok(inner.write().await.insert_team(team)) }.boxed()
    }

    fn update_team(
        &self,
        id: EntityId,
        patch: TeamPatch,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let inner = self.inner.clone();
        async move {
            let mut guard = inner.write().await;
            Ok(guard.teams.update(id, |team| patch.apply_to(team)))
        }
        .boxed()
    }

    fn delete_team(&self, id: EntityId) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = self.inner.clone();
        async move { Ok(inner.write().await.teams.remove(id)) }.boxed()
    }

    fn list_videos(&self) -> BoxFuture<'static, StorageResult<Vec<VideoEntity>>> {
        let inner = self.inner.clone();
        async move { Ok(inner.read().await.videos.list()) }.boxed()
    }

    fn find_video(&self, id: EntityId) -> BoxFuture<'static, StorageResult<Option<VideoEntity>>> {
        let inner = self.inner.clone();
        async move { Ok(inner.read().await.videos.get(id)) }.boxed()
    }

    fn create_video(&self, video: NewVideo) -> BoxFuture<'static, StorageResult<VideoEntity>> {
        let inner = self.inner.clone();
        async move { Ok(inner.write().await.insert_video(video)) }.boxed()
    }

    fn update_video(
        &self,
        id: EntityId,
        patch: VideoPatch,
    ) -> BoxFuture<'static, StorageResult<Option<VideoEntity>>> {
        let inner = self.inner.clone();
        async move {
            let mut guard = inner.write().await;
            Ok(guard.videos.update(id, |video| patch.apply_to(video)))
        }
        .boxed()
    }

    fn delete_video(&self, id: EntityId) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = self.inner.clone();
        async move { Ok(inner.write().await.videos.remove(id)) }.boxed()
    }

    fn list_offers(&self) -> BoxFuture<'static, StorageResult<Vec<OfferEntity>>> {
        let inner = self.inner.clone();
        async move { Ok(inner.read().await.offers.list()) }.boxed()
    }

    fn find_offer(&self, id: EntityId) -> BoxFuture<'static, StorageResult<Option<OfferEntity>>> {
        let inner = self.inner.clone();
        async move { Ok(inner.read().await.offers.get(id)) }.boxed()
    }

    fn create_offer(&self, offer: NewOffer) -> BoxFuture<'static, StorageResult<OfferEntity>> {
        let inner = self.inner.clone();
        async move { Ok(inner.write().await.insert_offer(offer)) }.boxed()
    }

    fn update_offer(
        &self,
        id: EntityId,
        patch: OfferPatch,
    ) -> BoxFuture<'static, StorageResult<Option<OfferEntity>>> {
        let inner = self.inner.clone();
        async move {
            let mut guard = inner.write().await;
            Ok(guard.offers.update(id, |offer| patch.apply_to(offer)))
        }
        .boxed()
    }

    fn delete_offer(&self, id: EntityId) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = self.inner.clone();
        async move { Ok(inner.write().await.offers.remove(id)) }.boxed()
    }

    fn list_phrases(&self) -> BoxFuture<'static, StorageResult<Vec<PhraseEntity>>> {
        let inner = self.inner.clone();
        async move { Ok(inner.read().await.phrases.list()) }.boxed()
    }

    fn find_phrase(
        &self,
        id: EntityId,
    ) -> BoxFuture<'static, StorageResult<Option<PhraseEntity>>> {
        let inner = self.inner.clone();
        async move { Ok(inner.read().await.phrases.get(id)) }.boxed()
    }

    fn create_phrase(&self, phrase: NewPhrase) -> BoxFuture<'static, StorageResult<PhraseEntity>> {
        let inner = self.inner.clone();
        async move { Ok(inner.write().await.insert_phrase(phrase)) }.boxed()
    }

    fn update_phrase(
        &self,
        id: EntityId,
        patch: PhrasePatch,
    ) -> BoxFuture<'static, StorageResult<Option<PhraseEntity>>> {
        let inner = self.inner.clone();
        async move {
            let mut guard = inner.write().await;
            Ok(guard.phrases.update(id, |phrase| patch.apply_to(phrase)))
        }
        .boxed()
    }

    fn delete_phrase(&self, id: EntityId) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = self.inner.clone();
        async move { Ok(inner.write().await.phrases.remove(id)) }.boxed()
    }

    fn get_config(&self) -> BoxFuture<'static, StorageResult<DisplayConfigEntity>> {
        let inner = self.inner.clone();
        async move { Ok(inner.read().await.config.clone()) }.boxed()
    }

    fn update_config(
        &self,
        patch: DisplayConfigPatch,
    ) -> BoxFuture<'static, StorageResult<DisplayConfigEntity>> {
        let inner = self.inner.clone();
        async move {
            let mut guard = inner.write().await;
            patch.apply_to(&mut guard.config);
            Ok(guard.config.clone())
        }
        .boxed()
    }
}
