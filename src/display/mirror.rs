use tracing::debug;

use crate::{
    dao::models::{
        DisplayConfigEntity, EntityId, Identified, OfferEntity, PhraseEntity, TeamEntity,
        VideoEntity,
    },
    dto::ws::{DisplayMessage, Snapshot},
};

/// A display's local copy of the five content collections.
///
/// Replaced wholesale by every snapshot and patched by events in between.
/// Patching is tolerant: duplicate creations, updates of unknown ids and
/// deletions of absent ids leave the mirror unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mirror {
    pub teams: Vec<TeamEntity>,
    pub videos: Vec<VideoEntity>,
    pub offers: Vec<OfferEntity>,
    pub phrases: Vec<PhraseEntity>,
    pub config: DisplayConfigEntity,
}

impl Mirror {
    /// Discard everything and adopt `snapshot`.
    pub fn replace(&mut self, snapshot: Snapshot) {
        let Snapshot {
            teams,
            videos,
            offers,
            phrases,
            config,
        } = snapshot;
        self.teams = teams;
        self.videos = videos;
        self.offers = offers;
        self.phrases = phrases;
        self.config = config;
    }

    /// Apply one message from the hub.
    pub fn apply(&mut self, message: DisplayMessage) {
        match message {
            DisplayMessage::Init(snapshot) => self.replace(snapshot),
            DisplayMessage::TeamCreated(team) => insert_absent(&mut self.teams, team),
            DisplayMessage::TeamUpdated(team) => replace_present(&mut self.teams, team),
            DisplayMessage::TeamDeleted(deleted) => remove_by_id(&mut self.teams, deleted.id),
            DisplayMessage::VideoCreated(video) => insert_absent(&mut self.videos, video),
            DisplayMessage::VideoUpdated(video) => replace_present(&mut self.videos, video),
            DisplayMessage::VideoDeleted(deleted) => remove_by_id(&mut self.videos, deleted.id),
            DisplayMessage::OfferCreated(offer) => insert_absent(&mut self.offers, offer),
            DisplayMessage::OfferUpdated(offer) => replace_present(&mut self.offers, offer),
            DisplayMessage::OfferDeleted(deleted) => remove_by_id(&mut self.offers, deleted.id),
            DisplayMessage::PhraseCreated(phrase) => insert_absent(&mut self.phrases, phrase),
            DisplayMessage::PhraseUpdated(phrase) => replace_present(&mut self.phrases, phrase),
            DisplayMessage::PhraseDeleted(deleted) => {
                remove_by_id(&mut self.phrases, deleted.id)
            }
            DisplayMessage::ConfigUpdated(config) => self.config = config,
        }
    }

    /// Offer with `id`, if the mirror still holds it.
    pub fn offer(&self, id: EntityId) -> Option<&OfferEntity> {
        self.offers.iter().find(|offer| offer.id == id)
    }

    /// Phrase with `id`, if the mirror still holds it.
    pub fn phrase(&self, id: EntityId) -> Option<&PhraseEntity> {
        self.phrases.iter().find(|phrase| phrase.id == id)
    }
}

fn insert_absent<T: Identified>(items: &mut Vec<T>, item: T) {
    if items.iter().any(|existing| existing.id() == item.id()) {
        debug!(id = item.id(), "ignoring duplicate creation");
        return;
    }
    items.push(item);
}

fn replace_present<T: Identified>(items: &mut [T], item: T) {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(slot) => *slot = item,
        None => debug!(id = item.id(), "ignoring update of unknown entity"),
    }
}

fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: EntityId) {
    items.retain(|item| item.id() != id);
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;
    use crate::{dao::models::MatchType, dto::ws::DeletedEntity};

    fn team(id: EntityId, name: &str) -> TeamEntity {
        TeamEntity {
            id,
            name: name.into(),
            match_type: MatchType::TeamVsTeam,
            photo_url: None,
            players: vec!["Mike".into(), "Sarah".into()],
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn created_then_deleted_team_round_trip() {
        let mut mirror = Mirror::default();

        mirror.apply(DisplayMessage::TeamCreated(team(7, "CYBER WOLVES")));
        assert_eq!(mirror.teams, vec![team(7, "CYBER WOLVES")]);

        mirror.apply(DisplayMessage::TeamDeleted(DeletedEntity { id: 7 }));
        assert!(mirror.teams.is_empty());
    }

    #[test]
    fn duplicate_creation_is_idempotent() {
        let mut mirror = Mirror::default();
        mirror.apply(DisplayMessage::TeamCreated(team(7, "CYBER WOLVES")));
        mirror.apply(DisplayMessage::TeamCreated(team(7, "CYBER WOLVES")));
        assert_eq!(mirror.teams.len(), 1);
    }

    #[test]
    fn update_of_unknown_id_is_ignored() {
        let mut mirror = Mirror::default();
        mirror.apply(DisplayMessage::TeamCreated(team(1, "ALPHA")));

        mirror.apply(DisplayMessage::TeamUpdated(team(2, "GHOST")));
        mirror.apply(DisplayMessage::TeamUpdated(team(1, "ALPHA PRIME")));

        assert_eq!(mirror.teams, vec![team(1, "ALPHA PRIME")]);
    }

    #[test]
    fn deletion_of_absent_id_is_tolerated() {
        let mut mirror = Mirror::default();
        mirror.apply(DisplayMessage::OfferDeleted(DeletedEntity { id: 99 }));
        assert_eq!(mirror, Mirror::default());
    }

    #[test]
    fn snapshot_replace_converges_after_missed_events() {
        let mut stale = Mirror::default();
        stale.apply(DisplayMessage::TeamCreated(team(1, "ALPHA")));
        stale.apply(DisplayMessage::TeamCreated(team(2, "BRAVO")));

        let snapshot = Snapshot {
            teams: vec![team(2, "BRAVO"), team(3, "CHARLIE")],
            config: DisplayConfigEntity {
                popup_display_duration: 4,
                ..Default::default()
            },
            ..Default::default()
        };
        stale.apply(DisplayMessage::Init(snapshot.clone()));

        let mut fresh = Mirror::default();
        fresh.replace(snapshot);
        assert_eq!(stale, fresh);
        assert_eq!(stale.config.popup_display_duration, 4);
    }
}
