//! Messages pushed from the broadcast hub to display clients over `/ws`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dao::models::{
    DisplayConfigEntity, EntityId, OfferEntity, PhraseEntity, TeamEntity, VideoEntity,
};

/// Complete content state sent once when a display attaches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Snapshot {
    #[serde(default)]
    pub teams: Vec<TeamEntity>,
    #[serde(default)]
    pub videos: Vec<VideoEntity>,
    #[serde(default)]
    pub offers: Vec<OfferEntity>,
    #[serde(default)]
    pub phrases: Vec<PhraseEntity>,
    #[serde(default)]
    pub config: DisplayConfigEntity,
}

/// Payload of every `*_deleted` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeletedEntity {
    pub id: EntityId,
}

/// Server-to-display frame, encoded as `{"type": "...", "data": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum DisplayMessage {
    /// Full state, always the first frame on a connection.
    Init(Snapshot),
    TeamCreated(TeamEntity),
    TeamUpdated(TeamEntity),
    TeamDeleted(DeletedEntity),
    VideoCreated(VideoEntity),
    VideoUpdated(VideoEntity),
    VideoDeleted(DeletedEntity),
    OfferCreated(OfferEntity),
    OfferUpdated(OfferEntity),
    OfferDeleted(DeletedEntity),
    PhraseCreated(PhraseEntity),
    PhraseUpdated(PhraseEntity),
    PhraseDeleted(DeletedEntity),
    ConfigUpdated(DisplayConfigEntity),
}

impl DisplayMessage {
    /// Wire tag of the message, used for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::TeamCreated(_) => "team_created",
            Self::TeamUpdated(_) => "team_updated",
            Self::TeamDeleted(_) => "team_deleted",
            Self::VideoCreated(_) => "video_created",
            Self::VideoUpdated(_) => "video_updated",
            Self::VideoDeleted(_) => "video_deleted",
            Self::OfferCreated(_) => "offer_created",
            Self::OfferUpdated(_) => "offer_updated",
            Self::OfferDeleted(_) => "offer_deleted",
            Self::PhraseCreated(_) => "phrase_created",
            Self::PhraseUpdated(_) => "phrase_updated",
            Self::PhraseDeleted(_) => "phrase_deleted",
            Self::ConfigUpdated(_) => "config_updated",
        }
    }

    /// Serialize into a JSON text frame.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a JSON text frame.
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use time::macros::datetime;

    use super::*;
    use crate::dao::models::MatchType;

    #[test]
    fn team_created_uses_snake_case_tag_and_camel_case_fields() {
        let message = DisplayMessage::TeamCreated(TeamEntity {
            id: 7,
            name: "CYBER WOLVES".into(),
            match_type: MatchType::TeamVsTeam,
            photo_url: None,
            players: vec!["Mike".into(), "Sarah".into()],
            created_at: datetime!(2024-05-01 18:30 UTC),
        });

        let value: Value = serde_json::from_str(&message.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "team_created");
        assert_eq!(value["data"]["id"], 7);
        assert_eq!(value["data"]["matchType"], "teamVsTeam");
        assert_eq!(value["data"]["createdAt"], "2024-05-01T18:30:00Z");
    }

    #[test]
    fn deletion_carries_only_the_id() {
        let text = DisplayMessage::PhraseDeleted(DeletedEntity { id: 3 })
            .to_json()
            .unwrap();
        assert_eq!(text, r#"{"type":"phrase_deleted","data":{"id":3}}"#);
    }

    #[test]
    fn init_parses_with_missing_collections() {
        let text = json!({
            "type": "init",
            "data": {
                "teams": [],
                "config": {
                    "id": 1,
                    "logoUrl": null,
                    "waitingListDisplayTime": 8,
                    "showPopupOffers": false,
                    "showMotivationalPhrases": true,
                    "popupDisplayDuration": 6,
                    "displayAppEnabled": true
                }
            }
        })
        .to_string();

        let DisplayMessage::Init(snapshot) = DisplayMessage::from_json_str(&text).unwrap() else {
            panic!("expected init");
        };
        assert!(snapshot.videos.is_empty());
        assert_eq!(snapshot.config.waiting_list_display_time, 8);
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(DisplayMessage::from_json_str(r#"{"type":"user_created","data":{}}"#).is_err());
        assert!(DisplayMessage::from_json_str("not json").is_err());
    }
}
