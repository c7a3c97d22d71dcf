use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

/// Identity assigned by the content store. Monotonic and never reused within a process.
pub type EntityId = u32;

/// Anything stored in a keyed collection and mirrored by display clients.
pub trait Identified {
    /// Store-assigned identifier.
    fn id(&self) -> EntityId;
}

/// Entities carrying an eligibility flag for popup display.
pub trait Activatable: Identified {
    /// Whether the entity may currently be shown on screen.
    fn is_active(&self) -> bool;
}

/// Game format a waiting team signed up for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum MatchType {
    /// Two teams playing against each other.
    TeamVsTeam,
    /// Free-for-all domination / deathmatch session.
    DominationDeathmatch,
}

/// Team waiting for its session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamEntity {
    /// Stable identifier for the team.
    pub id: EntityId,
    /// Display name chosen for the team.
    pub name: String,
    /// Format the team is waiting to play.
    pub match_type: MatchType,
    /// Optional picture shown next to the team name.
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Ordered player names (2 to 4 entries).
    pub players: Vec<String>,
    /// Creation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
}

/// Promotional video played in the main area of the screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoEntity {
    /// Stable identifier for the video.
    pub id: EntityId,
    /// Human readable file name.
    pub name: String,
    /// Playable URL of the media resource.
    pub url: String,
    /// Human readable size such as `12.4 MB`.
    #[serde(default)]
    pub size: Option<String>,
    /// Creation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
}

/// Special offer shown as a popup overlay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfferEntity {
    /// Stable identifier for the offer.
    pub id: EntityId,
    /// Short headline.
    pub title: String,
    /// Body text displayed in the popup.
    pub description: String,
    /// Whether the offer is eligible for display.
    pub active: bool,
    /// Creation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
}

/// Motivational catchphrase shown as a popup overlay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhraseEntity {
    /// Stable identifier for the phrase.
    pub id: EntityId,
    /// Text of the phrase.
    pub text: String,
    /// Whether the phrase is eligible for display.
    pub active: bool,
    /// Creation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
}

/// Singleton display configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DisplayConfigEntity {
    /// Always `1`; kept on the wire for client compatibility.
    pub id: EntityId,
    /// Optional logo shown in the corner of the screen.
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Seconds each waiting-list page stays on screen.
    pub waiting_list_display_time: u32,
    /// Enables the special offers popup cycler.
    pub show_popup_offers: bool,
    /// Enables the motivational phrases popup cycler.
    pub show_motivational_phrases: bool,
    /// Seconds a popup stays visible.
    pub popup_display_duration: u32,
    /// Master switch for the TV display.
    pub display_app_enabled: bool,
}

impl Default for DisplayConfigEntity {
    fn default() -> Self {
        Self {
            id: 1,
            logo_url: None,
            waiting_list_display_time: 5,
            show_popup_offers: true,
            show_motivational_phrases: false,
            popup_display_duration: 10,
            display_app_enabled: true,
        }
    }
}

macro_rules! identified {
    ($($entity:ty),+ $(,)?) => {
        $(impl Identified for $entity {
            fn id(&self) -> EntityId {
                self.id
            }
        })+
    };
}

identified!(TeamEntity, VideoEntity, OfferEntity, PhraseEntity);

impl Activatable for OfferEntity {
    fn is_active(&self) -> bool {
        self.active
    }
}

impl Activatable for PhraseEntity {
    fn is_active(&self) -> bool {
        self.active
    }
}

/// Fields required to create a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeam {
    pub name: String,
    pub match_type: MatchType,
    pub photo_url: Option<String>,
    pub players: Vec<String>,
}

/// Partial team update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamPatch {
    pub name: Option<String>,
    pub match_type: Option<MatchType>,
    pub photo_url: Option<Option<String>>,
    pub players: Option<Vec<String>>,
}

impl TeamPatch {
    pub(crate) fn apply_to(self, team: &mut TeamEntity) {
        if let Some(name) = self.name {
            team.name = name;
        }
        if let Some(match_type) = self.match_type {
            team.match_type = match_type;
        }
        if let Some(photo_url) = self.photo_url {
            team.photo_url = photo_url;
        }
        if let Some(players) = self.players {
            team.players = players;
        }
    }
}

/// Fields required to register a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVideo {
    pub name: String,
    pub url: String,
    pub size: Option<String>,
}

/// Partial video update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoPatch {
    pub name: Option<String>,
    pub url: Option<String>,
    pub size: Option<Option<String>>,
}

impl VideoPatch {
    pub(crate) fn apply_to(self, video: &mut VideoEntity) {
        if let Some(name) = self.name {
            video.name = name;
        }
        if let Some(url) = self.url {
            video.url = url;
        }
        if let Some(size) = self.size {
            video.size = size;
        }
    }
}

/// Fields required to create an offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOffer {
    pub title: String,
    pub description: String,
    pub active: bool,
}

/// Partial offer update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

impl OfferPatch {
    pub(crate) fn apply_to(self, offer: &mut OfferEntity) {
        if let Some(title) = self.title {
            offer.title = title;
        }
        if let Some(description) = self.description {
            offer.description = description;
        }
        if let Some(active) = self.active {
            offer.active = active;
        }
    }
}

/// Fields required to create a phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhrase {
    pub text: String,
    pub active: bool,
}

/// Partial phrase update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhrasePatch {
    pub text: Option<String>,
    pub active: Option<bool>,
}

impl PhrasePatch {
    pub(crate) fn apply_to(self, phrase: &mut PhraseEntity) {
        if let Some(text) = self.text {
            phrase.text = text;
        }
        if let Some(active) = self.active {
            phrase.active = active;
        }
    }
}

/// Partial display configuration update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayConfigPatch {
    pub logo_url: Option<Option<String>>,
    pub waiting_list_display_time: Option<u32>,
    pub show_popup_offers: Option<bool>,
    pub show_motivational_phrases: Option<bool>,
    pub popup_display_duration: Option<u32>,
    pub display_app_enabled: Option<bool>,
}

impl DisplayConfigPatch {
    pub(crate) fn apply_to(self, config: &mut DisplayConfigEntity) {
        if let Some(logo_url) = self.logo_url {
            config.logo_url = logo_url;
        }
        if let Some(seconds) = self.waiting_list_display_time {
            config.waiting_list_display_time = seconds;
        }
        if let Some(show) = self.show_popup_offers {
            config.show_popup_offers = show;
        }
        if let Some(show) = self.show_motivational_phrases {
            config.show_motivational_phrases = show;
        }
        if let Some(seconds) = self.popup_display_duration {
            config.popup_display_duration = seconds;
        }
        if let Some(enabled) = self.display_app_enabled {
            config.display_app_enabled = enabled;
        }
    }
}
