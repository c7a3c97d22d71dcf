//! Request payloads accepted by the mutation gateway (`/api/*`).

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::models::{
        DisplayConfigPatch, MatchType, NewOffer, NewPhrase, NewTeam, NewVideo, OfferPatch,
        PhrasePatch, TeamPatch, VideoPatch,
    },
    dto::validation::{validate_not_blank, validate_player_names},
};

/// Maximum number of seconds accepted for any display timing.
const MAX_TIMING_SECS: u32 = 3600;

/// Payload used to add a team to the waiting list.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    pub match_type: MatchType,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[validate(custom(function = "validate_player_names"))]
    pub players: Vec<String>,
}

/// Partial team update. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    pub match_type: Option<MatchType>,
    /// If omitted, keeps the current photo. If null, removes it.
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub photo_url: Option<Option<String>>,
    #[validate(custom(function = "validate_player_names"))]
    pub players: Option<Vec<String>>,
}

/// Payload used to register an already-uploaded video.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateVideoRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub url: String,
    #[serde(default)]
    pub size: Option<String>,
}

/// Partial video update.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateVideoRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub url: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub size: Option<Option<String>>,
}

/// Payload used to create a special offer.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateOfferRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,
    /// Defaults to `true`.
    #[serde(default)]
    pub active: Option<bool>,
}

/// Partial offer update.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateOfferRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub title: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub description: Option<String>,
    pub active: Option<bool>,
}

/// Payload used to create a motivational phrase.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreatePhraseRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub text: String,
    /// Defaults to `true`.
    #[serde(default)]
    pub active: Option<bool>,
}

/// Partial phrase update.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdatePhraseRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub text: Option<String>,
    pub active: Option<bool>,
}

/// Partial display configuration update.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfigRequest {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub logo_url: Option<Option<String>>,
    #[validate(range(min = 1, max = MAX_TIMING_SECS))]
    pub waiting_list_display_time: Option<u32>,
    pub show_popup_offers: Option<bool>,
    pub show_motivational_phrases: Option<bool>,
    #[validate(range(min = 1, max = MAX_TIMING_SECS))]
    pub popup_display_duration: Option<u32>,
    pub display_app_enabled: Option<bool>,
}

impl From<CreateTeamRequest> for NewTeam {
    fn from(value: CreateTeamRequest) -> Self {
        Self {
            name: value.name,
            match_type: value.match_type,
            photo_url: value.photo_url,
            players: value.players,
        }
    }
}

impl From<UpdateTeamRequest> for TeamPatch {
    fn from(value: UpdateTeamRequest) -> Self {
        Self {
            name: value.name,
            match_type: value.match_type,
            photo_url: value.photo_url,
            players: value.players,
        }
    }
}

impl From<CreateVideoRequest> for NewVideo {
    fn from(value: CreateVideoRequest) -> Self {
        Self {
            name: value.name,
            url: value.url,
            size: value.size,
        }
    }
}

impl From<UpdateVideoRequest> for VideoPatch {
    fn from(value: UpdateVideoRequest) -> Self {
        Self {
            name: value.name,
            url: value.url,
            size: value.size,
        }
    }
}

impl From<CreateOfferRequest> for NewOffer {
    fn from(value: CreateOfferRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            active: value.active.unwrap_or(true),
        }
    }
}

impl From<UpdateOfferRequest> for OfferPatch {
    fn from(value: UpdateOfferRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            active: value.active,
        }
    }
}

impl From<CreatePhraseRequest> for NewPhrase {
    fn from(value: CreatePhraseRequest) -> Self {
        Self {
            text: value.text,
            active: value.active.unwrap_or(true),
        }
    }
}

impl From<UpdatePhraseRequest> for PhrasePatch {
    fn from(value: UpdatePhraseRequest) -> Self {
        Self {
            text: value.text,
            active: value.active,
        }
    }
}

impl From<UpdateConfigRequest> for DisplayConfigPatch {
    fn from(value: UpdateConfigRequest) -> Self {
        Self {
            logo_url: value.logo_url,
            waiting_list_display_time: value.waiting_list_display_time,
            show_popup_offers: value.show_popup_offers,
            show_motivational_phrases: value.show_motivational_phrases,
            popup_display_duration: value.popup_display_duration,
            display_app_enabled: value.display_app_enabled,
        }
    }
}
