//! Runtime configuration: seed content for the server and connection settings
//! for display clients.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};
use validator::{Validate, ValidationErrors};

use crate::{
    dao::{
        content_store::memory::SeedContent,
        models::{
            DisplayConfigEntity, DisplayConfigPatch, MatchType, NewOffer, NewPhrase, NewTeam,
            NewVideo,
        },
    },
    dto::content::{
        CreateOfferRequest, CreatePhraseRequest, CreateTeamRequest, CreateVideoRequest,
        UpdateConfigRequest,
    },
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "VENUE_DISPLAY_CONFIG_PATH";

/// WebSocket endpoint a display connects to when nothing else is configured.
const DEFAULT_HUB_URL: &str = "ws://127.0.0.1:8080/ws";
const HUB_URL_ENV: &str = "DISPLAY_HUB_URL";
/// Fixed delay between a transport drop and the next connection attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(3);
const RECONNECT_DELAY_ENV: &str = "DISPLAY_RECONNECT_DELAY_MS";
/// Delay before replaying a video whose playback failed.
pub const DEFAULT_VIDEO_RETRY_DELAY: Duration = Duration::from_secs(1);
const VIDEO_RETRY_DELAY_ENV: &str = "DISPLAY_VIDEO_RETRY_DELAY_MS";

/// Reasons a configuration document is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON or does not match the expected shape.
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A seed entry breaks the content rules enforced by the gateway.
    #[error("invalid {section} entry #{index}: {source}")]
    Invalid {
        /// Top-level key of the offending entry.
        section: &'static str,
        /// Position within that section.
        index: usize,
        /// Rules the entry broke.
        #[source]
        source: ValidationErrors,
    },
}

#[derive(Debug, Clone)]
/// Immutable server configuration: what the content store starts with.
pub struct AppConfig {
    seed: SeedContent,
}

impl AppConfig {
    /// Load the server configuration from disk, falling back to the built-in seed content.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json_str(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        teams = app_config.seed.teams.len(),
                        videos = app_config.seed.videos.len(),
                        offers = app_config.seed.offers.len(),
                        phrases = app_config.seed.phrases.len(),
                        "loaded seed content from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "rejected config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse and validate a configuration document.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<RawConfig>(contents)?.try_into()
    }

    /// Content the store is populated with at start-up.
    pub fn seed(&self) -> SeedContent {
        self.seed.clone()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
///
/// Seed entries use the gateway payload types so they obey the same rules as
/// content created over `/api`.
struct RawConfig {
    #[serde(default)]
    display: UpdateConfigRequest,
    #[serde(default)]
    teams: Vec<CreateTeamRequest>,
    #[serde(default)]
    videos: Vec<CreateVideoRequest>,
    #[serde(default)]
    offers: Vec<CreateOfferRequest>,
    #[serde(default)]
    phrases: Vec<CreatePhraseRequest>,
}

impl TryFrom<RawConfig> for AppConfig {
    type Error = ConfigError;

    fn try_from(value: RawConfig) -> Result<Self, Self::Error> {
        value
            .display
            .validate()
            .map_err(|source| ConfigError::Invalid {
                section: "display",
                index: 0,
                source,
            })?;
        let mut config = DisplayConfigEntity::default();
        DisplayConfigPatch::from(value.display).apply_to(&mut config);

        Ok(Self {
            seed: SeedContent {
                teams: validated("teams", value.teams)?,
                videos: validated("videos", value.videos)?,
                offers: validated("offers", value.offers)?,
                phrases: validated("phrases", value.phrases)?,
                config,
            },
        })
    }
}

/// Validate every seed entry of one section and convert it into its store type.
fn validated<T, U>(section: &'static str, entries: Vec<T>) -> Result<Vec<U>, ConfigError>
where
    T: Validate + Into<U>,
{
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            entry.validate().map_err(|source| ConfigError::Invalid {
                section,
                index,
                source,
            })?;
            Ok(entry.into())
        })
        .collect()
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in example content shipped with the binary.
fn default_seed() -> SeedContent {
    SeedContent {
        teams: vec![NewTeam {
            name: "CYBER WOLVES".into(),
            match_type: MatchType::TeamVsTeam,
            photo_url: None,
            players: vec![
                "Mike".into(),
                "Sarah".into(),
                "Alex".into(),
                "Taylor".into(),
            ],
        }],
        videos: vec![NewVideo {
            name: "summer_promo.mp4".into(),
            url: "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4"
                .into(),
            size: Some("12.4 MB".into()),
        }],
        offers: vec![NewOffer {
            title: "Happy Hour Special".into(),
            description: "Buy one VR session, get the second at 50% off! Valid until midnight."
                .into(),
            active: true,
        }],
        phrases: vec![NewPhrase {
            text: "REALITY IS BORING. PLAY IN OURS!".into(),
            active: true,
        }],
        config: DisplayConfigEntity::default(),
    }
}

#[derive(Debug, Clone)]
/// Settings of a display process, read from the environment.
pub struct DisplayClientConfig {
    /// WebSocket URL of the broadcast hub.
    pub hub_url: String,
    /// Constant delay before reconnecting after the transport drops.
    pub reconnect_delay: Duration,
    /// Delay before reloading a video that failed to play.
    pub video_retry_delay: Duration,
}

impl DisplayClientConfig {
    /// Read the display settings from `DISPLAY_*` environment variables.
    pub fn from_env() -> Self {
        let hub_url = env::var(HUB_URL_ENV)
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_HUB_URL.into());

        Self {
            hub_url,
            reconnect_delay: duration_from_env(RECONNECT_DELAY_ENV, DEFAULT_RECONNECT_DELAY),
            video_retry_delay: duration_from_env(VIDEO_RETRY_DELAY_ENV, DEFAULT_VIDEO_RETRY_DELAY),
        }
    }
}

impl Default for DisplayClientConfig {
    fn default() -> Self {
        Self {
            hub_url: DEFAULT_HUB_URL.into(),
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            video_retry_delay: DEFAULT_VIDEO_RETRY_DELAY,
        }
    }
}

fn duration_from_env(var: &str, default: Duration) -> Duration {
    match env::var(var) {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(millis) => Duration::from_millis(millis),
            Err(err) => {
                warn!(var, value = %raw, error = %err, "invalid duration; using default");
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_ship_example_content() {
        let seed = AppConfig::default().seed();
        assert_eq!(seed.teams[0].name, "CYBER WOLVES");
        assert_eq!(seed.teams[0].players.len(), 4);
        assert!(!seed.config.show_motivational_phrases);
    }

    #[test]
    fn file_overrides_display_settings_and_content() {
        let config = AppConfig::from_json_str(
            r#"{
                "display": { "popupDisplayDuration": 4, "logoUrl": "/logo.png" },
                "phrases": [{ "text": "GAME ON" }]
            }"#,
        )
        .unwrap();

        let seed = config.seed();
        assert_eq!(seed.config.popup_display_duration, 4);
        assert_eq!(seed.config.waiting_list_display_time, 5);
        assert_eq!(seed.config.logo_url.as_deref(), Some("/logo.png"));
        assert!(seed.teams.is_empty());
        assert!(seed.phrases[0].active);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(matches!(
            AppConfig::from_json_str(r#"{ "teams": 3 }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn seed_team_outside_roster_rules_is_rejected() {
        let err = AppConfig::from_json_str(
            r#"{ "teams": [
                { "name": "DUO", "matchType": "teamVsTeam", "players": ["a", "b"] },
                { "name": "SOLO", "matchType": "teamVsTeam", "players": ["only"] }
            ] }"#,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Invalid {
                section: "teams",
                index: 1,
                ..
            }
        ));
    }

    #[test]
    fn blank_seed_entries_and_zero_timings_are_rejected() {
        assert!(AppConfig::from_json_str(r#"{ "phrases": [{ "text": "  " }] }"#).is_err());
        assert!(
            AppConfig::from_json_str(r#"{ "videos": [{ "name": "promo", "url": "" }] }"#).is_err()
        );
        assert!(
            AppConfig::from_json_str(r#"{ "display": { "popupDisplayDuration": 0 } }"#).is_err()
        );
    }
}
