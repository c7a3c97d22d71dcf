use std::{io, str::FromStr, time::Duration};

use rand::{SeedableRng, rngs::StdRng};
use thiserror::Error;
use tokio::{
    sync::mpsc,
    time::{Instant, Interval, MissedTickBehavior, interval_at, sleep_until},
};
use tracing::{debug, info, warn};

use crate::{
    dao::models::EntityId,
    display::{
        frame::{DisplayFrame, DisplaySink},
        mirror::Mirror,
        playlist::{PlayerCommand, PlaylistPlayer},
        popup::{PopupCycler, PopupKind},
        sync_client::SyncUpdate,
        waiting_list::WaitingListRotator,
    },
};

/// Feedback from the media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// The current video reached its end.
    Ended,
    /// The current video failed to load or play.
    Error,
}

/// A stdin line that names no [`PlayerEvent`].
#[derive(Debug, Error)]
#[error("unknown player event `{0}`")]
pub struct UnknownPlayerEvent(String);

impl FromStr for PlayerEvent {
    type Err = UnknownPlayerEvent;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "ended" => Ok(Self::Ended),
            "error" => Ok(Self::Error),
            other => Err(UnknownPlayerEvent(other.to_string())),
        }
    }
}

/// Which timers must restart after a configuration change.
#[derive(Debug, Default)]
struct Reschedule {
    waiting_list: bool,
    popups: bool,
}

/// Single task owning the mirror and every rotation state machine.
///
/// Sync updates, player events and timers are all multiplexed through one
/// `select!` loop, so display state is never mutated concurrently.
pub struct DisplayRuntime<S> {
    sink: S,
    mirror: Mirror,
    connected: bool,
    waiting_list: WaitingListRotator,
    offers: PopupCycler,
    phrases: PopupCycler,
    player: PlaylistPlayer,
    now_playing: Option<EntityId>,
    video_retry_delay: Duration,
    rng: StdRng,
    last_frame: Option<DisplayFrame>,
}

impl<S: DisplaySink> DisplayRuntime<S> {
    /// Build a runtime seeded from the OS random source.
    pub fn new(sink: S, video_retry_delay: Duration) -> Self {
        Self::with_rng(sink, video_retry_delay, StdRng::from_os_rng())
    }

    /// Build a runtime with a caller-provided random source for popup selection.
    pub fn with_rng(sink: S, video_retry_delay: Duration, rng: StdRng) -> Self {
        let mirror = Mirror::default();
        let config = &mirror.config;
        let waiting_list = WaitingListRotator::new(config.waiting_list_display_time);
        let offers = PopupCycler::new(PopupKind::Offer, config.popup_display_duration);
        let phrases = PopupCycler::new(PopupKind::Phrase, config.popup_display_duration);

        Self {
            sink,
            mirror,
            connected: false,
            waiting_list,
            offers,
            phrases,
            player: PlaylistPlayer::new(),
            now_playing: None,
            video_retry_delay,
            rng,
            last_frame: None,
        }
    }

    /// Drive the display until the sync update channel closes.
    pub async fn run(
        mut self,
        mut updates: mpsc::Receiver<SyncUpdate>,
        mut player_events: mpsc::Receiver<PlayerEvent>,
    ) -> io::Result<()> {
        let mut waiting_tick = repeating(self.waiting_list.period());
        let mut offer_tick = repeating(self.offers.interval_period());
        let mut phrase_tick = repeating(self.phrases.interval_period());
        let mut offer_hide: Option<(Instant, EntityId)> = None;
        let mut phrase_hide: Option<(Instant, EntityId)> = None;
        let mut retry_at: Option<Instant> = None;
        let mut player_open = true;

        self.refresh()?;

        loop {
            tokio::select! {
                update = updates.recv() => {
                    let Some(update) = update else {
                        info!("sync updates closed; stopping display");
                        return Ok(());
                    };
                    let reschedule = self.apply_update(update);
                    if reschedule.waiting_list {
                        waiting_tick = repeating(self.waiting_list.period());
                    }
                    if reschedule.popups {
                        offer_tick = repeating(self.offers.interval_period());
                        phrase_tick = repeating(self.phrases.interval_period());
                    }
                }
                _ = waiting_tick.tick() => {
                    let page = self.waiting_list.tick(self.mirror.teams.len());
                    debug!(?page, "waiting list page");
                }
                _ = offer_tick.tick() => {
                    let enabled = self.mirror.config.show_popup_offers;
                    if let Some(id) = self.offers.tick(enabled, &self.mirror.offers, false, &mut self.rng) {
                        offer_hide = Some((Instant::now() + self.offers.display_duration(), id));
                    }
                }
                _ = phrase_tick.tick() => {
                    // Only checked at tick time; an offer appearing later overlaps.
                    let suppressed = self.offers.visible().is_some();
                    let enabled = self.mirror.config.show_motivational_phrases;
                    if let Some(id) = self.phrases.tick(enabled, &self.mirror.phrases, suppressed, &mut self.rng) {
                        phrase_hide = Some((Instant::now() + self.phrases.display_duration(), id));
                    }
                }
                _ = sleep_until(deadline(offer_hide)), if offer_hide.is_some() => {
                    if let Some((_, id)) = offer_hide.take() {
                        self.offers.hide(id);
                    }
                }
                _ = sleep_until(deadline(phrase_hide)), if phrase_hide.is_some() => {
                    if let Some((_, id)) = phrase_hide.take() {
                        self.phrases.hide(id);
                    }
                }
                _ = sleep_until(retry_at.unwrap_or_else(Instant::now)), if retry_at.is_some() => {
                    retry_at = None;
                    info!(index = self.player.index(), "retrying video playback");
                    let command = self.player.reload(&self.mirror.videos);
                    self.play(command)?;
                }
                event = player_events.recv(), if player_open => match event {
                    Some(PlayerEvent::Ended) => {
                        if let Some(command) = self.player.on_ended(&self.mirror.videos) {
                            self.play(command)?;
                        }
                    }
                    Some(PlayerEvent::Error) => {
                        warn!(index = self.player.index(), "video playback error, scheduling reload");
                        retry_at = Some(Instant::now() + self.video_retry_delay);
                    }
                    None => player_open = false,
                },
            }

            self.refresh()?;
        }
    }

    fn apply_update(&mut self, update: SyncUpdate) -> Reschedule {
        match update {
            SyncUpdate::Connected => self.connected = true,
            SyncUpdate::Disconnected => self.connected = false,
            SyncUpdate::Snapshot(snapshot) => {
                info!(
                    teams = snapshot.teams.len(),
                    videos = snapshot.videos.len(),
                    offers = snapshot.offers.len(),
                    phrases = snapshot.phrases.len(),
                    "mirror replaced from snapshot"
                );
                self.mirror.replace(snapshot);
            }
            SyncUpdate::Event(message) => {
                debug!(kind = message.kind(), "applying display event");
                self.mirror.apply(message);
            }
        }

        self.waiting_list.normalize(self.mirror.teams.len());

        let config = &self.mirror.config;
        let popup_duration = config.popup_display_duration;
        Reschedule {
            waiting_list: self
                .waiting_list
                .set_display_time(config.waiting_list_display_time),
            popups: self.offers.set_duration(popup_duration)
                | self.phrases.set_duration(popup_duration),
        }
    }

    fn play(&mut self, command: PlayerCommand) -> io::Result<()> {
        self.now_playing = match &command {
            PlayerCommand::Play { video_id, .. } => Some(*video_id),
            PlayerCommand::ShowEmpty => None,
        };
        self.sink.play(&command)
    }

    /// Reconcile the player with the mirror and render the frame if it changed.
    fn refresh(&mut self) -> io::Result<()> {
        if let Some(command) = self.player.sync(&self.mirror.videos) {
            self.play(command)?;
        }

        let frame = self.frame();
        if self.last_frame.as_ref() != Some(&frame) {
            self.sink.render(&frame)?;
            self.last_frame = Some(frame);
        }
        Ok(())
    }

    fn frame(&self) -> DisplayFrame {
        let config = &self.mirror.config;
        DisplayFrame {
            connected: self.connected,
            enabled: config.display_app_enabled,
            logo_url: config.logo_url.clone(),
            waiting_list: self.waiting_list.visible(&self.mirror.teams).to_vec(),
            offer: self
                .offers
                .visible()
                .and_then(|id| self.mirror.offer(id))
                .filter(|offer| offer.active)
                .cloned(),
            phrase: self
                .phrases
                .visible()
                .and_then(|id| self.mirror.phrase(id))
                .filter(|phrase| phrase.active)
                .cloned(),
            video: self
                .now_playing
                .and_then(|id| self.mirror.videos.iter().find(|video| video.id == id))
                .cloned(),
        }
    }
}

/// Interval whose first tick fires one full period from now.
fn repeating(period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

fn deadline(pending: Option<(Instant, EntityId)>) -> Instant {
    pending.map_or_else(Instant::now, |(at, _)| at)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use time::OffsetDateTime;
    use tokio::{task::JoinHandle, time::sleep};

    use super::*;
    use crate::{
        dao::models::{DisplayConfigEntity, MatchType, OfferEntity, TeamEntity, VideoEntity},
        dto::ws::{DeletedEntity, DisplayMessage, Snapshot},
    };

    #[derive(Default)]
    struct Recorded {
        frames: Vec<DisplayFrame>,
        commands: Vec<PlayerCommand>,
    }

    #[derive(Clone, Default)]
    struct RecordingSink(Arc<Mutex<Recorded>>);

    impl RecordingSink {
        fn last_frame(&self) -> DisplayFrame {
            self.0.lock().unwrap().frames.last().cloned().unwrap()
        }

        fn commands(&self) -> Vec<PlayerCommand> {
            self.0.lock().unwrap().commands.clone()
        }
    }

    impl DisplaySink for RecordingSink {
        fn render(&mut self, frame: &DisplayFrame) -> io::Result<()> {
            self.0.lock().unwrap().frames.push(frame.clone());
            Ok(())
        }

        fn play(&mut self, command: &PlayerCommand) -> io::Result<()> {
            self.0.lock().unwrap().commands.push(command.clone());
            Ok(())
        }
    }

    struct Harness {
        sink: RecordingSink,
        updates: mpsc::Sender<SyncUpdate>,
        player: mpsc::Sender<PlayerEvent>,
        task: JoinHandle<io::Result<()>>,
    }

    impl Harness {
        fn start() -> Self {
            let sink = RecordingSink::default();
            let (updates, updates_rx) = mpsc::channel(16);
            let (player, player_rx) = mpsc::channel(16);
            let runtime = DisplayRuntime::with_rng(
                sink.clone(),
                Duration::from_secs(1),
                StdRng::seed_from_u64(11),
            );
            let task = tokio::spawn(runtime.run(updates_rx, player_rx));
            Self {
                sink,
                updates,
                player,
                task,
            }
        }

        async fn send(&self, update: SyncUpdate) {
            self.updates.send(update).await.unwrap();
            settle().await;
        }

        async fn stop(self) {
            drop(self.updates);
            self.task.await.unwrap().unwrap();
        }
    }

    async fn settle() {
        sleep(Duration::from_millis(10)).await;
    }

    fn team(id: EntityId) -> TeamEntity {
        TeamEntity {
            id,
            name: format!("TEAM {id}"),
            match_type: MatchType::DominationDeathmatch,
            photo_url: None,
            players: vec!["Ana".into(), "Bo".into()],
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn video(id: EntityId) -> VideoEntity {
        VideoEntity {
            id,
            name: format!("clip_{id}.mp4"),
            url: format!("/uploads/clip_{id}.mp4"),
            size: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn offer(id: EntityId) -> OfferEntity {
        OfferEntity {
            id,
            title: "Happy Hour".into(),
            description: "Second session half price".into(),
            active: true,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn team_ids(frame: &DisplayFrame) -> Vec<EntityId> {
        frame.waiting_list.iter().map(|team| team.id).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn waiting_list_pages_follow_display_time() {
        let harness = Harness::start();
        harness.send(SyncUpdate::Connected).await;
        harness
            .send(SyncUpdate::Snapshot(Snapshot {
                teams: (1..=5).map(team).collect(),
                ..Default::default()
            }))
            .await;

        let frame = harness.sink.last_frame();
        assert!(frame.connected);
        assert_eq!(team_ids(&frame), vec![1, 2, 3, 4, 5]);

        sleep(Duration::from_secs(5)).await;
        assert_eq!(team_ids(&harness.sink.last_frame()), vec![1, 2]);
        sleep(Duration::from_secs(5)).await;
        assert_eq!(team_ids(&harness.sink.last_frame()), vec![3, 4]);

        harness
            .send(SyncUpdate::Event(DisplayMessage::TeamDeleted(
                DeletedEntity { id: 5 },
            )))
            .await;
        harness.send(SyncUpdate::Disconnected).await;
        let frame = harness.sink.last_frame();
        assert!(!frame.connected);
        assert_eq!(team_ids(&frame), vec![3, 4]);

        harness.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn playlist_advances_and_retries_after_error() {
        let harness = Harness::start();
        harness
            .send(SyncUpdate::Snapshot(Snapshot {
                videos: vec![video(1), video(2)],
                ..Default::default()
            }))
            .await;
        assert_eq!(harness.sink.last_frame().video.map(|v| v.id), Some(1));

        harness.player.send(PlayerEvent::Ended).await.unwrap();
        settle().await;
        assert_eq!(harness.sink.last_frame().video.map(|v| v.id), Some(2));

        harness.player.send(PlayerEvent::Error).await.unwrap();
        settle().await;
        let before_retry = harness.sink.commands().len();
        sleep(Duration::from_secs(1)).await;

        let commands = harness.sink.commands();
        assert_eq!(commands.len(), before_retry + 1);
        assert!(matches!(
            commands.last(),
            Some(PlayerCommand::Play { video_id: 2, looping: false, .. })
        ));

        harness
            .send(SyncUpdate::Event(DisplayMessage::VideoDeleted(
                DeletedEntity { id: 1 },
            )))
            .await;
        harness
            .send(SyncUpdate::Event(DisplayMessage::VideoDeleted(
                DeletedEntity { id: 2 },
            )))
            .await;
        assert_eq!(harness.sink.commands().last(), Some(&PlayerCommand::ShowEmpty));
        assert_eq!(harness.sink.last_frame().video, None);

        harness.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn offer_popup_shows_for_display_duration() {
        let harness = Harness::start();
        harness
            .send(SyncUpdate::Snapshot(Snapshot {
                offers: vec![offer(4)],
                config: DisplayConfigEntity {
                    popup_display_duration: 1,
                    ..Default::default()
                },
                ..Default::default()
            }))
            .await;
        assert_eq!(harness.sink.last_frame().offer, None);

        sleep(Duration::from_millis(3_200)).await;
        assert_eq!(harness.sink.last_frame().offer.map(|o| o.id), Some(4));

        sleep(Duration::from_secs(1)).await;
        assert_eq!(harness.sink.last_frame().offer, None);

        harness.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_offers_never_pop_up() {
        let harness = Harness::start();
        harness
            .send(SyncUpdate::Snapshot(Snapshot {
                offers: vec![offer(4)],
                config: DisplayConfigEntity {
                    popup_display_duration: 1,
                    show_popup_offers: false,
                    ..Default::default()
                },
                ..Default::default()
            }))
            .await;

        sleep(Duration::from_secs(30)).await;
        let recorded = harness.sink.0.lock().unwrap().frames.clone();
        assert!(recorded.iter().all(|frame| frame.offer.is_none()));

        harness.stop().await;
    }

    #[test]
    fn player_events_parse_from_lines() {
        assert_eq!("ended\n".parse::<PlayerEvent>().unwrap(), PlayerEvent::Ended);
        assert_eq!(" error ".parse::<PlayerEvent>().unwrap(), PlayerEvent::Error);
        assert!("paused".parse::<PlayerEvent>().is_err());
    }
}
