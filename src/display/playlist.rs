use serde::Serialize;

use crate::dao::models::{EntityId, VideoEntity};

/// Instruction for the media element of a display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PlayerCommand {
    /// Load `url` and start playing it. `looping` asks the element to repeat
    /// natively, which is requested when the playlist has a single entry.
    #[serde(rename_all = "camelCase")]
    Play {
        video_id: EntityId,
        url: String,
        looping: bool,
    },
    /// Nothing to play; show the empty-playlist placeholder.
    ShowEmpty,
}

/// Event-driven playlist advance.
///
/// The index wraps: `ended` moves to `(index + 1) mod len`, `error` replays
/// the current index after a delay chosen by the caller.
#[derive(Debug, Clone, Default)]
pub struct PlaylistPlayer {
    index: usize,
    issued: Option<PlayerCommand>,
}

impl PlaylistPlayer {
    /// Player positioned on the first video with nothing issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Position in the playlist, before wrapping.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Reconcile with the current playlist after the mirror changed.
    ///
    /// Returns a command only when what should be playing differs from the
    /// last command issued.
    pub fn sync(&mut self, videos: &[VideoEntity]) -> Option<PlayerCommand> {
        let command = self.select(videos);
        if self.issued.as_ref() == Some(&command) {
            return None;
        }
        Some(self.issue(command))
    }

    /// The current video finished playing.
    pub fn on_ended(&mut self, videos: &[VideoEntity]) -> Option<PlayerCommand> {
        if videos.is_empty() {
            return self.sync(videos);
        }
        self.index = (self.index + 1) % videos.len();
        Some(self.reload(videos))
    }

    /// Replay whatever the current index points at, even if unchanged.
    pub fn reload(&mut self, videos: &[VideoEntity]) -> PlayerCommand {
        let command = self.select(videos);
        self.issue(command)
    }

    fn select(&mut self, videos: &[VideoEntity]) -> PlayerCommand {
        if videos.is_empty() {
            self.index = 0;
            return PlayerCommand::ShowEmpty;
        }
        self.index %= videos.len();
        let video = &videos[self.index];
        PlayerCommand::Play {
            video_id: video.id,
            url: video.url.clone(),
            looping: videos.len() == 1,
        }
    }

    fn issue(&mut self, command: PlayerCommand) -> PlayerCommand {
        self.issued = Some(command.clone());
        command
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;

    fn video(id: EntityId) -> VideoEntity {
        VideoEntity {
            id,
            name: format!("clip_{id}.mp4"),
            url: format!("/uploads/clip_{id}.mp4"),
            size: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn playing(command: &PlayerCommand) -> EntityId {
        match command {
            PlayerCommand::Play { video_id, .. } => *video_id,
            PlayerCommand::ShowEmpty => panic!("expected a play command"),
        }
    }

    #[test]
    fn empty_playlist_shows_placeholder_once() {
        let mut player = PlaylistPlayer::new();
        assert_eq!(player.sync(&[]), Some(PlayerCommand::ShowEmpty));
        assert_eq!(player.sync(&[]), None);
        assert_eq!(player.on_ended(&[]), None);
    }

    #[test]
    fn single_video_loops_and_replays_same_index() {
        let videos = [video(1)];
        let mut player = PlaylistPlayer::new();

        let first = player.sync(&videos).unwrap();
        assert!(matches!(first, PlayerCommand::Play { looping: true, .. }));

        let replay = player.on_ended(&videos).unwrap();
        assert_eq!(replay, first);
        assert_eq!(player.index(), 0);
    }

    #[test]
    fn three_ended_events_return_to_start() {
        let videos = [video(1), video(2), video(3)];
        let mut player = PlaylistPlayer::new();
        assert_eq!(playing(&player.sync(&videos).unwrap()), 1);

        let order: Vec<EntityId> = (0..3)
            .map(|_| playing(&player.on_ended(&videos).unwrap()))
            .collect();

        assert_eq!(order, vec![2, 3, 1]);
        assert_eq!(player.index(), 0);
    }

    #[test]
    fn reload_replays_current_index() {
        let videos = [video(1), video(2)];
        let mut player = PlaylistPlayer::new();
        player.sync(&videos);
        player.on_ended(&videos);

        assert_eq!(playing(&player.reload(&videos)), 2);
        assert_eq!(player.index(), 1);
    }

    #[test]
    fn shrinking_playlist_wraps_index() {
        let mut videos = vec![video(1), video(2), video(3)];
        let mut player = PlaylistPlayer::new();
        player.sync(&videos);
        player.on_ended(&videos);
        player.on_ended(&videos);
        assert_eq!(player.index(), 2);

        videos.truncate(2);
        let command = player.sync(&videos).unwrap();
        assert_eq!(player.index(), 0);
        assert_eq!(playing(&command), 1);
    }

    #[test]
    fn unrelated_changes_do_not_restart_playback() {
        let mut videos = vec![video(1), video(2)];
        let mut player = PlaylistPlayer::new();
        player.sync(&videos);

        videos.push(video(3));
        assert_eq!(player.sync(&videos), None);
    }
}
