use std::io::{self, Write};

use serde::Serialize;

use crate::{
    dao::models::{OfferEntity, PhraseEntity, TeamEntity, VideoEntity},
    display::playlist::PlayerCommand,
};

/// Render-ready view of everything visible on a display at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayFrame {
    /// Whether the sync transport is currently connected.
    pub connected: bool,
    /// Master switch from the display configuration.
    pub enabled: bool,
    /// Venue logo, if one is configured.
    pub logo_url: Option<String>,
    /// Teams on the current waiting-list page.
    pub waiting_list: Vec<TeamEntity>,
    /// Offer popup, if one is on screen.
    pub offer: Option<OfferEntity>,
    /// Phrase popup, if one is on screen.
    pub phrase: Option<PhraseEntity>,
    /// Video the player was last told to play.
    pub video: Option<VideoEntity>,
}

/// Output surface of a display: draws frames and drives the media element.
pub trait DisplaySink: Send {
    /// Draw a frame. Only called when the frame differs from the previous one.
    fn render(&mut self, frame: &DisplayFrame) -> io::Result<()>;

    /// Forward a command to the media element.
    fn play(&mut self, command: &PlayerCommand) -> io::Result<()>;
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum OutputLine<'a> {
    Frame(&'a DisplayFrame),
    Player(&'a PlayerCommand),
}

/// Sink writing one JSON document per line, e.g. to stdout for a renderer process.
pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap `writer`. Each document is flushed as soon as it is written.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, line: &OutputLine<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, line)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

impl<W: Write + Send> DisplaySink for JsonLinesSink<W> {
    fn render(&mut self, frame: &DisplayFrame) -> io::Result<()> {
        self.write_line(&OutputLine::Frame(frame))
    }

    fn play(&mut self, command: &PlayerCommand) -> io::Result<()> {
        self.write_line(&OutputLine::Player(command))
    }
}
