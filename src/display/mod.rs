//! Display client: keeps a local mirror in sync with the broadcast hub and
//! rotates its content on screen.

/// Render-ready frames and the sink trait that draws them.
pub mod frame;
/// Local copy of the hub's content collections.
pub mod mirror;
/// Video playlist advance.
pub mod playlist;
/// Offer and phrase popup selection.
pub mod popup;
/// Single-task event loop driving the schedulers.
pub mod runtime;
/// WebSocket transport with fixed-delay reconnection.
pub mod sync_client;
/// Waiting-list pagination.
pub mod waiting_list;

pub use self::{
    frame::{DisplayFrame, DisplaySink, JsonLinesSink},
    mirror::Mirror,
    runtime::{DisplayRuntime, PlayerEvent},
    sync_client::{ConnectionState, SyncClient, SyncUpdate},
};
