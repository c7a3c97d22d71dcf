use axum::Router;

use crate::state::SharedState;

pub mod config;
pub mod content;
pub mod docs;
pub mod health;
pub mod websocket;

/// Compose all route trees and wire in the shared state.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(websocket::router())
        .merge(content::router())
        .merge(config::router())
        .merge(docs::router())
        .with_state(state)
}
