//! Library crate for venue-display-sync, exposing the broadcast server and the
//! display client for binaries and integration tests.

pub mod config;
pub mod dao;
pub mod display;
pub mod dto;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
