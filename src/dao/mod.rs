/// Content store abstraction and its in-memory arena implementation.
pub mod content_store;
/// Entity definitions shared by the store, the wire format, and display clients.
pub mod models;
/// Storage error types.
pub mod storage;
