/// Content CRUD backing the mutation gateway.
pub mod content_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Display WebSocket connection handling.
pub mod websocket_service;
