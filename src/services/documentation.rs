use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the venue display server.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::websocket::ws_handler,
        crate::routes::content::list_teams,
        crate::routes::content::get_team,
        crate::routes::content::create_team,
        crate::routes::content::update_team,
        crate::routes::content::delete_team,
        crate::routes::content::list_videos,
        crate::routes::content::get_video,
        crate::routes::content::create_video,
        crate::routes::content::update_video,
        crate::routes::content::delete_video,
        crate::routes::content::list_offers,
        crate::routes::content::get_offer,
        crate::routes::content::create_offer,
        crate::routes::content::update_offer,
        crate::routes::content::delete_offer,
        crate::routes::content::list_phrases,
        crate::routes::content::get_phrase,
        crate::routes::content::create_phrase,
        crate::routes::content::update_phrase,
        crate::routes::content::delete_phrase,
        crate::routes::config::get_config,
        crate::routes::config::update_config,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::ws::Snapshot,
            crate::dto::ws::DeletedEntity,
            crate::dao::models::MatchType,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "displays", description = "WebSocket sync stream for TV displays"),
        (name = "teams", description = "Waiting list management"),
        (name = "videos", description = "Video playlist management"),
        (name = "offers", description = "Special offer popups"),
        (name = "phrases", description = "Motivational phrase popups"),
        (name = "config", description = "Display configuration"),
    )
)]
pub struct ApiDoc;
