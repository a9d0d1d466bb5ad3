//! Route configuration and setup

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use mediadesk_core::Config;

use crate::handlers;
use crate::middleware::signature_middleware;
use crate::state::AppState;

/// Every request body this service accepts is JSON metadata; attachment
/// bytes travel outbound from the content API, never inbound.
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: AppState) -> Router {
    // The signature check applies only to the platform-facing webhook route
    let webhook_routes = Router::new()
        .route(
            config.webhook_path.as_str(),
            post(handlers::webhook::receive_webhook),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            signature_middleware,
        ));

    let attachment_routes = Router::new()
        .route(
            "/tickets/{ticket_id}/attachments/promote",
            post(handlers::attachments::promote_attachments),
        )
        .route(
            "/tickets/{ticket_id}/attachments",
            delete(handlers::attachments::delete_ticket_attachments),
        )
        .route(
            "/attachments/discard",
            post(handlers::attachments::discard_staged),
        );

    let public_prefix = format!("/{}", config.storage_root.trim_start_matches('/'));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(webhook_routes)
        .merge(attachment_routes)
        .nest_service(&public_prefix, ServeDir::new(&config.storage_root))
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
