use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::create_cors_layer;
use crate::handlers::{
    create_booking, create_event, get_event, health_check, list_events, update_event,
};
use crate::pages;
use crate::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::landing))
        .route("/events/:slug", get(pages::event_details))
        .route("/health", get(health_check))
        .route("/api/events", get(list_events).post(create_event))
        // The path parameter is a slug for reads and an id for updates.
        .route("/api/events/:slug", get(get_event).patch(update_event))
        .route("/api/bookings", post(create_booking))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(create_cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
