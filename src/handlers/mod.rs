use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use mongodb::bson::oid::ObjectId;
use serde::Serialize;

use crate::models::booking::{Booking, CreateBookingPayload};
use crate::models::event::{CreateEventPayload, Event, UpdateEventPayload};
use crate::store::{BookingStore, EventStore};
use crate::utils::error::AppError;
use crate::utils::response::{created, ok};
use crate::AppState;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

#[derive(Serialize)]
struct EventResponse {
    message: &'static str,
    event: Event,
}

#[derive(Serialize)]
struct EventListResponse {
    message: &'static str,
    events: Vec<Event>,
}

#[derive(Serialize)]
struct BookingResponse {
    message: &'static str,
    booking: Booking,
}

pub async fn health_check() -> Response {
    ok(HealthPayload {
        status: "ok",
        service: "eventhub-api",
    })
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let db = state.db.database().await?;
    let store = EventStore::new(&db);

    let event = store
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    Ok(ok(EventResponse {
        message: "Event fetched successfully",
        event,
    }))
}

pub async fn list_events(State(state): State<AppState>) -> Result<Response, AppError> {
    let db = state.db.database().await?;
    let store = EventStore::new(&db);

    let events = store.list_newest_first().await?;
    Ok(ok(EventListResponse {
        message: "Events fetched successfully",
        events,
    }))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<CreateEventPayload>,
) -> Result<Response, AppError> {
    let db = state.db.database().await?;
    let store = EventStore::new(&db);

    let event = store.create(payload).await?;
    tracing::info!(slug = %event.slug, "Event created");
    Ok(created(EventResponse {
        message: "Event created successfully",
        event,
    }))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(changes): Json<UpdateEventPayload>,
) -> Result<Response, AppError> {
    let id = ObjectId::parse_str(id.trim())
        .map_err(|_| AppError::Validation("Invalid event ID".to_string()))?;

    let db = state.db.database().await?;
    let store = EventStore::new(&db);

    let event = store.update(id, changes).await?;
    Ok(ok(EventResponse {
        message: "Event updated successfully",
        event,
    }))
}

pub async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<CreateBookingPayload>,
) -> Result<Response, AppError> {
    let db = state.db.database().await?;
    let events = EventStore::new(&db);
    let bookings = BookingStore::new(&db);

    let booking = bookings.create(&events, payload).await?;
    tracing::info!(event_id = %booking.event_id, "Booking created");
    Ok(created(BookingResponse {
        message: "Booking created successfully",
        booking,
    }))
}
