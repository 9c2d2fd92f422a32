use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use mongodb::{Collection, Database};
use std::future::Future;

use crate::db::BOOKINGS_COLLECTION;
use crate::models::booking::{normalize_email, Booking, CreateBookingPayload};
use crate::store::event::EventStore;
use crate::utils::error::AppError;

/// Repository over the `bookings` collection.
pub struct BookingStore {
    bookings: Collection<Booking>,
}

impl BookingStore {
    pub fn new(db: &Database) -> Self {
        Self {
            bookings: db.collection(BOOKINGS_COLLECTION),
        }
    }

    /// Creates a booking after checking that the referenced event exists.
    /// The check runs through the event store collaborator before the
    /// insert; a missing referent blocks the save.
    pub async fn create(
        &self,
        events: &EventStore,
        payload: CreateBookingPayload,
    ) -> Result<Booking, AppError> {
        let mut booking = prepare_booking(payload, |id| events.exists(id)).await?;
        let result = self.bookings.insert_one(&booking, None).await?;
        booking.id = result.inserted_id.as_object_id();
        Ok(booking)
    }
}

/// Validates a payload and builds the document to insert. The referenced
/// event's existence is verified through the supplied lookup before any
/// write can happen; a missing referent blocks the save.
async fn prepare_booking<F, Fut>(
    payload: CreateBookingPayload,
    mut event_exists: F,
) -> Result<Booking, AppError>
where
    F: FnMut(ObjectId) -> Fut,
    Fut: Future<Output = Result<bool, AppError>>,
{
    let email = normalize_email(&payload.email)?;
    let event_id = ObjectId::parse_str(payload.event_id.trim())
        .map_err(|_| AppError::Validation("Invalid event ID".to_string()))?;

    if !event_exists(event_id).await? {
        return Err(AppError::ReferentialIntegrity(
            "Referenced event does not exist".to_string(),
        ));
    }

    let now = Utc::now();
    Ok(Booking {
        id: None,
        event_id,
        email,
        created_at: now,
        updated_at: now,
    })
}
