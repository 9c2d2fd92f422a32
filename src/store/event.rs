use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::{FindOneOptions, FindOptions};
use mongodb::{Collection, Database};

use crate::db::EVENTS_COLLECTION;
use crate::models::event::{
    require_non_empty_list, require_trimmed, resolve_unique_slug, slugify, validate_date,
    validate_time, CreateEventPayload, Event, UpdateEventPayload,
};
use crate::utils::error::AppError;

/// Repository over the `events` collection. Validation and slug resolution
/// happen here, explicitly, before any write reaches the database.
pub struct EventStore {
    events: Collection<Event>,
    // Untyped view of the same collection for projection-only lookups.
    raw: Collection<Document>,
}

impl EventStore {
    pub fn new(db: &Database) -> Self {
        Self {
            events: db.collection(EVENTS_COLLECTION),
            raw: db.collection(EVENTS_COLLECTION),
        }
    }

    pub async fn create(&self, mut payload: CreateEventPayload) -> Result<Event, AppError> {
        payload.normalize()?;
        let slug = self.slug_for(&payload.title, None).await?;

        let now = Utc::now();
        let mut event = Event {
            id: None,
            title: payload.title,
            slug,
            description: payload.description,
            overview: payload.overview,
            image: payload.image,
            venue: payload.venue,
            location: payload.location,
            date: payload.date,
            time: payload.time,
            mode: payload.mode,
            audience: payload.audience,
            agenda: payload.agenda,
            organizer: payload.organizer,
            tags: payload.tags,
            created_at: now,
            updated_at: now,
        };

        let result = self.events.insert_one(&event, None).await?;
        event.id = result.inserted_id.as_object_id();
        Ok(event)
    }

    /// Applies a partial update. The slug is regenerated only when the title
    /// actually changes, and date/time are re-validated only when those
    /// fields change.
    pub async fn update(&self, id: ObjectId, changes: UpdateEventPayload) -> Result<Event, AppError> {
        let mut event = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

        let mut title_changed = false;
        if let Some(title) = changes.title {
            let title = require_trimmed("Title", &title)?;
            if title != event.title {
                event.title = title;
                title_changed = true;
            }
        }
        if let Some(description) = changes.description {
            event.description = require_trimmed("Description", &description)?;
        }
        if let Some(overview) = changes.overview {
            event.overview = require_trimmed("Overview", &overview)?;
        }
        if let Some(image) = changes.image {
            event.image = require_trimmed("Image", &image)?;
        }
        if let Some(venue) = changes.venue {
            event.venue = require_trimmed("Venue", &venue)?;
        }
        if let Some(location) = changes.location {
            event.location = require_trimmed("Location", &location)?;
        }
        if let Some(audience) = changes.audience {
            event.audience = require_trimmed("Audience", &audience)?;
        }
        if let Some(organizer) = changes.organizer {
            event.organizer = require_trimmed("Organizer", &organizer)?;
        }
        if let Some(date) = changes.date {
            if date != event.date {
                validate_date(&date)?;
                event.date = date;
            }
        }
        if let Some(time) = changes.time {
            if time != event.time {
                validate_time(&time)?;
                event.time = time;
            }
        }
        if let Some(mode) = changes.mode {
            event.mode = mode;
        }
        if let Some(agenda) = changes.agenda {
            require_non_empty_list("Agenda", &agenda)?;
            event.agenda = agenda;
        }
        if let Some(tags) = changes.tags {
            require_non_empty_list("Tags", &tags)?;
            event.tags = tags;
        }

        if title_changed {
            event.slug = self.slug_for(&event.title, Some(id)).await?;
        }

        event.updated_at = Utc::now();
        self.events
            .replace_one(doc! {"_id": id}, &event, None)
            .await?;
        Ok(event)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError> {
        // Explicit field-equality match on the slug.
        Ok(self.events.find_one(doc! {"slug": slug}, None).await?)
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<Event>, AppError> {
        Ok(self.events.find_one(doc! {"_id": id}, None).await?)
    }

    pub async fn list_newest_first(&self) -> Result<Vec<Event>, AppError> {
        let options = FindOptions::builder().sort(doc! {"created_at": -1}).build();
        let mut cursor = self.events.find(doc! {}, options).await?;
        let mut events = Vec::new();
        while let Some(event) = cursor.try_next().await? {
            events.push(event);
        }
        Ok(events)
    }

    /// Reports whether an event with the given id exists, without fetching
    /// the document.
    pub async fn exists(&self, id: ObjectId) -> Result<bool, AppError> {
        let options = FindOneOptions::builder()
            .projection(doc! {"_id": 1})
            .build();
        Ok(self.raw.find_one(doc! {"_id": id}, options).await?.is_some())
    }

    async fn slug_for(&self, title: &str, exclude: Option<ObjectId>) -> Result<String, AppError> {
        let base = slugify(title);
        if base.is_empty() {
            return Err(AppError::Validation(
                "Title must contain at least one word character".to_string(),
            ));
        }
        resolve_unique_slug(&base, |candidate| self.slug_exists(candidate, exclude)).await
    }

    async fn slug_exists(&self, slug: String, exclude: Option<ObjectId>) -> Result<bool, AppError> {
        let mut filter = doc! {"slug": slug};
        if let Some(id) = exclude {
            filter.insert("_id", doc! {"$ne": id});
        }
        let options = FindOneOptions::builder()
            .projection(doc! {"_id": 1})
            .build();
        Ok(self.raw.find_one(filter, options).await?.is_some())
    }
}
