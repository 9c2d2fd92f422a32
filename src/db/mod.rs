use futures::future::{BoxFuture, FutureExt, Shared};
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Database, IndexModel};
use std::future::Future;
use tokio::sync::Mutex;

use crate::models::booking::Booking;
use crate::models::event::Event;
use crate::utils::error::AppError;

pub const EVENTS_COLLECTION: &str = "events";
pub const BOOKINGS_COLLECTION: &str = "bookings";

const APP_NAME: &str = "eventhub";
const DEFAULT_DATABASE: &str = "eventhub";

type SharedAttempt<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

/// Caches an in-flight attempt, not just its result. Concurrent callers
/// clone and await the same shared future, so exactly one underlying attempt
/// runs no matter how many requests arrive first. A failed attempt is
/// cleared once observed, so only a genuinely later call starts a new one;
/// a successful attempt stays cached and resolves immediately thereafter.
struct AttemptCache<T, E>
where
    T: Clone,
    E: Clone,
{
    slot: Mutex<Option<SharedAttempt<T, E>>>,
}

impl<T, E> AttemptCache<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    async fn get_or_attempt<F, Fut>(&self, attempt: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let shared = {
            let mut slot = self.slot.lock().await;
            match slot.as_ref() {
                Some(shared) => shared.clone(),
                None => {
                    let shared = attempt().boxed().shared();
                    *slot = Some(shared.clone());
                    shared
                }
            }
        };

        let result = shared.clone().await;
        if result.is_err() {
            // Clear only our own failed attempt; a newer one may already be
            // in the slot.
            let mut slot = self.slot.lock().await;
            if slot.as_ref().map_or(false, |current| current.ptr_eq(&shared)) {
                *slot = None;
            }
        }
        result
    }
}

/// Lazily established, process-shared MongoDB handle.
///
/// Constructed once at startup and injected through the router state; no
/// ambient globals. The first `database()` call starts the actual connection
/// attempt and caches the attempt itself, so concurrent first callers await
/// the same pending attempt rather than dialing duplicates. Failure clears
/// the cache, letting the next caller retry; there is no automatic retry or
/// backoff.
pub struct ConnectionManager {
    uri: String,
    attempt: AttemptCache<Database, mongodb::error::Error>,
}

impl ConnectionManager {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            attempt: AttemptCache::new(),
        }
    }

    pub async fn database(&self) -> Result<Database, AppError> {
        let uri = self.uri.clone();
        Ok(self.attempt.get_or_attempt(move || connect(uri)).await?)
    }
}

async fn connect(uri: String) -> Result<Database, mongodb::error::Error> {
    let mut options = ClientOptions::parse(&uri).await?;
    options.app_name = Some(APP_NAME.to_string());

    let client = Client::with_options(options)?;
    let db = client
        .default_database()
        .unwrap_or_else(|| client.database(DEFAULT_DATABASE));

    // Fail fast instead of buffering commands against a dead connection.
    db.run_command(doc! {"ping": 1}, None).await?;
    ensure_indexes(&db).await?;

    tracing::info!(database = %db.name(), "Successfully connected to database");
    Ok(db)
}

/// Index bootstrap, run once as part of the first successful connection:
/// unique slug lookups for events, event-scoped lookups for bookings.
async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let slug_index = IndexModel::builder()
        .keys(doc! {"slug": 1})
        .options(IndexOptions::builder().unique(true).build())
        .build();
    db.collection::<Event>(EVENTS_COLLECTION)
        .create_index(slug_index, None)
        .await?;

    let event_id_index = IndexModel::builder().keys(doc! {"event_id": 1}).build();
    db.collection::<Booking>(BOOKINGS_COLLECTION)
        .create_index(event_id_index, None)
        .await?;

    Ok(())
}
