use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::utils::error::AppError;

static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static TIME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    /// Unique, derived from the title. Never set by clients.
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    /// `YYYY-MM-DD`, validated as a real calendar date.
    pub date: String,
    /// `HH:MM`, 24-hour.
    pub time: String,
    pub mode: EventMode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventMode {
    Online,
    Offline,
    Hybrid,
}

impl std::fmt::Display for EventMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventMode::Online => write!(f, "online"),
            EventMode::Offline => write!(f, "offline"),
            EventMode::Hybrid => write!(f, "hybrid"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateEventPayload {
    pub title: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: EventMode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateEventPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<EventMode>,
    pub audience: Option<String>,
    pub agenda: Option<Vec<String>>,
    pub organizer: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl CreateEventPayload {
    /// Trims string fields and enforces the schema constraints. Runs before
    /// any write; a violation blocks the save.
    pub fn normalize(&mut self) -> Result<(), AppError> {
        self.title = require_trimmed("Title", &self.title)?;
        self.description = require_trimmed("Description", &self.description)?;
        self.overview = require_trimmed("Overview", &self.overview)?;
        self.image = require_trimmed("Image", &self.image)?;
        self.venue = require_trimmed("Venue", &self.venue)?;
        self.location = require_trimmed("Location", &self.location)?;
        self.audience = require_trimmed("Audience", &self.audience)?;
        self.organizer = require_trimmed("Organizer", &self.organizer)?;
        validate_date(&self.date)?;
        validate_time(&self.time)?;
        require_non_empty_list("Agenda", &self.agenda)?;
        require_non_empty_list("Tags", &self.tags)?;
        Ok(())
    }
}

pub(crate) fn require_trimmed(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn require_non_empty_list(field: &str, values: &[String]) -> Result<(), AppError> {
    if values.is_empty() {
        return Err(AppError::Validation(format!(
            "{field} must contain at least one item"
        )));
    }
    Ok(())
}

pub fn validate_date(date: &str) -> Result<(), AppError> {
    if !DATE_RE.is_match(date) {
        return Err(AppError::Validation(
            "Date must be in YYYY-MM-DD format".to_string(),
        ));
    }
    // Round-trip through a real calendar date; the regex alone accepts
    // impossible days like 2024-02-30.
    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(AppError::Validation("Invalid date".to_string()));
    }
    Ok(())
}

pub fn validate_time(time: &str) -> Result<(), AppError> {
    if !TIME_RE.is_match(time) {
        return Err(AppError::Validation(
            "Time must be in HH:MM format".to_string(),
        ));
    }
    Ok(())
}

/// Derives a URL-safe slug from an event title: lowercase, trim, strip
/// characters outside word/space/hyphen, collapse whitespace runs to single
/// hyphens, collapse repeated hyphens, trim leading and trailing hyphens.
pub fn slugify(title: &str) -> String {
    let cleaned: String = title
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();

    let hyphenated = cleaned.split_whitespace().collect::<Vec<_>>().join("-");

    let mut slug = String::with_capacity(hyphenated.len());
    let mut prev_hyphen = false;
    for c in hyphenated.chars() {
        if c == '-' {
            if !prev_hyphen {
                slug.push('-');
            }
            prev_hyphen = true;
        } else {
            slug.push(c);
            prev_hyphen = false;
        }
    }

    slug.trim_matches('-').to_string()
}

/// Resolves a base slug to a unique one by appending `-1`, `-2`, … until the
/// supplied existence check reports no collision. The check runs against the
/// store, excluding the document being saved.
pub async fn resolve_unique_slug<F, Fut>(base: &str, mut exists: F) -> Result<String, AppError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, AppError>>,
{
    let mut slug = base.to_string();
    let mut counter = 1;
    while exists(slug.clone()).await? {
        slug = format!("{base}-{counter}");
        counter += 1;
    }
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("RustConf 2025"), "rustconf-2025");
        assert_eq!(slugify("  Hello   World  "), "hello-world");
    }

    #[test]
    fn slugify_strips_punctuation_and_collapses_hyphens() {
        assert_eq!(slugify("Rust & WebAssembly: A Deep-Dive!"), "rust-webassembly-a-deep-dive");
        assert_eq!(slugify("a -- b"), "a-b");
        assert_eq!(slugify("--edge--"), "edge");
    }

    #[test]
    fn slugify_keeps_underscores_like_word_characters() {
        assert_eq!(slugify("snake_case title"), "snake_case-title");
    }

    #[test]
    fn slugify_of_symbol_only_title_is_empty() {
        assert_eq!(slugify("!!! ???"), "");
    }

    #[test]
    fn date_accepts_real_calendar_dates_only() {
        assert!(validate_date("2024-02-29").is_ok());
        assert!(validate_date("2024-02-30").is_err());
        assert!(validate_date("2023-02-29").is_err());
        assert!(validate_date("2024-13-01").is_err());
        assert!(validate_date("2024-1-01").is_err());
        assert!(validate_date("24-01-01").is_err());
        assert!(validate_date("2024/01/01").is_err());
    }

    #[test]
    fn time_accepts_24_hour_clock_only() {
        assert!(validate_time("00:00").is_ok());
        assert!(validate_time("09:30").is_ok());
        assert!(validate_time("23:59").is_ok());
        assert!(validate_time("24:00").is_err());
        assert!(validate_time("12:60").is_err());
        assert!(validate_time("7:30").is_err());
        assert!(validate_time("12:5").is_err());
    }

    #[test]
    fn normalize_rejects_empty_required_fields_and_lists() {
        let mut payload = sample_payload();
        payload.title = "   ".to_string();
        assert!(payload.normalize().is_err());

        let mut payload = sample_payload();
        payload.agenda.clear();
        assert!(payload.normalize().is_err());

        let mut payload = sample_payload();
        payload.tags.clear();
        assert!(payload.normalize().is_err());

        let mut payload = sample_payload();
        assert!(payload.normalize().is_ok());
        assert_eq!(payload.title, "RustConf 2025");
    }

    #[tokio::test]
    async fn colliding_slugs_receive_incrementing_suffixes() {
        let mut taken: HashSet<String> = HashSet::new();
        for expected in ["rustconf", "rustconf-1", "rustconf-2", "rustconf-3"] {
            let slug = resolve_unique_slug("rustconf", |candidate| {
                let hit = taken.contains(&candidate);
                async move { Ok(hit) }
            })
            .await
            .unwrap();
            assert_eq!(slug, expected);
            taken.insert(slug);
        }
    }

    #[tokio::test]
    async fn unique_base_slug_is_kept_as_is() {
        let slug = resolve_unique_slug("fresh", |_| async { Ok(false) })
            .await
            .unwrap();
        assert_eq!(slug, "fresh");
    }

    #[test]
    fn timestamps_are_stored_as_native_bson_datetimes() {
        let now = Utc::now();
        let event = Event {
            id: None,
            title: "RustConf 2025".to_string(),
            slug: "rustconf-2025".to_string(),
            description: "The annual Rust conference".to_string(),
            overview: "Talks and workshops".to_string(),
            image: "/images/rustconf.png".to_string(),
            venue: "Convention Center".to_string(),
            location: "Portland, OR".to_string(),
            date: "2025-09-12".to_string(),
            time: "09:00".to_string(),
            mode: EventMode::Offline,
            audience: "Rust developers".to_string(),
            agenda: vec!["Keynote".to_string()],
            organizer: "Rust Foundation".to_string(),
            tags: vec!["rust".to_string()],
            created_at: now,
            updated_at: now,
        };

        let doc = mongodb::bson::to_document(&event).unwrap();
        assert!(matches!(
            doc.get("created_at"),
            Some(mongodb::bson::Bson::DateTime(_))
        ));
        assert!(matches!(
            doc.get("updated_at"),
            Some(mongodb::bson::Bson::DateTime(_))
        ));
    }

    #[test]
    fn event_mode_uses_lowercase_wire_names() {
        assert_eq!(serde_json::to_string(&EventMode::Hybrid).unwrap(), "\"hybrid\"");
        let mode: EventMode = serde_json::from_str("\"online\"").unwrap();
        assert_eq!(mode, EventMode::Online);
        assert!(serde_json::from_str::<EventMode>("\"virtual\"").is_err());
    }

    fn sample_payload() -> CreateEventPayload {
        CreateEventPayload {
            title: " RustConf 2025 ".to_string(),
            description: "The annual Rust conference".to_string(),
            overview: "Talks and workshops".to_string(),
            image: "/images/rustconf.png".to_string(),
            venue: "Convention Center".to_string(),
            location: "Portland, OR".to_string(),
            date: "2025-09-12".to_string(),
            time: "09:00".to_string(),
            mode: EventMode::Offline,
            audience: "Rust developers".to_string(),
            agenda: vec!["Keynote".to_string(), "Workshops".to_string()],
            organizer: "Rust Foundation".to_string(),
            tags: vec!["rust".to_string(), "conference".to_string()],
        }
    }
}
