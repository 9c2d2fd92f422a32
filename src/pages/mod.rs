use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

use crate::models::event::Event;
use crate::utils::error::AppError;
use crate::AppState;

/// Landing page: static hero plus a hardcoded featured-events placeholder
/// list. Intentionally not data-driven.
pub async fn landing() -> Html<String> {
    let featured: String = (1..=5)
        .map(|n| format!("<li>Event {n}</li>"))
        .collect();

    Html(format!(
        "<!DOCTYPE html>\
         <html lang=\"en\"><head><meta charset=\"utf-8\"><title>EventHub</title></head>\
         <body><section>\
         <h1>The Hub for Every Dev<br>Event You Can't Miss</h1>\
         <p>Hackathons, Meetups and Conferences, All in One Place</p>\
         <div class=\"events\"><h3>Featured Events</h3><ul>{featured}</ul></div>\
         </section></body></html>"
    ))
}

#[derive(Deserialize)]
struct EventEnvelope {
    event: Option<Event>,
}

/// Event detail page. Performs a same-origin fetch against the public JSON
/// API (using the configured base URL, as the original site does) and
/// renders the event, or a not-found state when the API has no match.
pub async fn event_details(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let url = format!("{}/api/events/{}", state.config.public_base_url, slug);
    let response = state.http.get(&url).send().await?;
    let envelope: EventEnvelope = response.json().await?;

    match envelope.event {
        Some(event) => Ok(Html(render_event(&event)).into_response()),
        None => Ok((StatusCode::NOT_FOUND, Html(render_not_found(&slug))).into_response()),
    }
}

fn render_event(event: &Event) -> String {
    let agenda: String = event
        .agenda
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect();
    let tags: String = event
        .tags
        .iter()
        .map(|tag| format!("<span class=\"tag\">{}</span>", escape_html(tag)))
        .collect();

    format!(
        "<!DOCTYPE html>\
         <html lang=\"en\"><head><meta charset=\"utf-8\"><title>{title} | EventHub</title></head>\
         <body><section id=\"event\">\
         <h1>Event Details</h1>\
         <h2>{title}</h2>\
         <p class=\"meta\">{date} at {time} · {mode} · {venue}, {location}</p>\
         <img src=\"{image}\" alt=\"{title}\">\
         <p>{description}</p>\
         <p>{overview}</p>\
         <h3>Agenda</h3><ul>{agenda}</ul>\
         <p>Audience: {audience}</p>\
         <p>Organized by {organizer}</p>\
         <div class=\"tags\">{tags}</div>\
         </section></body></html>",
        title = escape_html(&event.title),
        date = escape_html(&event.date),
        time = escape_html(&event.time),
        mode = event.mode,
        venue = escape_html(&event.venue),
        location = escape_html(&event.location),
        image = escape_html(&event.image),
        description = escape_html(&event.description),
        overview = escape_html(&event.overview),
        audience = escape_html(&event.audience),
        organizer = escape_html(&event.organizer),
    )
}

fn render_not_found(slug: &str) -> String {
    format!(
        "<!DOCTYPE html>\
         <html lang=\"en\"><head><meta charset=\"utf-8\"><title>Not Found | EventHub</title></head>\
         <body><section><h1>Event not found</h1>\
         <p>No event matches \"{}\".</p>\
         <a href=\"/\">Back to all events</a></section></body></html>",
        escape_html(slug)
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::EventMode;
    use chrono::Utc;

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("Meet & Greet"), "Meet &amp; Greet");
    }

    #[test]
    fn event_page_escapes_user_supplied_fields() {
        let event = Event {
            id: None,
            title: "Rust <3 Devs".to_string(),
            slug: "rust-3-devs".to_string(),
            description: "desc".to_string(),
            overview: "overview".to_string(),
            image: "/img.png".to_string(),
            venue: "Hall A".to_string(),
            location: "Berlin".to_string(),
            date: "2025-10-01".to_string(),
            time: "18:30".to_string(),
            mode: EventMode::Hybrid,
            audience: "Developers".to_string(),
            agenda: vec!["Intro".to_string()],
            organizer: "RustBerlin".to_string(),
            tags: vec!["rust".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let html = render_event(&event);
        assert!(html.contains("Rust &lt;3 Devs"));
        assert!(html.contains("2025-10-01 at 18:30"));
        assert!(html.contains("hybrid"));
        assert!(html.contains("<li>Intro</li>"));
    }

    #[test]
    fn not_found_page_names_the_slug() {
        let html = render_not_found("missing-event");
        assert!(html.contains("Event not found"));
        assert!(html.contains("missing-event"));
    }
}
