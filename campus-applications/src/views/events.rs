//! Notice board

use campus_api::{CampusClient, Event, NewEvent};
use campus_core::{validation_error, with_cancellation, CampusResult, CancellationToken};
use chrono::{NaiveDate, NaiveTime};

/// An event with its parsed start time, for display
#[derive(Debug, Clone, PartialEq)]
pub struct NoticeCard {
    pub title: String,
    pub description: String,
    /// e.g. `Sep 13`, empty when the timestamp is unreadable
    pub day: String,
    /// e.g. `10:30`
    pub time: String,
    starts_at: Option<chrono::NaiveDateTime>,
}

impl From<Event> for NoticeCard {
    fn from(event: Event) -> Self {
        let starts_at = event.starts_at();
        Self {
            day: starts_at
                .map(|t| t.format("%b %d").to_string())
                .unwrap_or_default(),
            time: starts_at
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
            title: event.title,
            description: event.description,
            starts_at,
        }
    }
}

/// Events ordered by start time; unreadable timestamps go last
pub fn notice_board(events: Vec<Event>) -> Vec<NoticeCard> {
    let mut cards: Vec<NoticeCard> = events.into_iter().map(NoticeCard::from).collect();
    cards.sort_by_key(|card| (card.starts_at.is_none(), card.starts_at));
    cards
}

pub async fn load_notice_board(
    client: &CampusClient,
    token: &CancellationToken,
) -> CampusResult<Vec<NoticeCard>> {
    let events = with_cancellation(token, "load_notice_board", client.list_events()).await?;
    Ok(notice_board(events))
}

/// Validate the add-event form and build the request
pub fn new_event(title: &str, description: &str, date: &str, time: &str) -> CampusResult<NewEvent> {
    if title.trim().is_empty() {
        return Err(validation_error!("Title is required", "title", "events"));
    }
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| validation_error!("Date must be YYYY-MM-DD", "date", "events"))?;
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|_| validation_error!("Time must be HH:MM", "time", "events"))?;

    Ok(NewEvent {
        title: title.trim().to_string(),
        description: description.trim().to_string(),
        date: date.format("%Y-%m-%d").to_string(),
        time: time.format("%H:%M").to_string(),
    })
}
