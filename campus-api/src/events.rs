//! Notices and events

use crate::client::CampusClient;
use campus_core::CampusResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// ISO-8601 date and time as sent by the backend
    pub event_datetime: String,
}

impl Event {
    /// Parsed timestamp, accepting RFC 3339 or a naive `YYYY-MM-DDTHH:MM[:SS]`
    pub fn starts_at(&self) -> Option<chrono::NaiveDateTime> {
        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&self.event_datetime) {
            return Some(dt.naive_local());
        }
        ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
            .iter()
            .find_map(|fmt| chrono::NaiveDateTime::parse_from_str(&self.event_datetime, fmt).ok())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
}

impl CampusClient {
    /// `GET get-events/`
    pub async fn list_events(&self) -> CampusResult<Vec<Event>> {
        self.get_json("get-events/", &[], "list_events").await
    }

    /// `POST add-event/`
    pub async fn add_event(&self, event: &NewEvent) -> CampusResult<serde_json::Value> {
        self.send_json(reqwest::Method::POST, "add-event/", event, "add_event")
            .await
    }
}
