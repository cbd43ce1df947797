//! Weekly class timetable per semester and division

use crate::client::{CampusClient, UploadFile};
use campus_core::{CampusError, CampusResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Days shown in the grid
    pub const TEACHING: [Weekday; 6] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableSlot {
    pub subject: String,
    pub teacher: String,
}

/// Time label to class; `None` is a free period
pub type DaySchedule = BTreeMap<String, Option<TimetableSlot>>;

pub type Schedule = BTreeMap<Weekday, DaySchedule>;

#[derive(Debug, Deserialize)]
struct TimetableData {
    #[serde(default)]
    data: Option<Schedule>,
}

#[derive(Debug, Deserialize)]
struct TimetableEnvelope {
    status: String,
    #[serde(default)]
    data: Option<TimetableData>,
}

impl CampusClient {
    /// `GET timetable/<sem>/<div>/`; `None` when nothing is published for the selection
    pub async fn timetable(
        &self,
        semester: &str,
        division: &str,
    ) -> CampusResult<Option<Schedule>> {
        let endpoint = format!("timetable/{}/{}/", semester.trim(), division.trim());
        let envelope: TimetableEnvelope = match self.get_json(&endpoint, &[], "timetable").await {
            Ok(envelope) => envelope,
            Err(CampusError::HttpStatus { status: 404, .. }) => {
                debug!(semester, division, "No timetable published");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if envelope.status != "success" {
            return Ok(None);
        }

        Ok(envelope.data.and_then(|d| d.data))
    }

    /// `POST generate-timetable/` with the timetable spreadsheet under `file`
    pub async fn upload_timetable(&self, file: UploadFile) -> CampusResult<serde_json::Value> {
        let form = reqwest::multipart::Form::new().part("file", file.into_part()?);
        self.post_multipart("generate-timetable/", form, "upload_timetable")
            .await
    }
}
