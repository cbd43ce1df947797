//! Attendance marking and the live attendance feed

use crate::client::CampusClient;
use crate::students::StudentId;
use campus_core::CampusResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    #[serde(rename = "P")]
    Present,
    #[serde(rename = "A")]
    Absent,
}

impl AttendanceStatus {
    pub fn code(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "P",
            AttendanceStatus::Absent => "A",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveRecord {
    pub student_id: StudentId,
    #[serde(default)]
    pub name: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LiveAttendance {
    pub students: Vec<LiveRecord>,
}

/// One row of a saved sheet; `status` is `true` for present
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceUpdate {
    pub student_id: StudentId,
    pub status: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceUpdateRequest {
    pub semester: u32,
    pub subject_id: u32,
    pub date: NaiveDate,
    pub updates: Vec<AttendanceUpdate>,
}

impl CampusClient {
    /// `PUT attendance/update/`
    pub async fn update_attendance(
        &self,
        request: &AttendanceUpdateRequest,
    ) -> CampusResult<serde_json::Value> {
        self.send_json(
            reqwest::Method::PUT,
            "attendance/update/",
            request,
            "update_attendance",
        )
        .await
    }

    /// `GET attendance/live/?semester=&subject_id=&date=`
    pub async fn live_attendance(
        &self,
        semester: u32,
        subject_id: u32,
        date: NaiveDate,
    ) -> CampusResult<LiveAttendance> {
        self.get_json(
            "attendance/live/",
            &[
                ("semester", semester.to_string()),
                ("subject_id", subject_id.to_string()),
                ("date", date.format("%Y-%m-%d").to_string()),
            ],
            "live_attendance",
        )
        .await
    }
}
