//! Per-topic marks report

use crate::client::CampusClient;
use crate::students::StudentId;
use campus_core::{malformed_response_error, CampusResult};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StudentMark {
    pub student_id: StudentId,
    #[serde(default)]
    pub name: String,
    pub marks: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TopicProgress {
    pub average_marks: f64,
    #[serde(default)]
    pub students: Vec<StudentMark>,
}

#[derive(Debug, Deserialize)]
struct ProgressEnvelope {
    status: String,
    #[serde(default)]
    data: HashMap<String, BTreeMap<String, TopicProgress>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    pub semester: String,
    pub topics: BTreeMap<String, TopicProgress>,
}

impl ProgressReport {
    /// A semester without any topic has no report yet
    pub fn is_ready(&self) -> bool {
        !self.topics.is_empty()
    }
}

impl CampusClient {
    /// `GET marks-by-topic/?semester=`
    pub async fn progress_report(&self, semester: &str) -> CampusResult<ProgressReport> {
        let mut envelope: ProgressEnvelope = self
            .get_json(
                "marks-by-topic/",
                &[("semester", semester.to_string())],
                "progress_report",
            )
            .await?;

        if envelope.status != "success" {
            return Err(malformed_response_error!(
                format!("progress response status '{}'", envelope.status),
                "progress"
            ));
        }

        Ok(ProgressReport {
            semester: semester.to_string(),
            topics: envelope.data.remove(semester).unwrap_or_default(),
        })
    }
}
