//! Progress report summary

use campus_api::{ProgressReport, StudentMark};

pub const NOT_READY_MESSAGE: &str = "Progress report for this semester is not ready yet.";

#[derive(Debug, Clone, PartialEq)]
pub struct TopicSummary {
    pub topic: String,
    pub average_marks: f64,
    pub students: Vec<StudentMark>,
}

impl TopicSummary {
    pub fn top_scorer(&self) -> Option<&StudentMark> {
        self.students
            .iter()
            .max_by(|a, b| a.marks.total_cmp(&b.marks))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressView {
    NotReady { semester: String },
    Ready { semester: String, topics: Vec<TopicSummary> },
}

impl ProgressView {
    /// Topics in name order, students in descending marks
    pub fn from_report(report: ProgressReport) -> Self {
        if !report.is_ready() {
            return ProgressView::NotReady {
                semester: report.semester,
            };
        }

        let topics = report
            .topics
            .into_iter()
            .map(|(topic, progress)| {
                let mut students = progress.students;
                students.sort_by(|a, b| b.marks.total_cmp(&a.marks));
                TopicSummary {
                    topic,
                    average_marks: progress.average_marks,
                    students,
                }
            })
            .collect();

        ProgressView::Ready {
            semester: report.semester,
            topics,
        }
    }
}
