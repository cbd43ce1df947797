//! Attendance marking sheet and the live attendance monitor

use async_trait::async_trait;
use campus_api::{
    AttendanceStatus, AttendanceUpdate, AttendanceUpdateRequest, CampusClient, LiveAttendance,
    Student, StudentId,
};
use campus_core::{
    spawn_periodic, validation_error, with_cancellation, with_timeout, CampusResult,
    CancellationToken,
};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Which class and day a sheet or monitor is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassSession {
    pub semester: u32,
    pub subject_id: u32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub student: Student,
    /// `None` until marked
    pub present: Option<bool>,
}

/// Faculty view: mark each student of a semester present or absent
#[derive(Debug, Clone)]
pub struct AttendanceSheet {
    pub session: ClassSession,
    rows: Vec<SheetRow>,
}

impl AttendanceSheet {
    pub fn new(session: ClassSession, students: Vec<Student>) -> Self {
        Self {
            session,
            rows: students
                .into_iter()
                .map(|student| SheetRow {
                    student,
                    present: None,
                })
                .collect(),
        }
    }

    pub async fn load(
        client: &CampusClient,
        session: ClassSession,
        token: &CancellationToken,
    ) -> CampusResult<Self> {
        let students = with_cancellation(
            token,
            "load_attendance_sheet",
            client.students_by_semester(session.semester),
        )
        .await?;
        Ok(Self::new(session, students))
    }

    pub fn rows(&self) -> &[SheetRow] {
        &self.rows
    }

    pub fn mark(&mut self, student_id: &StudentId, present: bool) -> CampusResult<()> {
        let row = self
            .rows
            .iter_mut()
            .find(|row| &row.student.student_id == student_id)
            .ok_or_else(|| {
                validation_error!(
                    format!("Student {} is not on this sheet", student_id),
                    "student_id",
                    "attendance"
                )
            })?;
        row.present = Some(present);
        Ok(())
    }

    pub fn mark_all(&mut self, present: bool) {
        for row in &mut self.rows {
            row.present = Some(present);
        }
    }

    /// Save payload; unmarked students are recorded absent
    pub fn to_request(&self) -> AttendanceUpdateRequest {
        AttendanceUpdateRequest {
            semester: self.session.semester,
            subject_id: self.session.subject_id,
            date: self.session.date,
            updates: self
                .rows
                .iter()
                .map(|row| AttendanceUpdate {
                    student_id: row.student.student_id.clone(),
                    status: row.present.unwrap_or(false),
                })
                .collect(),
        }
    }

    pub async fn save(&self, client: &CampusClient) -> CampusResult<()> {
        client.update_attendance(&self.to_request()).await?;
        Ok(())
    }
}

/// Source of live attendance records
#[async_trait]
pub trait AttendanceFeed: Send + Sync {
    async fn fetch_live(&self, session: ClassSession) -> CampusResult<LiveAttendance>;
}

#[async_trait]
impl AttendanceFeed for CampusClient {
    async fn fetch_live(&self, session: ClassSession) -> CampusResult<LiveAttendance> {
        self.live_attendance(session.semester, session.subject_id, session.date)
            .await
    }
}

/// Latest published poll result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveSnapshot {
    pub statuses: HashMap<StudentId, AttendanceStatus>,
    pub polls: u64,
    pub last_error: Option<String>,
}

impl LiveSnapshot {
    /// `P`, `A`, or `-` when the student has no record yet
    pub fn status_label(&self, student_id: &StudentId) -> &'static str {
        self.statuses
            .get(student_id)
            .map(AttendanceStatus::code)
            .unwrap_or("-")
    }
}

/// Student view: polls the live feed while a student list is loaded
pub struct LiveAttendanceMonitor {
    students: Vec<Student>,
    snapshots: watch::Receiver<LiveSnapshot>,
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl LiveAttendanceMonitor {
    /// Start polling every `period`; `None` when there is nobody to watch.
    ///
    /// A poll that has not answered within one period is reported as a
    /// timeout. The poller stops when `token` is cancelled or the monitor is
    /// stopped or dropped; stopping the monitor leaves `token` itself untouched.
    pub fn start(
        feed: Arc<dyn AttendanceFeed>,
        session: ClassSession,
        students: Vec<Student>,
        period: Duration,
        token: CancellationToken,
    ) -> Option<Self> {
        if students.is_empty() {
            debug!("No students loaded, live polling not started");
            return None;
        }

        let (tx, snapshots) = watch::channel(LiveSnapshot::default());
        let tx = Arc::new(tx);
        let poll_token = token.child_token();
        let monitor_token = poll_token.clone();

        let poll_timeout_ms = u64::try_from(period.as_millis()).unwrap_or(u64::MAX);
        let task = spawn_periodic(period, poll_token.clone(), move || {
            let feed = Arc::clone(&feed);
            let tx = Arc::clone(&tx);
            let token = poll_token.clone();
            async move {
                let poll = async {
                    with_timeout(feed.fetch_live(session), poll_timeout_ms, "live_attendance")
                        .await?
                };
                let result = with_cancellation(&token, "live_attendance", poll).await;
                tx.send_modify(|snapshot| {
                    snapshot.polls += 1;
                    match result {
                        Ok(live) => {
                            snapshot.statuses = live
                                .students
                                .into_iter()
                                .map(|record| (record.student_id, record.status))
                                .collect();
                            snapshot.last_error = None;
                        }
                        Err(e) => {
                            warn!(error = %e, "Live attendance poll failed");
                            snapshot.last_error = Some(e.user_message());
                        }
                    }
                });
            }
        });

        Some(Self {
            students,
            snapshots,
            token: monitor_token,
            task: Some(task),
        })
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn snapshot(&self) -> LiveSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LiveSnapshot> {
        self.snapshots.clone()
    }

    /// Cancel polling and wait for the poller to finish
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Live attendance poller ended abnormally");
            }
        }
    }
}

impl Drop for LiveAttendanceMonitor {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
