//! Page view models
//!
//! Each view fetches through a [`campus_api::CampusClient`] built on the
//! session store, so every request carries the active role's token.

pub mod attendance;
pub mod events;
pub mod holidays;
pub mod muster;
pub mod notes;
pub mod progress;
pub mod quiz;
pub mod timetable;
pub mod workload;

pub use attendance::{
    AttendanceFeed, AttendanceSheet, ClassSession, LiveAttendanceMonitor, LiveSnapshot, SheetRow,
};
pub use events::{load_notice_board, new_event, notice_board, NoticeCard};
pub use holidays::{group_by_month, HolidayEntry, MonthGroup};
pub use muster::Muster;
pub use notes::{download_notes, list_notes, save_download, upload_notes};
pub use progress::{ProgressView, TopicSummary, NOT_READY_MESSAGE};
pub use quiz::QuizAttempt;
pub use timetable::{Cell, TimetableGrid};
pub use workload::{FacultyLoad, WorkloadStatus};
