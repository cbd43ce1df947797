//! Campus API - typed client for the Faculty & Class Management backend
//!
//! One module per backend resource. Every authenticated call reads the bearer
//! token from the injected [`campus_core::TokenProvider`] and fails with
//! `MissingCredential` before touching the network when there is none.

pub mod assistant;
pub mod attendance;
pub mod auth;
pub mod client;
pub mod events;
pub mod holidays;
pub mod pdfs;
pub mod progress;
pub mod quizzes;
pub mod students;
pub mod timetable;

pub use assistant::{AssistantReply, AssistantRequest};
pub use attendance::{
    AttendanceStatus, AttendanceUpdate, AttendanceUpdateRequest, LiveAttendance, LiveRecord,
};
pub use auth::{
    AccountUser, LoginRequest, LoginResponse, RefreshResponse, RegisterRequest, RegisterResponse,
};
pub use client::{ApiClientConfig, CampusClient, UploadFile};
pub use events::{Event, NewEvent};
pub use holidays::Holiday;
pub use pdfs::{filename_from_disposition, DownloadedFile, PdfDocument};
pub use progress::{ProgressReport, StudentMark, TopicProgress};
pub use quizzes::{QuizGenerateRequest, QuizLevel, QuizQuestion};
pub use students::{Student, StudentId, StudentRegistration};
pub use timetable::{DaySchedule, Schedule, TimetableSlot, Weekday};
