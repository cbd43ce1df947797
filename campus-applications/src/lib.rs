//! Campus Applications - session, navigation and page logic
//!
//! Built on the typed client in `campus-api`:
//!
//! - **Session** (`session`): role and role-scoped tokens, persisted like
//!   browser cookies and local storage
//! - **Navigation** (`navigation`): role-aware links, login/signup/refresh
//!   flows and the theme preference
//! - **Views** (`views`): the per-page fetch-and-render logic
//! - **Assistant** (`assistant`): prompt templates and reply formatting
//!
//! [`CampusApp`] wires them together from a [`CampusConfig`].

pub mod assistant;
pub mod navigation;
pub mod session;
pub mod views;

pub use assistant::Assistant;
pub use navigation::{AuthAction, NavLink, NavigationShell, SignupForm, ThemePreference};
pub use session::{SessionState, SessionStore, StorageBackends};

use campus_api::{ApiClientConfig, CampusClient};
use campus_core::{with_cancellation, CampusConfig, CampusResult, CancellationToken};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use views::{AttendanceFeed, ClassSession, LiveAttendanceMonitor};

/// The session store and everything that reads from it
pub struct CampusApp {
    config: CampusConfig,
    session: Arc<SessionStore>,
    client: Arc<CampusClient>,
}

impl CampusApp {
    /// Restore the session persisted under the configured data directory
    pub fn open(config: CampusConfig) -> CampusResult<Self> {
        let backends = StorageBackends::file_backed(config.data_dir())?;
        Self::with_backends(config, backends)
    }

    pub fn with_backends(config: CampusConfig, backends: StorageBackends) -> CampusResult<Self> {
        let session = Arc::new(SessionStore::restore(backends)?);
        let client = Arc::new(CampusClient::new(
            ApiClientConfig::from_campus_config(&config),
            session.clone(),
        )?);

        info!(
            base_url = %config.api.base_url,
            role = ?session.role(),
            "Campus application ready"
        );

        Ok(Self {
            config,
            session,
            client,
        })
    }

    pub fn config(&self) -> &CampusConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn client(&self) -> &Arc<CampusClient> {
        &self.client
    }

    pub fn shell(&self) -> NavigationShell {
        NavigationShell::new(self.session.clone(), self.client.clone())
    }

    pub fn assistant(&self) -> Assistant {
        Assistant::new(self.client.clone(), self.config.assistant.enabled)
    }

    /// Class session for `semester` on `date` using the configured subject
    pub fn class_session(&self, semester: u32, date: chrono::NaiveDate) -> ClassSession {
        ClassSession {
            semester,
            subject_id: self.config.attendance.subject_id,
            date,
        }
    }

    /// Load the semester's students and start polling their live attendance.
    ///
    /// Cancelling `token` aborts the roster load as well as the polling.
    pub async fn watch_attendance(
        &self,
        session: ClassSession,
        token: CancellationToken,
    ) -> CampusResult<Option<LiveAttendanceMonitor>> {
        let students = with_cancellation(
            &token,
            "watch_attendance",
            self.client.students_by_semester(session.semester),
        )
        .await?;
        let feed: Arc<dyn AttendanceFeed> = self.client.clone();
        Ok(LiveAttendanceMonitor::start(
            feed,
            session,
            students,
            Duration::from_millis(self.config.attendance.poll_interval_ms),
            token,
        ))
    }
}
