//! Role-keyed navigation table

use crate::session::SessionState;
use campus_core::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub path: &'static str,
}

const fn link(label: &'static str, path: &'static str) -> NavLink {
    NavLink { label, path }
}

const ADMIN_LINKS: &[NavLink] = &[
    link("Home", "/"),
    link("Dashboard", "/dashboard"),
    link("Notice", "/event"),
    link("Progress Report", "/progress"),
];

const STUDENT_LINKS: &[NavLink] = &[
    link("Home", "/"),
    link("Attempt Quiz", "/attempt_quiz"),
    link("Check Attendance", "/s_attendance"),
    link("Timetables", "/time_table"),
    link("Holiday", "/s_holiday"),
    link("Notes", "/s_pdf"),
];

const FACULTY_LINKS: &[NavLink] = &[
    link("Home", "/"),
    link("Muster", "/muster"),
    link("Create Quiz", "/quiz"),
    link("Live Attendance", "/live_attendance"),
    link("Timetables", "/time_table"),
    link("Notice", "/s_event"),
    link("Holiday", "/holidays"),
    link("Create Notes", "/notes"),
    link("Pdf Upload", "/uploadPdf"),
];

const GUEST_LINKS: &[NavLink] = &[
    link("Home", "/"),
    link("Timetables", "/time_table"),
    link("Holiday", "/holidays"),
];

pub fn links_for(role: Role) -> &'static [NavLink] {
    match role {
        Role::Admin => ADMIN_LINKS,
        Role::Student => STUDENT_LINKS,
        Role::Faculty => FACULTY_LINKS,
        Role::Guest => GUEST_LINKS,
    }
}

/// Links to show for a session.
///
/// Without a token the guest set is shown whatever role is remembered; a
/// token without a role shows nothing.
pub fn visible_links(state: &SessionState) -> &'static [NavLink] {
    if !state.is_authenticated() {
        return GUEST_LINKS;
    }
    match state.role {
        Some(role) => links_for(role),
        None => &[],
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    SignUp,
    Logout,
}

impl AuthAction {
    pub fn label(&self) -> &'static str {
        match self {
            AuthAction::Login => "Login",
            AuthAction::SignUp => "SignUp",
            AuthAction::Logout => "Logout",
        }
    }
}

pub fn auth_actions(state: &SessionState) -> &'static [AuthAction] {
    if state.is_authenticated() {
        &[AuthAction::Logout]
    } else {
        &[AuthAction::Login, AuthAction::SignUp]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(role: Option<Role>, token: Option<&str>) -> SessionState {
        SessionState {
            role,
            access_token: token.map(str::to_string),
        }
    }

    #[test]
    fn test_unauthenticated_always_sees_guest_links() {
        for role in Role::ALL.into_iter().map(Some).chain([None]) {
            assert_eq!(visible_links(&state(role, None)), GUEST_LINKS);
        }
    }

    #[test]
    fn test_authenticated_links_follow_role() {
        let faculty = visible_links(&state(Some(Role::Faculty), Some("t")));
        assert_eq!(faculty.len(), 9);
        assert_eq!(faculty[3], link("Live Attendance", "/live_attendance"));

        let student = visible_links(&state(Some(Role::Student), Some("t")));
        assert!(student.iter().any(|l| l.path == "/attempt_quiz"));

        assert!(visible_links(&state(None, Some("t"))).is_empty());
    }

    #[test]
    fn test_auth_actions() {
        assert_eq!(
            auth_actions(&state(None, None)),
            &[AuthAction::Login, AuthAction::SignUp]
        );
        assert_eq!(
            auth_actions(&state(Some(Role::Admin), Some("t"))),
            &[AuthAction::Logout]
        );
    }
}
