//! Session state and persisted credential types

use campus_core::Role;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Local storage key holding the active role
pub const ROLE_KEY: &str = "role";

/// Local storage key holding the light/dark preference
pub const THEME_KEY: &str = "theme";

/// Lifetime of a persisted access token
pub fn access_token_ttl() -> Duration {
    Duration::days(1)
}

/// Lifetime of a persisted refresh token
pub fn refresh_token_ttl() -> Duration {
    Duration::days(7)
}

/// Cookie holding the access token issued for `role`
pub fn access_cookie_name(role: Role) -> String {
    format!("access_token_{}", role.as_str())
}

/// Cookie holding the refresh token issued for `role`
pub fn refresh_cookie_name(role: Role) -> String {
    format!("refresh_token_{}", role.as_str())
}

/// In-memory view of who is logged in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub role: Option<Role>,
    pub access_token: Option<String>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SameSite {
    #[default]
    Strict,
    Lax,
    None,
}

/// A persisted credential with browser-cookie attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub expires_at: DateTime<Utc>,
    pub secure: bool,
    pub same_site: SameSite,
}

impl Cookie {
    /// Secure, strict same-site cookie expiring `ttl` from now
    pub fn strict(name: impl Into<String>, value: impl Into<String>, ttl: Duration) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires_at: Utc::now() + ttl,
            secure: true,
            same_site: SameSite::Strict,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_names_are_role_scoped() {
        assert_eq!(access_cookie_name(Role::Faculty), "access_token_faculty");
        assert_eq!(refresh_cookie_name(Role::Admin), "refresh_token_admin");
    }

    #[test]
    fn test_cookie_expiry() {
        let cookie = Cookie::strict("access_token_student", "t", access_token_ttl());
        let now = Utc::now();
        assert!(!cookie.is_expired_at(now));
        assert!(cookie.is_expired_at(now + Duration::days(2)));
        assert!(cookie.secure);
        assert_eq!(cookie.same_site, SameSite::Strict);
    }

    #[test]
    fn test_authenticated_requires_non_empty_token() {
        let mut state = SessionState::default();
        assert!(!state.is_authenticated());
        state.access_token = Some(String::new());
        assert!(!state.is_authenticated());
        state.access_token = Some("abc".into());
        assert!(state.is_authenticated());
    }
}
