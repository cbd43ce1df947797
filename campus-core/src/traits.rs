//! Core trait definitions

use crate::types::Role;

/// Source of the bearer credential attached to authenticated requests.
///
/// The session store implements this; the API client only ever sees the trait,
/// so it cannot outlive or bypass the session it was built with.
pub trait TokenProvider: Send + Sync {
    /// Access token of the active role, if authenticated
    fn access_token(&self) -> Option<String>;

    /// Active role, if any
    fn role(&self) -> Option<Role>;
}

/// Fixed credential, for scripts and tests that do not need a session
#[derive(Debug, Clone, Default)]
pub struct StaticToken {
    pub token: Option<String>,
    pub role: Option<Role>,
}

impl StaticToken {
    pub fn new(token: impl Into<String>, role: Role) -> Self {
        Self {
            token: Some(token.into()),
            role: Some(role),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl TokenProvider for StaticToken {
    fn access_token(&self) -> Option<String> {
        self.token.clone()
    }

    fn role(&self) -> Option<Role> {
        self.role
    }
}
