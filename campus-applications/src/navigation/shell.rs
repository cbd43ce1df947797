//! Navigation shell: role-aware links plus the login, signup and refresh flows

use super::links::{auth_actions, visible_links, AuthAction, NavLink};
use super::theme::ThemePreference;
use crate::session::SessionStore;
use campus_api::{CampusClient, LoginRequest, RegisterRequest};
use campus_core::{
    log_operation_start, log_operation_success, malformed_response_error,
    missing_credential_error, validation_error, CampusResult, Role,
};
use std::sync::Arc;
use tracing::info;

/// Fields of the signup form; the role defaults to student
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

pub struct NavigationShell {
    session: Arc<SessionStore>,
    client: Arc<CampusClient>,
}

impl NavigationShell {
    pub fn new(session: Arc<SessionStore>, client: Arc<CampusClient>) -> Self {
        Self { session, client }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn links(&self) -> &'static [NavLink] {
        visible_links(&self.session.snapshot())
    }

    pub fn auth_actions(&self) -> &'static [AuthAction] {
        auth_actions(&self.session.snapshot())
    }

    pub fn theme(&self) -> ThemePreference {
        ThemePreference::new(self.session.local_store())
    }

    /// Log in and exchange the returned refresh token for an access token.
    ///
    /// The role and refresh token are persisted before the exchange, so a
    /// failed exchange can be retried later with [`Self::refresh_session`].
    /// Switching roles drops the held access token first; it was issued for
    /// the previous role.
    pub async fn login(&self, email: &str, password: &str) -> CampusResult<Role> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(validation_error!(
                "Email and password are required",
                "email",
                "navigation"
            ));
        }

        log_operation_start!("login", email = email);
        let response = self
            .client
            .login(&LoginRequest {
                email: email.trim().to_string(),
                password: password.to_string(),
            })
            .await?;

        let role = response.user.parsed_role()?.ok_or_else(|| {
            malformed_response_error!("login response carries no role", "navigation")
        })?;
        let refresh = response
            .refresh
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                malformed_response_error!("login response carries no refresh token", "navigation")
            })?;

        if self.session.role() != Some(role) {
            self.session.clear_access_token();
        }
        self.session.set_role(Some(role))?;
        self.session.set_refresh_token(&refresh, role)?;

        let access = self.client.refresh_access(&refresh).await?;
        self.session.set_access_token(&access, Some(role))?;

        log_operation_success!("login", role = %role);
        Ok(role)
    }

    /// Register an account; no token is issued, the user logs in afterwards
    pub async fn signup(&self, form: &SignupForm) -> CampusResult<Option<Role>> {
        let role = form.role.unwrap_or(Role::Student);
        if !Role::SIGNUP.contains(&role) {
            return Err(validation_error!(
                format!("Cannot sign up as {}", role),
                "role",
                "navigation"
            ));
        }
        for (field, value) in [
            ("username", &form.username),
            ("email", &form.email),
            ("password", &form.password),
        ] {
            if value.trim().is_empty() {
                return Err(validation_error!(
                    format!("{} is required", field),
                    field,
                    "navigation"
                ));
            }
        }

        let response = self
            .client
            .register(&RegisterRequest {
                username: form.username.trim().to_string(),
                email: form.email.trim().to_string(),
                password: form.password.clone(),
                role,
            })
            .await?;

        let registered = match response.user {
            Some(user) => user.parsed_role()?,
            None => None,
        };
        if let Some(registered) = registered {
            self.session.set_role(Some(registered))?;
        }

        info!(role = %role, "Account registered");
        Ok(registered)
    }

    /// Exchange the active role's refresh token for a new access token
    pub async fn refresh_session(&self) -> CampusResult<()> {
        let role = self
            .session
            .role()
            .ok_or_else(|| missing_credential_error!("refresh_session", "navigation"))?;
        let refresh = self
            .session
            .refresh_token(Some(role))?
            .ok_or_else(|| missing_credential_error!("refresh_session", "navigation"))?;

        let access = self.client.refresh_access(&refresh).await?;
        self.session.set_access_token(&access, Some(role))
    }

    pub fn logout(&self, role: Option<Role>) -> CampusResult<()> {
        self.session.logout(role)
    }
}
