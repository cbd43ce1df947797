//! Login, token refresh and account registration

use crate::client::CampusClient;
use campus_core::{malformed_response_error, CampusResult, Role};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountUser {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl AccountUser {
    /// Parsed role; an unknown role name is a malformed response
    pub fn parsed_role(&self) -> CampusResult<Option<Role>> {
        match self.role.as_deref() {
            None => Ok(None),
            Some(raw) => raw
                .parse::<Role>()
                .map(Some)
                .map_err(|e| malformed_response_error!(e, "auth")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: AccountUser,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub access: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    pub access: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub user: Option<AccountUser>,
}

impl CampusClient {
    /// `POST auth/login/`
    pub async fn login(&self, request: &LoginRequest) -> CampusResult<LoginResponse> {
        let response: LoginResponse = self
            .post_public("auth/login/", request, "login")
            .await?;
        info!(role = ?response.user.role, "Login accepted");
        Ok(response)
    }

    /// `POST auth/token/refresh/`, returning the new access token
    pub async fn refresh_access(&self, refresh: &str) -> CampusResult<String> {
        let response: RefreshResponse = self
            .post_public(
                "auth/token/refresh/",
                &RefreshRequest { refresh },
                "refresh_token",
            )
            .await?;

        response
            .access
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                malformed_response_error!("refresh response carries no access token", "auth")
            })
    }

    /// `POST auth/register/`
    pub async fn register(&self, request: &RegisterRequest) -> CampusResult<RegisterResponse> {
        self.post_public("auth/register/", request, "register").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_shapes() {
        let full: LoginResponse = serde_json::from_str(
            r#"{"user": {"role": "faculty", "username": "asha"}, "refresh": "r1", "access": "a1"}"#,
        )
        .unwrap();
        assert_eq!(full.user.parsed_role().unwrap(), Some(Role::Faculty));
        assert_eq!(full.refresh.as_deref(), Some("r1"));

        let without_refresh: LoginResponse =
            serde_json::from_str(r#"{"user": {"role": "student"}}"#).unwrap();
        assert!(without_refresh.refresh.is_none());
    }

    #[test]
    fn test_unknown_role_is_malformed() {
        let user = AccountUser {
            role: Some("default".to_string()),
            username: None,
            email: None,
        };
        assert!(matches!(
            user.parsed_role(),
            Err(campus_core::CampusError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_register_request_wire_format() {
        let body = serde_json::to_value(RegisterRequest {
            username: "ravi".into(),
            email: "ravi@college.edu".into(),
            password: "pw".into(),
            role: Role::Student,
        })
        .unwrap();
        assert_eq!(body["role"], "student");
        assert_eq!(body["username"], "ravi");
    }
}
