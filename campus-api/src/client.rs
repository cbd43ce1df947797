//! HTTP plumbing shared by every endpoint module
//!
//! All requests go through [`CampusClient`], which joins endpoint paths onto
//! the configured base address, attaches the session's bearer token, maps
//! transport failures and non-success statuses into [`CampusError`], and
//! decodes bodies into the endpoint's schema.

use campus_core::{
    malformed_response_error, missing_credential_error, CampusConfig, CampusError, CampusResult,
    ErrorContext, TokenProvider,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL every endpoint is joined onto
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
    /// Additional headers
    pub headers: HashMap<String, String>,
    /// Absolute URL of the assistant intermediary
    pub assistant_endpoint: Option<String>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            timeout_seconds: 30,
            user_agent: format!("campus/{}", env!("CARGO_PKG_VERSION")),
            headers: HashMap::new(),
            assistant_endpoint: None,
        }
    }
}

impl ApiClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn from_campus_config(config: &CampusConfig) -> Self {
        Self {
            base_url: config.api.base_url.clone(),
            timeout_seconds: config.api.timeout_seconds,
            user_agent: config.api.user_agent.clone(),
            headers: HashMap::new(),
            assistant_endpoint: Some(config.assistant_endpoint()),
        }
    }

    /// Set additional header
    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_assistant_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.assistant_endpoint = Some(endpoint.into());
        self
    }
}

/// A file picked for a multipart upload
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            mime: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Read a file from disk, guessing the MIME type from its extension
    pub async fn from_path(path: impl AsRef<Path>) -> CampusResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let mime = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("pdf") => Some("application/pdf"),
            Some("xlsx") => {
                Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
            }
            Some("xls") => Some("application/vnd.ms-excel"),
            Some("csv") => Some("text/csv"),
            _ => None,
        };

        Ok(Self {
            file_name,
            bytes,
            mime: mime.map(str::to_string),
        })
    }

    pub(crate) fn into_part(self) -> CampusResult<reqwest::multipart::Part> {
        let part = reqwest::multipart::Part::bytes(self.bytes).file_name(self.file_name);
        match self.mime {
            Some(mime) => part.mime_str(&mime).map_err(|e| CampusError::Validation {
                message: format!("Invalid MIME type '{}': {}", mime, e),
                field: Some("file".to_string()),
                context: ErrorContext::new("api_client").with_operation("upload"),
            }),
            None => Ok(part),
        }
    }
}

/// Client for the Faculty & Class Management backend
pub struct CampusClient {
    client: reqwest::Client,
    config: ApiClientConfig,
    credentials: Arc<dyn TokenProvider>,
}

impl CampusClient {
    /// Create a new client; `credentials` supplies the bearer token per request
    pub fn new(config: ApiClientConfig, credentials: Arc<dyn TokenProvider>) -> CampusResult<Self> {
        url::Url::parse(&config.base_url).map_err(|e| CampusError::Config {
            message: format!("Invalid base URL '{}': {}", config.base_url, e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("api_client")
                .with_operation("create_client")
                .with_suggestion("Set api.base_url to an absolute http(s) URL"),
        })?;

        let client = create_http_client(&config)?;
        debug!("Created Campus API client for {}", config.base_url);

        Ok(Self {
            client,
            config,
            credentials,
        })
    }

    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Arc<dyn TokenProvider> {
        &self.credentials
    }

    pub(crate) fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// Bearer token for `operation`, or `MissingCredential` before anything is sent
    pub(crate) fn bearer(&self, operation: &str) -> CampusResult<String> {
        match self.credentials.access_token() {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(missing_credential_error!(operation, "api_client")),
        }
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.client
    }

    /// Send a request and turn transport failures and non-success statuses into errors
    pub(crate) async fn send(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> CampusResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(e, operation, self.config.timeout_seconds))?;

        if !response.status().is_success() {
            return Err(handle_response_error(response, operation).await);
        }

        Ok(response)
    }

    /// Authenticated GET decoded as `T`
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        operation: &str,
    ) -> CampusResult<T> {
        let token = self.bearer(operation)?;
        let url = self.url(endpoint);
        debug!(operation, %url, "GET");

        let request = self.client.get(&url).bearer_auth(token).query(query);
        let response = self.send(request, operation).await?;
        decode_json(response, operation).await
    }

    /// Authenticated request with a JSON body, decoded as `T`
    pub(crate) async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        body: &B,
        operation: &str,
    ) -> CampusResult<T> {
        let token = self.bearer(operation)?;
        let url = self.url(endpoint);
        debug!(operation, %url, %method, "JSON request");

        let request = self
            .client
            .request(method, &url)
            .bearer_auth(token)
            .json(body);
        let response = self.send(request, operation).await?;
        decode_json(response, operation).await
    }

    /// Unauthenticated POST used by the login, refresh and signup flows
    pub(crate) async fn post_public<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
        operation: &str,
    ) -> CampusResult<T> {
        let url = self.url(endpoint);
        debug!(operation, %url, "Public POST");

        let request = self.client.post(&url).json(body);
        let response = self.send(request, operation).await?;
        decode_json(response, operation).await
    }

    /// Authenticated multipart POST; the body is returned as loose JSON
    pub(crate) async fn post_multipart(
        &self,
        endpoint: &str,
        form: reqwest::multipart::Form,
        operation: &str,
    ) -> CampusResult<serde_json::Value> {
        let token = self.bearer(operation)?;
        let url = self.url(endpoint);
        debug!(operation, %url, "Multipart POST");

        let request = self.client.post(&url).bearer_auth(token).multipart(form);
        let response = self.send(request, operation).await?;
        decode_loose(response, operation).await
    }
}

/// Helper function to create HTTP client with common configuration
pub(crate) fn create_http_client(config: &ApiClientConfig) -> CampusResult<reqwest::Client> {
    let mut headers = reqwest::header::HeaderMap::new();

    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_str(&config.user_agent).map_err(|e| {
            CampusError::Config {
                message: format!("Invalid user agent: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("http_client").with_operation("create_client"),
            }
        })?,
    );

    for (key, value) in &config.headers {
        let header_name = reqwest::header::HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
            CampusError::Config {
                message: format!("Invalid header name '{}': {}", key, e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("http_client").with_operation("create_client"),
            }
        })?;

        let header_value =
            reqwest::header::HeaderValue::from_str(value).map_err(|e| CampusError::Config {
                message: format!("Invalid header value for '{}': {}", key, e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("http_client").with_operation("create_client"),
            })?;

        headers.insert(header_name, header_value);
    }

    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_seconds))
        .default_headers(headers)
        .build()
        .map_err(|e| CampusError::Internal {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("http_client").with_operation("create_client"),
        })
}

fn transport_error(e: reqwest::Error, operation: &str, timeout_seconds: u64) -> CampusError {
    if e.is_timeout() {
        CampusError::Timeout {
            operation: operation.to_string(),
            duration_ms: timeout_seconds * 1000,
            context: ErrorContext::new("api_client")
                .with_operation(operation)
                .with_suggestion("Increase api.timeout_seconds"),
        }
    } else {
        CampusError::Network {
            message: format!("Request failed: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("api_client")
                .with_operation(operation)
                .with_suggestion("Check that the backend is running and reachable"),
        }
    }
}

/// Helper function to handle HTTP response errors
pub(crate) async fn handle_response_error(
    response: reqwest::Response,
    operation: &str,
) -> CampusError {
    let status = response.status();
    let url = response.url().clone();
    let error_body = response.text().await.unwrap_or_default();

    CampusError::HttpStatus {
        status: status.as_u16(),
        message: error_detail(&error_body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string()),
        context: ErrorContext::new("api_client")
            .with_operation(operation)
            .with_metadata("url", url.as_str())
            .with_suggestion(match status.as_u16() {
                401 => "Log in again, the access token may have expired",
                403 => "This action is not allowed for the current role",
                404 => "The requested resource does not exist",
                _ => "Check network connectivity and backend status",
            }),
    }
}

/// Pull a human-readable message out of an error body.
///
/// The backend reports errors as `{"detail": ...}`, `{"error": ...}` or
/// `{"message": ...}`; anything else is used verbatim when short.
pub(crate) fn error_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(trimmed)
    {
        for key in ["detail", "error", "message"] {
            if let Some(serde_json::Value::String(text)) = map.get(key) {
                return Some(text.clone());
            }
        }
        return None;
    }

    if trimmed.len() <= 200 {
        Some(trimmed.to_string())
    } else {
        None
    }
}

pub(crate) async fn decode_json<T: DeserializeOwned>(
    response: reqwest::Response,
    operation: &str,
) -> CampusResult<T> {
    let body = response.text().await.map_err(|e| CampusError::Network {
        message: format!("Failed to read response body: {}", e),
        source: Some(Box::new(e)),
        context: ErrorContext::new("api_client").with_operation(operation),
    })?;

    serde_json::from_str(&body).map_err(|e| {
        malformed_response_error!(
            format!("Unexpected response shape for '{}': {}", operation, e),
            "api_client",
            e
        )
    })
}

/// Decode a body whose shape the caller does not rely on; empty bodies become `null`
pub(crate) async fn decode_loose(
    response: reqwest::Response,
    operation: &str,
) -> CampusResult<serde_json::Value> {
    let body = response.text().await.map_err(|e| CampusError::Network {
        message: format!("Failed to read response body: {}", e),
        source: Some(Box::new(e)),
        context: ErrorContext::new("api_client").with_operation(operation),
    })?;

    if body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }

    Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
}
