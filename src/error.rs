// HTTP-facing error type for the dashboard routes
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

use crate::middleware::response::found;
use crate::discord::{DiscordError, MessagingError};
use crate::session::SessionError;
use crate::store::StoreError;

/// Route-level failure. Most variants render as a plain-text page; the two
/// session-gate signals turn into redirects to the earlier step.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("{0}")]
    Configuration(String),

    #[error("Invalid OAuth state.")]
    OAuthState,

    #[error("Token exchange failed: {0}")]
    Exchange(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    BadRequest(String),

    // 302 to an earlier step
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("no server selected")]
    NoTenantSelected,

    // 403 Forbidden
    #[error("{0}")]
    Forbidden(String),

    // 500 Internal Server Error
    #[error("{0}")]
    InternalServerError(String),

    // 502 Bad Gateway (panel delivery)
    #[error("{0}")]
    BadGateway(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Configuration(_)
            | ApiError::OAuthState
            | ApiError::Exchange(_)
            | ApiError::Upstream(_)
            | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotAuthenticated | ApiError::NoTenantSelected => StatusCode::FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Configuration(_) => "CONFIGURATION_ERROR",
            ApiError::OAuthState => "OAUTH_STATE_ERROR",
            ApiError::Exchange(_) => "EXCHANGE_ERROR",
            ApiError::Upstream(_) => "UPSTREAM_ERROR",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::NotAuthenticated => "NOT_AUTHENTICATED",
            ApiError::NoTenantSelected => "NO_TENANT_SELECTED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::BadGateway(_) => "BAD_GATEWAY",
        }
    }

    /// Where the session gate sends the browser instead of showing an error.
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            ApiError::NotAuthenticated => Some("/"),
            ApiError::NoTenantSelected => Some("/servers"),
            _ => None,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "error": true,
            "message": self.to_string(),
            "code": self.error_code()
        })
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl From<DiscordError> for ApiError {
    fn from(err: DiscordError) -> Self {
        match err {
            DiscordError::ConfigMissing(setting) => ApiError::Configuration(format!("{setting} missing")),
            DiscordError::InvalidUrl { .. } => ApiError::Configuration(err.to_string()),
            DiscordError::Exchange(body) => {
                tracing::error!("Token exchange failed: {}", body);
                ApiError::Exchange(body)
            }
            DiscordError::Upstream { .. } => {
                tracing::error!("Identity provider error: {}", err);
                ApiError::Upstream(err.to_string())
            }
            DiscordError::Http(e) => {
                tracing::error!("Identity provider unreachable: {}", e);
                ApiError::Upstream(format!("Identity provider request failed: {e}"))
            }
        }
    }
}

impl From<MessagingError> for ApiError {
    fn from(err: MessagingError) -> Self {
        match err {
            MessagingError::MissingToken => ApiError::Configuration(err.to_string()),
            other => {
                tracing::error!("Panel delivery failed: {}", other);
                ApiError::BadGateway(format!("Failed to post panel: {other}"))
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Invalid(msg) => ApiError::bad_request(msg),
            StoreError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("Settings store error: {}", sqlx_err);
                ApiError::internal_server_error("Settings store error occurred")
            }
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::OAuthStateMismatch => ApiError::OAuthState,
            SessionError::NotAuthenticated => ApiError::NotAuthenticated,
            SessionError::TenantNotManageable(_) => ApiError::forbidden(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Some(target) = self.redirect_target() {
            return found(target);
        }
        (self.status_code(), self.to_string()).into_response()
    }
}

/// Same error rendered in the JSON envelope, for `/api` routes.
#[derive(Debug)]
pub struct JsonError(pub ApiError);

impl From<ApiError> for JsonError {
    fn from(err: ApiError) -> Self {
        JsonError(err)
    }
}

impl From<StoreError> for JsonError {
    fn from(err: StoreError) -> Self {
        JsonError(err.into())
    }
}

impl From<DiscordError> for JsonError {
    fn from(err: DiscordError) -> Self {
        JsonError(err.into())
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        if let Some(target) = self.0.redirect_target() {
            return found(target);
        }
        (self.0.status_code(), Json(self.0.to_json())).into_response()
    }
}
