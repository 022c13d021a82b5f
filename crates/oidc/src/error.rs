use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use taramock_core::flow::{error_redirect_url, AuthorizeErrorCode, AuthorizeRejection, FlowError};
use thiserror::Error;
use url::Url;

use crate::templates;

/// Respond with `302 Found` to the given URL.
pub(crate) fn found(url: &Url) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, url.as_str())]).into_response()
}

/// Errors of the authorization and redirect-completion endpoints.
///
/// Reported to the relying party through its redirect URI when one is
/// usable, otherwise rendered as a local error page.
#[derive(Debug, Error)]
pub enum AuthorizeError {
    #[error("invalid redirect_uri: {0}")]
    InvalidRedirectUri(String),

    #[error("{error}: {description}")]
    Redirect {
        redirect_uri: Url,
        error: AuthorizeErrorCode,
        description: String,
        state: Option<String>,
    },
}

impl AuthorizeError {
    /// Attaches the request's `state` to a validation rejection.
    pub fn from_rejection(rejection: AuthorizeRejection, state: Option<String>) -> Self {
        match rejection {
            AuthorizeRejection::InvalidRedirectUri(message) => Self::InvalidRedirectUri(message),
            AuthorizeRejection::Redirect {
                redirect_uri,
                error,
                description,
            } => Self::Redirect {
                redirect_uri,
                error,
                description,
                state,
            },
        }
    }
}

impl IntoResponse for AuthorizeError {
    fn into_response(self) -> Response {
        match self {
            AuthorizeError::InvalidRedirectUri(message) => {
                tracing::info!(%message, "Rejected authorization request without redirect target");
                (
                    StatusCode::BAD_REQUEST,
                    Html(templates::error_page(&format!("Invalid redirect_uri: {message}"))),
                )
                    .into_response()
            }
            AuthorizeError::Redirect {
                redirect_uri,
                error,
                description,
                state,
            } => {
                tracing::info!(%error, %description, "Redirecting authorization error to client");
                found(&error_redirect_url(
                    &redirect_uri,
                    error,
                    &description,
                    state.as_deref(),
                ))
            }
        }
    }
}

/// Token endpoint errors, rendered as OAuth 2.0 JSON error bodies.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("unsupported grant_type: {0}")]
    UnsupportedGrantType(String),

    /// Unknown, expired, or already redeemed code, or a redirect URI mismatch.
    #[error("{0}")]
    InvalidGrant(String),

    #[error("{0}")]
    InvalidClient(String),

    #[error("failed to sign ID token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Storage(#[from] FlowError),
}

/// OAuth 2.0 error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub error_description: String,
}

impl TokenError {
    pub fn error_code(&self) -> &'static str {
        match self {
            TokenError::InvalidRequest(_) => "invalid_request",
            TokenError::UnsupportedGrantType(_) => "unsupported_grant_type",
            TokenError::InvalidGrant(_) => "invalid_grant",
            TokenError::InvalidClient(_) => "invalid_client",
            TokenError::Signing(_) | TokenError::Storage(_) => "server_error",
        }
    }
}

impl IntoResponse for TokenError {
    fn into_response(self) -> Response {
        let (status, description) = match &self {
            TokenError::Signing(_) | TokenError::Storage(_) => {
                tracing::error!("Token endpoint error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            _ => {
                tracing::info!(error = self.error_code(), "Token request rejected: {}", self);
                (StatusCode::BAD_REQUEST, self.to_string())
            }
        };

        (
            status,
            [(header::CACHE_CONTROL, "no-store")],
            Json(ErrorBody {
                error: self.error_code(),
                error_description: description,
            }),
        )
            .into_response()
    }
}
