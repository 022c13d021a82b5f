//! HTTP handlers for the OIDC routes.

use axum::{
    extract::{rejection::FormRejection, Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use taramock_core::flow::{
    generate_code, success_redirect_url, validate_authorize_request, AuthorizationCode,
    AuthorizeErrorCode, FlowError, PendingClaims, ValidAuthorizeRequest, RESPONSE_TYPE_CODE,
};
use taramock_core::identity::Identity;
use url::Url;

use crate::discovery::ProviderMetadata;
use crate::error::{found, AuthorizeError, TokenError};
use crate::extractors::BasicClientId;
use crate::jwks::Jwks;
use crate::templates::{self, SelectionForm};
use crate::OidcState;

/// How many fresh codes to draw before giving up on collisions.
const MAX_CODE_ATTEMPTS: usize = 3;

/// `prompt` value that shows the identity-selection page.
const PROMPT_SELECT_ACCOUNT: &str = "select_account";

const GRANT_TYPE_AUTHORIZATION_CODE: &str = "authorization_code";

/// Query parameters of an authorization request.
#[derive(Debug, Deserialize, Default)]
pub struct AuthorizeQuery {
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub response_type: Option<String>,
    pub state: Option<String>,
    pub nonce: Option<String>,
    pub scope: Option<String>,
    pub govsso_login_challenge: Option<String>,
    /// Subject of the catalog identity to authenticate as.
    pub login_hint: Option<String>,
    pub prompt: Option<String>,
}

/// Query parameters of the login-completion hop.
#[derive(Debug, Deserialize, Default)]
pub struct BackQuery {
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub state: Option<String>,
    pub nonce: Option<String>,
    pub govsso_login_challenge: Option<String>,
    pub sub: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
}

/// Form body of a token request.
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub grant_type: Option<String>,
    pub code: Option<String>,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
}

/// Successful token response.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub id_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Values echoed unchanged from the authorization request.
struct EchoedValues {
    state: Option<String>,
    nonce: Option<String>,
    govsso_login_challenge: Option<String>,
}

/// Creates the router with all OIDC provider routes.
///
/// Routes:
/// - `GET /.well-known/openid-configuration` - Provider metadata
/// - `GET /oidc/.well-known/openid-configuration` - Provider metadata
/// - `GET /oidc/authorize` - Authorization request, redirects back with a code
/// - `GET /back` - Login completion hop, redirects back with a code
/// - `POST /oidc/token` - Exchange a code for a signed ID token
/// - `GET /oidc/jwks` - Public key set for ID token verification
pub fn oidc_routes() -> Router<OidcState> {
    Router::new()
        .route("/.well-known/openid-configuration", get(discovery))
        .route("/oidc/.well-known/openid-configuration", get(discovery))
        .route("/oidc/authorize", get(authorize))
        .route("/back", get(back))
        .route("/oidc/token", post(token))
        .route("/oidc/jwks", get(jwks))
}

async fn discovery(State(state): State<OidcState>) -> Json<ProviderMetadata> {
    Json(ProviderMetadata::new(&state.config))
}

async fn jwks(State(state): State<OidcState>) -> Json<Jwks> {
    Json(state.signer.jwks())
}

async fn authorize(
    State(state): State<OidcState>,
    Query(query): Query<AuthorizeQuery>,
) -> Result<Response, AuthorizeError> {
    let request = validate_authorize_request(
        query.client_id.as_deref(),
        query.redirect_uri.as_deref(),
        query.response_type.as_deref(),
    )
    .map_err(|rejection| AuthorizeError::from_rejection(rejection, query.state.clone()))?;

    tracing::debug!(
        client_id = %request.client_id,
        scope = ?query.scope,
        "Authorization request"
    );

    if query.prompt.as_deref() == Some(PROMPT_SELECT_ACCOUNT) {
        let form = SelectionForm {
            client_id: &request.client_id,
            redirect_uri: request.redirect_uri.as_str(),
            state: query.state.as_deref(),
            nonce: query.nonce.as_deref(),
            govsso_login_challenge: query.govsso_login_challenge.as_deref(),
        };
        let page = templates::select_identity_page(&form, state.identities.identities());
        return Ok(Html(page).into_response());
    }

    let identity = match query.login_hint.as_deref().filter(|s| !s.is_empty()) {
        Some(sub) => state.identities.find(sub).cloned().ok_or_else(|| {
            redirect_error(
                &request.redirect_uri,
                AuthorizeErrorCode::InvalidRequest,
                format!("unknown login_hint: {sub}"),
                query.state.clone(),
            )
        })?,
        None => state.identities.default_identity().clone(),
    };

    let echoed = EchoedValues {
        state: query.state,
        nonce: query.nonce,
        govsso_login_challenge: query.govsso_login_challenge,
    };

    issue_code(&state, request, identity, echoed).await
}

async fn back(
    State(state): State<OidcState>,
    Query(query): Query<BackQuery>,
) -> Result<Response, AuthorizeError> {
    let request = validate_authorize_request(
        query.client_id.as_deref(),
        query.redirect_uri.as_deref(),
        Some(RESPONSE_TYPE_CODE),
    )
    .map_err(|rejection| AuthorizeError::from_rejection(rejection, query.state.clone()))?;

    let Some(sub) = query.sub.filter(|s| !s.is_empty()) else {
        return Err(redirect_error(
            &request.redirect_uri,
            AuthorizeErrorCode::InvalidRequest,
            "sub is required".to_string(),
            query.state,
        ));
    };

    // A catalog subject without explicit names takes the catalog's names.
    let identity = match state.identities.find(&sub) {
        Some(known) if query.given_name.is_none() && query.family_name.is_none() => known.clone(),
        _ => Identity {
            sub,
            given_name: query.given_name.unwrap_or_default(),
            family_name: query.family_name.unwrap_or_default(),
        },
    };

    let echoed = EchoedValues {
        state: query.state,
        nonce: query.nonce,
        govsso_login_challenge: query.govsso_login_challenge,
    };

    issue_code(&state, request, identity, echoed).await
}

/// Mints a code for the identity, stores the pending claims and redirects
/// back to the client.
async fn issue_code(
    state: &OidcState,
    request: ValidAuthorizeRequest,
    identity: Identity,
    echoed: EchoedValues,
) -> Result<Response, AuthorizeError> {
    let claims = PendingClaims {
        client_id: request.client_id,
        subject: identity.sub,
        family_name: identity.family_name,
        given_name: identity.given_name,
        state: echoed.state,
        nonce: echoed.nonce,
        govsso_login_challenge: echoed.govsso_login_challenge,
        redirect_uri: request.redirect_uri.to_string(),
        issued_at: Utc::now(),
    };

    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = generate_code();
        match state.claims.put(&code, claims.clone()).await {
            Ok(()) => {
                tracing::info!(
                    client_id = %claims.client_id,
                    sub = %claims.subject,
                    "Issued authorization code"
                );
                let location =
                    success_redirect_url(&request.redirect_uri, &code, claims.state.as_deref());
                return Ok(found(&location));
            }
            Err(FlowError::CodeCollision) => continue,
            Err(e) => {
                tracing::error!(error = %e, "Failed to store pending claims");
                return Err(server_error(&request.redirect_uri, claims.state));
            }
        }
    }

    tracing::error!(
        attempts = MAX_CODE_ATTEMPTS,
        "Could not draw an unused authorization code"
    );
    Err(server_error(&request.redirect_uri, claims.state))
}

fn redirect_error(
    redirect_uri: &Url,
    error: AuthorizeErrorCode,
    description: String,
    state: Option<String>,
) -> AuthorizeError {
    AuthorizeError::Redirect {
        redirect_uri: redirect_uri.clone(),
        error,
        description,
        state,
    }
}

fn server_error(redirect_uri: &Url, state: Option<String>) -> AuthorizeError {
    redirect_error(
        redirect_uri,
        AuthorizeErrorCode::ServerError,
        "authorization code could not be issued".to_string(),
        state,
    )
}

async fn token(
    State(state): State<OidcState>,
    BasicClientId(basic_client_id): BasicClientId,
    form: Result<Form<TokenForm>, FormRejection>,
) -> Result<Response, TokenError> {
    let Form(form) =
        form.map_err(|rejection| TokenError::InvalidRequest(rejection.body_text()))?;

    match form.grant_type.as_deref() {
        Some(GRANT_TYPE_AUTHORIZATION_CODE) => {}
        None | Some("") => {
            return Err(TokenError::InvalidRequest(
                "grant_type is required".to_string(),
            ))
        }
        Some(other) => return Err(TokenError::UnsupportedGrantType(other.to_string())),
    }

    let code = form
        .code
        .filter(|s| !s.is_empty())
        .map(AuthorizationCode::new)
        .ok_or_else(|| TokenError::InvalidRequest("code is required".to_string()))?;

    // Taking the claims consumes the code, whatever happens next.
    let pending = state.claims.take(&code).await?.ok_or_else(|| {
        TokenError::InvalidGrant(
            "authorization code is invalid, expired or already used".to_string(),
        )
    })?;

    let client_id = form.client_id.filter(|s| !s.is_empty()).or(basic_client_id);
    if client_id.as_deref() != Some(pending.client_id.as_str()) {
        tracing::warn!(
            expected = %pending.client_id,
            presented = ?client_id,
            "Token request client does not match authorization request"
        );
        return Err(TokenError::InvalidClient(
            "client_id does not match the authorization request".to_string(),
        ));
    }

    if let Some(redirect_uri) = form.redirect_uri.as_deref().filter(|s| !s.is_empty()) {
        let matches = Url::parse(redirect_uri)
            .map(|url| url.as_str() == pending.redirect_uri)
            .unwrap_or(false);
        if !matches {
            return Err(TokenError::InvalidGrant(
                "redirect_uri does not match the authorization request".to_string(),
            ));
        }
    }

    let issued = state.signer.issue(&pending)?;

    tracing::info!(
        client_id = %pending.client_id,
        sub = %pending.subject,
        "Issued ID token"
    );

    Ok((
        [
            (header::CACHE_CONTROL, "no-store"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(TokenResponse {
            id_token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
        }),
    )
        .into_response())
}
