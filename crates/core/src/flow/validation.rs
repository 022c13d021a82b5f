use url::Url;

/// The only `response_type` this provider supports.
pub const RESPONSE_TYPE_CODE: &str = "code";

/// Error codes sent back to the relying party's redirect URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizeErrorCode {
    InvalidRequest,
    UnsupportedResponseType,
    ServerError,
}

impl AuthorizeErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::UnsupportedResponseType => "unsupported_response_type",
            Self::ServerError => "server_error",
        }
    }
}

impl std::fmt::Display for AuthorizeErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authorization request fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidAuthorizeRequest {
    pub client_id: String,
    pub redirect_uri: Url,
}

/// Why an authorization request was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizeRejection {
    /// There is no usable redirect target, so the error must be shown locally.
    InvalidRedirectUri(String),
    /// The error is reported to the relying party through its redirect URI.
    Redirect {
        redirect_uri: Url,
        error: AuthorizeErrorCode,
        description: String,
    },
}

/// Parses a redirect URI into an absolute `http`/`https` URL.
///
/// Fragments are rejected because the response parameters travel in the query.
///
/// # Examples
///
/// ```
/// use taramock_core::flow::parse_redirect_uri;
///
/// assert!(parse_redirect_uri(Some("https://rp.example/cb")).is_ok());
/// assert!(parse_redirect_uri(Some("/relative")).is_err());
/// assert!(parse_redirect_uri(None).is_err());
/// ```
pub fn parse_redirect_uri(raw: Option<&str>) -> Result<Url, String> {
    let raw = raw
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "redirect_uri is required".to_string())?;

    let url = Url::parse(raw).map_err(|e| format!("redirect_uri is not a valid URL: {e}"))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!(
            "redirect_uri scheme '{}' is not supported",
            url.scheme()
        ));
    }

    if url.fragment().is_some() {
        return Err("redirect_uri must not contain a fragment".to_string());
    }

    Ok(url)
}

/// Validates the parameters every authorization request must carry.
///
/// The redirect URI is checked first: without it no error can be redirected.
pub fn validate_authorize_request(
    client_id: Option<&str>,
    redirect_uri: Option<&str>,
    response_type: Option<&str>,
) -> Result<ValidAuthorizeRequest, AuthorizeRejection> {
    let redirect_uri =
        parse_redirect_uri(redirect_uri).map_err(AuthorizeRejection::InvalidRedirectUri)?;

    let reject = |error: AuthorizeErrorCode, description: &str| AuthorizeRejection::Redirect {
        redirect_uri: redirect_uri.clone(),
        error,
        description: description.to_string(),
    };

    let client_id = match client_id.filter(|s| !s.is_empty()) {
        Some(client_id) => client_id.to_string(),
        None => {
            return Err(reject(
                AuthorizeErrorCode::InvalidRequest,
                "client_id is required",
            ))
        }
    };

    match response_type {
        None | Some("") => {
            return Err(reject(
                AuthorizeErrorCode::InvalidRequest,
                "response_type is required",
            ))
        }
        Some(RESPONSE_TYPE_CODE) => {}
        Some(_) => {
            return Err(reject(
                AuthorizeErrorCode::UnsupportedResponseType,
                "only response_type=code is supported",
            ))
        }
    }

    Ok(ValidAuthorizeRequest {
        client_id,
        redirect_uri,
    })
}
