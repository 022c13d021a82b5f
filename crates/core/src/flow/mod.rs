mod error;
mod functions;
mod traits;
mod types;
mod validation;

pub use error::FlowError;
pub use functions::{
    error_redirect_url, generate_code, is_code_expired, success_redirect_url, CODE_LENGTH,
};
pub use traits::{ClaimsRepository, Result};
pub use types::{AuthorizationCode, PendingClaims};
pub use validation::{
    parse_redirect_uri, validate_authorize_request, AuthorizeErrorCode, AuthorizeRejection,
    ValidAuthorizeRequest, RESPONSE_TYPE_CODE,
};
