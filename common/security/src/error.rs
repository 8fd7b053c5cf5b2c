use common_http_errors::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecurityError {
    #[error("missing identity header '{0}'")]    MissingIdentity(&'static str),
    #[error("invalid identity header '{0}'")]    InvalidHeader(&'static str),
}

impl From<SecurityError> for ApiError {
    fn from(e: SecurityError) -> Self {
        match e {
            SecurityError::MissingIdentity(_) => ApiError::Unauthorized { code: "missing_identity", message: Some(e.to_string()) },
            SecurityError::InvalidHeader(_) => ApiError::BadRequest { code: "invalid_identity", message: Some(e.to_string()) },
        }
    }
}
