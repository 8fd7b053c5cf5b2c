use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {service} timed out")]
    Timeout { service: &'static str },
    #[error("request to {service} failed: {message}")]
    Transport { service: &'static str, message: String },
    #[error("{service} has no such resource")]
    NotFound { service: &'static str },
    #[error("{service} responded with status {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("could not decode {service} response: {message}")]
    Decode { service: &'static str, message: String },
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }

    pub fn service(&self) -> &'static str {
        match self {
            ClientError::Timeout { service }
            | ClientError::Transport { service, .. }
            | ClientError::NotFound { service }
            | ClientError::Status { service, .. }
            | ClientError::Decode { service, .. } => service,
        }
    }
}
