use crate::ErrorMessages;
use payloads::ClientError;

/// Why a page failed to load. `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// HTTP 401.
    #[error("{0}")]
    Unauthorized(String),
    /// HTTP 403.
    #[error("{0}")]
    Forbidden(String),
    /// Any other non-2xx response.
    #[error("{message}")]
    Server { status: u16, message: String },
    /// The request never got a response.
    #[error("{0}")]
    Network(String),
    /// A 2xx response whose body was not a page.
    #[error("{0}")]
    Malformed(String),
}

impl LoadError {
    pub fn from_client(error: ClientError, messages: &ErrorMessages) -> Self {
        match error {
            ClientError::APIError(status, _) if status.as_u16() == 401 => {
                Self::Unauthorized(messages.unauthorized.clone())
            }
            ClientError::APIError(status, _) if status.as_u16() == 403 => {
                Self::Forbidden(messages.forbidden.clone())
            }
            ClientError::APIError(status, _) => Self::Server {
                status: status.as_u16(),
                message: error.to_string(),
            },
            ClientError::Network(_) => Self::Network(messages.network.clone()),
            ClientError::Decode(_) => Self::Malformed(error.to_string()),
        }
    }

    /// The HTTP status behind this error, if there was a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::Server { status, .. } => Some(*status),
            Self::Network(_) | Self::Malformed(_) => None,
        }
    }
}
