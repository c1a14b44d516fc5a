use nutprims_frame::FrameError;
use nutprims_transport::TransportError;

use crate::catalog::ServerError;

/// Errors that can occur in client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connection could not be established.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Socket read or write failed on an established connection.
    #[error("I/O error: {0}")]
    Io(std::io::Error),

    /// The server's response was truncated or malformed.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The server answered with `ERR <CODE>`.
    #[error("server error: {0}")]
    Server(#[from] ServerError),

    /// Caller input cannot be expressed on the wire.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Coarse classification of a [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Protocol,
    Server,
    InvalidArgument,
}

impl ClientError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Transport(_) | ClientError::Io(_) => ErrorKind::Transport,
            ClientError::Protocol(_) => ErrorKind::Protocol,
            ClientError::Server(_) => ErrorKind::Server,
            ClientError::InvalidArgument(_) => ErrorKind::InvalidArgument,
        }
    }

    /// The server error, if this is one.
    pub fn server_error(&self) -> Option<&ServerError> {
        match self {
            ClientError::Server(err) => Some(err),
            _ => None,
        }
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        ClientError::Protocol(message.into())
    }
}

impl From<FrameError> for ClientError {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::Io(io) => ClientError::Io(io),
            FrameError::EmbeddedNewline => ClientError::InvalidArgument(err.to_string()),
            other => ClientError::Protocol(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
