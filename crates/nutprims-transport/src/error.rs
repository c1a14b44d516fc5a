use std::time::Duration;

/// Errors that can occur while establishing or using a upsd connection.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The host/port pair could not be resolved to a socket address.
    #[error("failed to resolve {address}: {source}")]
    Resolve {
        address: String,
        source: std::io::Error,
    },

    /// Every resolved address refused or failed the connection.
    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        source: std::io::Error,
    },

    /// The connect deadline elapsed before a connection was established.
    #[error("connect to {address} timed out after {timeout:?}")]
    Timeout { address: String, timeout: Duration },

    /// The caller cancelled connection establishment.
    #[error("connect to {address} cancelled")]
    Cancelled { address: String },

    /// An I/O error occurred on the transport stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
