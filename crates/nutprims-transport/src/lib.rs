//! TCP transport for the Network UPS Tools protocol.
//!
//! This is the lowest layer of nutprims. It resolves and dials a upsd
//! endpoint, honouring an optional connect deadline and a cancellation
//! flag, and hands back a blocking [`NutStream`]. Everything else builds on
//! top of it.

pub mod error;
pub mod stream;
pub mod tcp;

pub use error::{Result, TransportError};
pub use stream::NutStream;
pub use tcp::{connect, connect_with, CancelFlag, DEFAULT_PORT};
