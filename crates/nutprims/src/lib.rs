//! Network UPS Tools protocol client.
//!
//! nutprims talks to upsd over its line-oriented TCP protocol: authenticate,
//! enumerate UPS devices, read their status variables as typed values, run
//! instant commands and change writeable variables.
//!
//! # Crate Structure
//!
//! - [`transport`] — TCP connection to upsd with connect deadline and cancellation
//! - [`frame`] — Line framing: single-line and `LIST ... END` responses
//! - [`client`] — Sessions, devices, variables and the server error catalog

/// Re-export transport types.
pub mod transport {
    pub use nutprims_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use nutprims_frame::*;
}

/// Re-export client types.
pub mod client {
    pub use nutprims_client::*;
}

pub use nutprims_client::{
    connect, connect_with_config, ClientError, Command, ConnectConfig, Device, Session, Variable,
    VariableType, VariableValue,
};
