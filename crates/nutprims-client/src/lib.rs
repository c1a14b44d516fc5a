//! Session, device and variable client for the Network UPS Tools protocol.
//!
//! This is the layer most callers want. Connect to upsd, authenticate,
//! enumerate devices and read their variables as typed values, run instant
//! commands and change writeable variables.
//!
//! ```no_run
//! use nutprims_client::{connect, VariableValue};
//!
//! let mut session = connect("localhost", 3493)?;
//! for device in session.list_devices()? {
//!     if let Some(VariableValue::Integer(charge)) =
//!         device.variable("battery.charge").map(|v| &v.value)
//!     {
//!         println!("{}: {charge}%", device.name);
//!     }
//! }
//! session.disconnect()?;
//! # Ok::<(), nutprims_client::ClientError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod connector;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod session;
pub mod variable;
pub mod wire;

pub use catalog::{ServerError, ServerErrorCode, KNOWN_CODES, UNKNOWN_DESCRIPTION};
pub use config::{ConnectConfig, DEFAULT_HOST};
pub use connector::{connect, connect_with_config};
pub use device::{Command, Device, FSD_SET};
pub use error::{ClientError, ErrorKind, Result};
pub use nutprims_transport::{CancelFlag, DEFAULT_PORT};
pub use session::{DeviceSummary, Session, LOGOUT_REPLIES};
pub use variable::{
    coerce_value, parse_type_report, Coerced, TypeReport, Variable, VariableType, VariableValue,
};
