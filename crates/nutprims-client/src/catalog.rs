//! Server error codes and their descriptions.
//!
//! upsd reports failures as `ERR <CODE> [extra]`. The set of codes is fixed
//! by the protocol; anything else is kept verbatim as
//! [`ServerErrorCode::Unknown`].

use std::fmt;

/// Description used for codes outside the known set.
pub const UNKNOWN_DESCRIPTION: &str = "Unknown error code";

/// An error code reported by upsd.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServerErrorCode {
    AccessDenied,
    UnknownUps,
    VarNotSupported,
    CmdNotSupported,
    InvalidArgument,
    InstcmdFailed,
    SetFailed,
    ReadOnly,
    TooLong,
    FeatureNotSupported,
    FeatureNotConfigured,
    AlreadySslMode,
    DriverNotConnected,
    DataStale,
    AlreadyLoggedIn,
    InvalidPassword,
    AlreadySetPassword,
    InvalidUsername,
    AlreadySetUsername,
    UsernameRequired,
    PasswordRequired,
    UnknownCommand,
    InvalidValue,
    /// A code this client does not recognise, kept as sent.
    Unknown(String),
}

/// Every known code, in protocol documentation order.
pub static KNOWN_CODES: [ServerErrorCode; 23] = [
    ServerErrorCode::AccessDenied,
    ServerErrorCode::UnknownUps,
    ServerErrorCode::VarNotSupported,
    ServerErrorCode::CmdNotSupported,
    ServerErrorCode::InvalidArgument,
    ServerErrorCode::InstcmdFailed,
    ServerErrorCode::SetFailed,
    ServerErrorCode::ReadOnly,
    ServerErrorCode::TooLong,
    ServerErrorCode::FeatureNotSupported,
    ServerErrorCode::FeatureNotConfigured,
    ServerErrorCode::AlreadySslMode,
    ServerErrorCode::DriverNotConnected,
    ServerErrorCode::DataStale,
    ServerErrorCode::AlreadyLoggedIn,
    ServerErrorCode::InvalidPassword,
    ServerErrorCode::AlreadySetPassword,
    ServerErrorCode::InvalidUsername,
    ServerErrorCode::AlreadySetUsername,
    ServerErrorCode::UsernameRequired,
    ServerErrorCode::PasswordRequired,
    ServerErrorCode::UnknownCommand,
    ServerErrorCode::InvalidValue,
];

impl ServerErrorCode {
    /// Look up a code by its exact wire spelling.
    pub fn from_wire(code: &str) -> Self {
        KNOWN_CODES
            .iter()
            .find(|known| known.as_wire() == code)
            .cloned()
            .unwrap_or_else(|| ServerErrorCode::Unknown(code.to_string()))
    }

    /// The code as it appears on the wire.
    pub fn as_wire(&self) -> &str {
        match self {
            ServerErrorCode::AccessDenied => "ACCESS-DENIED",
            ServerErrorCode::UnknownUps => "UNKNOWN-UPS",
            ServerErrorCode::VarNotSupported => "VAR-NOT-SUPPORTED",
            ServerErrorCode::CmdNotSupported => "CMD-NOT-SUPPORTED",
            ServerErrorCode::InvalidArgument => "INVALID-ARGUMENT",
            ServerErrorCode::InstcmdFailed => "INSTCMD-FAILED",
            ServerErrorCode::SetFailed => "SET-FAILED",
            ServerErrorCode::ReadOnly => "READONLY",
            ServerErrorCode::TooLong => "TOO-LONG",
            ServerErrorCode::FeatureNotSupported => "FEATURE-NOT-SUPPORTED",
            ServerErrorCode::FeatureNotConfigured => "FEATURE-NOT-CONFIGURED",
            ServerErrorCode::AlreadySslMode => "ALREADY-SSL-MODE",
            ServerErrorCode::DriverNotConnected => "DRIVER-NOT-CONNECTED",
            ServerErrorCode::DataStale => "DATA-STALE",
            ServerErrorCode::AlreadyLoggedIn => "ALREADY-LOGGED-IN",
            ServerErrorCode::InvalidPassword => "INVALID-PASSWORD",
            ServerErrorCode::AlreadySetPassword => "ALREADY-SET-PASSWORD",
            ServerErrorCode::InvalidUsername => "INVALID-USERNAME",
            ServerErrorCode::AlreadySetUsername => "ALREADY-SET-USERNAME",
            ServerErrorCode::UsernameRequired => "USERNAME-REQUIRED",
            ServerErrorCode::PasswordRequired => "PASSWORD-REQUIRED",
            ServerErrorCode::UnknownCommand => "UNKNOWN-COMMAND",
            ServerErrorCode::InvalidValue => "INVALID-VALUE",
            ServerErrorCode::Unknown(code) => code,
        }
    }

    /// Human-readable explanation of the code.
    pub fn description(&self) -> &'static str {
        match self {
            ServerErrorCode::AccessDenied => {
                "The client's host and/or authentication details (username, password) are not sufficient to execute the requested command"
            }
            ServerErrorCode::UnknownUps => {
                "The UPS specified in the request is not known to upsd; it did not match anything in ups.conf"
            }
            ServerErrorCode::VarNotSupported => {
                "The specified UPS does not support the variable in the request, or the variable is unrecognized in a namespace handled by upsd such as server.*"
            }
            ServerErrorCode::CmdNotSupported => {
                "The specified UPS does not support the instant command in the request"
            }
            ServerErrorCode::InvalidArgument => {
                "The client sent an argument that is not recognized or is otherwise invalid in this context, such as GET with an invalid subcommand"
            }
            ServerErrorCode::InstcmdFailed => {
                "upsd failed to deliver the instant command request to the driver, which typically indicates a dead or broken driver"
            }
            ServerErrorCode::SetFailed => {
                "upsd failed to deliver the set request to the driver"
            }
            ServerErrorCode::ReadOnly => "The requested variable in a SET command is not writable",
            ServerErrorCode::TooLong => "The requested value in a SET command is too long",
            ServerErrorCode::FeatureNotSupported => {
                "This instance of upsd does not support the requested feature (currently only used for STARTTLS)"
            }
            ServerErrorCode::FeatureNotConfigured => {
                "This instance of upsd has not been configured to allow the requested feature (currently only used for STARTTLS)"
            }
            ServerErrorCode::AlreadySslMode => {
                "TLS/SSL mode is already enabled on this connection, so upsd cannot start it again"
            }
            ServerErrorCode::DriverNotConnected => {
                "The driver for the UPS is not connected to upsd; it is not running or ups.conf is misconfigured"
            }
            ServerErrorCode::DataStale => {
                "The driver for the UPS is not providing regular updates or has marked its data as stale; upsd refuses to report variables to avoid false readings"
            }
            ServerErrorCode::AlreadyLoggedIn => {
                "The client already sent LOGIN for a UPS and cannot do it again on this connection"
            }
            ServerErrorCode::InvalidPassword => "The client sent an invalid PASSWORD, perhaps an empty one",
            ServerErrorCode::AlreadySetPassword => {
                "The client already set a PASSWORD and cannot set another"
            }
            ServerErrorCode::InvalidUsername => "The client sent an invalid USERNAME",
            ServerErrorCode::AlreadySetUsername => {
                "The client already set a USERNAME and cannot set another"
            }
            ServerErrorCode::UsernameRequired => {
                "The requested command requires a username for authentication, but none was set"
            }
            ServerErrorCode::PasswordRequired => {
                "The requested command requires a password for authentication, but none was set"
            }
            ServerErrorCode::UnknownCommand => "upsd does not recognize the requested command",
            ServerErrorCode::InvalidValue => {
                "The value specified in the request is not valid, such as an ENUM value outside the allowed list"
            }
            ServerErrorCode::Unknown(_) => UNKNOWN_DESCRIPTION,
        }
    }

    /// Whether this code signals missing credentials or permissions.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ServerErrorCode::AccessDenied
                | ServerErrorCode::InvalidPassword
                | ServerErrorCode::InvalidUsername
                | ServerErrorCode::UsernameRequired
                | ServerErrorCode::PasswordRequired
        )
    }
}

impl fmt::Display for ServerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// An `ERR` response from upsd.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {}", .code.description())]
pub struct ServerError {
    pub code: ServerErrorCode,
}

impl ServerError {
    pub fn new(code: ServerErrorCode) -> Self {
        Self { code }
    }

    /// Build from the code token of an `ERR` line.
    pub fn from_wire(code: &str) -> Self {
        Self::new(ServerErrorCode::from_wire(code))
    }

    pub fn description(&self) -> &'static str {
        self.code.description()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_denied_has_stable_description() {
        let err = ServerError::from_wire("ACCESS-DENIED");
        assert_eq!(err.code, ServerErrorCode::AccessDenied);
        assert!(!err.description().is_empty());
        assert_eq!(
            err.description(),
            ServerError::from_wire("ACCESS-DENIED").description()
        );
    }

    #[test]
    fn unknown_code_maps_to_generic_description() {
        let err = ServerError::from_wire("TOTALLY-NEW");
        assert_eq!(err.code, ServerErrorCode::Unknown("TOTALLY-NEW".to_string()));
        assert_eq!(err.description(), UNKNOWN_DESCRIPTION);
        for known in &KNOWN_CODES {
            assert_ne!(known.description(), UNKNOWN_DESCRIPTION);
        }
    }

    #[test]
    fn lookup_is_exact_match() {
        assert!(matches!(
            ServerErrorCode::from_wire("access-denied"),
            ServerErrorCode::Unknown(_)
        ));
        assert!(matches!(
            ServerErrorCode::from_wire("READONLY "),
            ServerErrorCode::Unknown(_)
        ));
    }

    #[test]
    fn every_known_code_roundtrips_and_is_distinct() {
        let mut descriptions = std::collections::HashSet::new();
        for known in &KNOWN_CODES {
            assert_eq!(&ServerErrorCode::from_wire(known.as_wire()), known);
            assert!(descriptions.insert(known.description()), "{known}");
        }
    }

    #[test]
    fn display_includes_code_and_description() {
        let err = ServerError::new(ServerErrorCode::TooLong);
        assert_eq!(
            err.to_string(),
            "TOO-LONG: The requested value in a SET command is too long"
        );
    }

    #[test]
    fn auth_failures_are_flagged() {
        assert!(ServerErrorCode::AccessDenied.is_auth_failure());
        assert!(ServerErrorCode::PasswordRequired.is_auth_failure());
        assert!(!ServerErrorCode::DataStale.is_auth_failure());
    }
}
