//! Command formatting and response checking.
//!
//! The I/O half of dispatching lives on [`crate::Session::dispatch`]; the
//! functions here are the pure parts it is built from.

use std::borrow::Cow;

use nutprims_frame::ERROR_PREFIX;

use crate::catalog::ServerError;
use crate::error::{ClientError, Result};
use crate::wire::quote;

/// Fail with the server's error if the first line is an `ERR` response.
///
/// On success the response is returned unchanged and is never empty.
pub fn check_response(command: &str, response: Vec<String>) -> Result<Vec<String>> {
    let Some(first) = response.first() else {
        return Err(ClientError::protocol(format!(
            "empty response to '{}'",
            redact(command)
        )));
    };

    if let Some(rest) = first.strip_prefix(ERROR_PREFIX) {
        let code = rest.split_whitespace().next().ok_or_else(|| {
            ClientError::protocol(format!("malformed error response '{first}'"))
        })?;
        return Err(ServerError::from_wire(code).into());
    }

    Ok(response)
}

/// Hide the argument of `PASSWORD` commands for logging.
pub fn redact(command: &str) -> Cow<'_, str> {
    if command.starts_with("PASSWORD ") {
        Cow::Borrowed("PASSWORD <redacted>")
    } else {
        Cow::Borrowed(command)
    }
}

/// Body lines of a `LIST` response that carry `prefix`, with it removed.
///
/// The `BEGIN`/`END` framing lines never carry the item prefix, so the
/// result holds exactly the listed items.
pub fn list_items<'a>(response: &'a [String], prefix: &'a str) -> impl Iterator<Item = &'a str> {
    response
        .iter()
        .filter_map(move |line| line.strip_prefix(prefix))
}

pub fn list_ups() -> String {
    "LIST UPS".to_string()
}

pub fn list_var(device: &str) -> String {
    format!("LIST VAR {device}")
}

pub fn list_cmd(device: &str) -> String {
    format!("LIST CMD {device}")
}

pub fn list_client(device: &str) -> String {
    format!("LIST CLIENT {device}")
}

pub fn get_upsdesc(device: &str) -> String {
    format!("GET UPSDESC {device}")
}

pub fn get_numlogins(device: &str) -> String {
    format!("GET NUMLOGINS {device}")
}

pub fn get_desc(device: &str, variable: &str) -> String {
    format!("GET DESC {device} {variable}")
}

pub fn get_type(device: &str, variable: &str) -> String {
    format!("GET TYPE {device} {variable}")
}

pub fn get_cmddesc(device: &str, command: &str) -> String {
    format!("GET CMDDESC {device} {command}")
}

pub fn set_var(device: &str, variable: &str, value: &str) -> String {
    format!("SET VAR {device} {variable} {}", quote(value))
}

pub fn instcmd(device: &str, command: &str) -> String {
    format!("INSTCMD {device} {command}")
}

pub fn master(device: &str) -> String {
    format!("MASTER {device}")
}

pub fn fsd(device: &str) -> String {
    format!("FSD {device}")
}

pub fn username(user: &str) -> String {
    format!("USERNAME {user}")
}

pub fn password(pass: &str) -> String {
    format!("PASSWORD {pass}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ServerErrorCode;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn passes_through_normal_response() {
        let resp = check_response("GET NUMLOGINS ups1", lines(&["NUMLOGINS ups1 1"])).unwrap();
        assert_eq!(resp, vec!["NUMLOGINS ups1 1"]);
    }

    #[test]
    fn maps_error_line_to_server_error() {
        let err = check_response("LIST VAR nope", lines(&["ERR UNKNOWN-UPS"])).unwrap_err();
        let server = err.server_error().expect("should be a server error");
        assert_eq!(server.code, ServerErrorCode::UnknownUps);
    }

    #[test]
    fn error_code_ignores_trailing_detail() {
        let err = check_response("SET VAR ups1 x \"y\"", lines(&["ERR INVALID-VALUE extra info"]))
            .unwrap_err();
        assert_eq!(
            err.server_error().map(|e| e.code.clone()),
            Some(ServerErrorCode::InvalidValue)
        );
    }

    #[test]
    fn unknown_error_code_is_kept() {
        let err = check_response("VER", lines(&["ERR SOMETHING-NEW"])).unwrap_err();
        assert_eq!(
            err.server_error().map(|e| e.code.clone()),
            Some(ServerErrorCode::Unknown("SOMETHING-NEW".to_string()))
        );
    }

    #[test]
    fn error_without_code_is_protocol_error() {
        let err = check_response("VER", lines(&["ERR "])).unwrap_err();
        assert!(matches!(err, ClientError::Protocol(_)));
    }

    #[test]
    fn empty_response_is_protocol_error() {
        let err = check_response("PASSWORD secret", Vec::new()).unwrap_err();
        assert!(matches!(err, ClientError::Protocol(_)));
        assert!(!err.to_string().contains("secret"));
    }

    #[test]
    fn only_first_line_is_inspected() {
        let resp = check_response(
            "LIST CLIENT ups1",
            lines(&["BEGIN LIST CLIENT ups1", "ERR lookalike", "END LIST CLIENT ups1"]),
        )
        .unwrap();
        assert_eq!(resp.len(), 3);
    }

    #[test]
    fn redacts_passwords_only() {
        assert_eq!(redact("PASSWORD hunter2"), "PASSWORD <redacted>");
        assert_eq!(redact("USERNAME admin"), "USERNAME admin");
    }

    #[test]
    fn list_items_skip_framing_lines() {
        let resp = lines(&[
            "BEGIN LIST CMD ups1",
            "CMD ups1 beeper.off",
            "CMD ups1 test.battery.start",
            "END LIST CMD ups1",
        ]);
        let items: Vec<&str> = list_items(&resp, "CMD ups1 ").collect();
        assert_eq!(items, vec!["beeper.off", "test.battery.start"]);
    }

    #[test]
    fn set_var_quotes_value() {
        assert_eq!(
            set_var("ups1", "ups.id", "rack \"B\""),
            r#"SET VAR ups1 ups.id "rack \"B\"""#
        );
    }
}
