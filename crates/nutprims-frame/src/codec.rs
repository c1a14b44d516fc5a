use bytes::{BufMut, BytesMut};

use crate::error::{FrameError, Result};

/// Acknowledgement line that terminates authentication, SET and
/// introspection responses.
pub const OK_LINE: &str = "OK";

/// Prefix of every server error response.
pub const ERROR_PREFIX: &str = "ERR ";

/// Prefix of the commands that produce multi-line responses.
pub const LIST_PREFIX: &str = "LIST ";

/// Default maximum length of a single response line: 64 KiB.
pub const DEFAULT_MAX_LINE: usize = 64 * 1024;

const OK_TERMINATED: [&str; 6] = ["USERNAME ", "PASSWORD ", "SET ", "HELP", "VER", "NETVER"];

/// How the response to one command is delimited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framing {
    /// Line that ends a multi-line response, compared without its newline.
    pub terminator: String,
    /// Keep reading past the first line until `terminator` arrives.
    pub multi_line: bool,
}

impl Framing {
    /// Select the framing for a command.
    ///
    /// `LIST ...` commands are multi-line and end at an `END <command>` echo.
    /// Authentication, SET and introspection commands end at a bare `OK`.
    /// Everything else is answered with a single line.
    pub fn for_command(command: &str) -> Self {
        let terminator = if OK_TERMINATED
            .iter()
            .any(|prefix| command.starts_with(prefix))
        {
            OK_LINE.to_string()
        } else {
            format!("END {command}")
        };

        Self {
            terminator,
            multi_line: command.starts_with(LIST_PREFIX),
        }
    }

    /// A framing that returns after the first line.
    pub fn single_line() -> Self {
        Self {
            terminator: OK_LINE.to_string(),
            multi_line: false,
        }
    }
}

/// Encode a command into its wire form (`command` + `\n`).
pub fn encode_line(command: &str, dst: &mut BytesMut) -> Result<()> {
    if command.contains(['\n', '\r']) {
        return Err(FrameError::EmbeddedNewline);
    }
    dst.reserve(command.len() + 1);
    dst.put_slice(command.as_bytes());
    dst.put_u8(b'\n');
    Ok(())
}

/// Decode one line from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete line yet.
/// On success, consumes the line and its `\n` from the buffer; a trailing
/// `\r` is stripped as well.
pub fn decode_line(src: &mut BytesMut, max_line: usize) -> Result<Option<String>> {
    let Some(pos) = src.iter().position(|b| *b == b'\n') else {
        if src.len() > max_line {
            return Err(FrameError::LineTooLong {
                size: src.len(),
                max: max_line,
            });
        }
        return Ok(None); // Need more data
    };

    if pos > max_line {
        return Err(FrameError::LineTooLong {
            size: pos,
            max: max_line,
        });
    }

    let raw = src.split_to(pos + 1);
    let mut line = &raw[..pos];
    if let Some(stripped) = line.strip_suffix(b"\r") {
        line = stripped;
    }

    std::str::from_utf8(line)
        .map(|s| Some(s.to_string()))
        .map_err(|_| FrameError::InvalidUtf8)
}

/// Configuration for line reading and writing.
#[derive(Debug, Clone)]
pub struct LineConfig {
    /// Maximum length of a single line in bytes. Default: 64 KiB.
    pub max_line_length: usize,
    /// Read timeout for blocking operations.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_commands_are_multi_line() {
        let framing = Framing::for_command("LIST VAR ups1");
        assert!(framing.multi_line);
        assert_eq!(framing.terminator, "END LIST VAR ups1");
    }

    #[test]
    fn test_ok_terminated_commands() {
        for cmd in [
            "USERNAME monuser",
            "PASSWORD secret",
            "SET VAR ups1 ups.delay.shutdown \"30\"",
            "HELP",
            "VER",
            "NETVER",
        ] {
            let framing = Framing::for_command(cmd);
            assert_eq!(framing.terminator, OK_LINE, "{cmd}");
            assert!(!framing.multi_line, "{cmd}");
        }
    }

    #[test]
    fn test_other_commands_are_single_line() {
        for cmd in ["GET UPSDESC ups1", "INSTCMD ups1 beeper.off", "FSD ups1", "LOGOUT"] {
            assert!(!Framing::for_command(cmd).multi_line, "{cmd}");
        }
    }

    #[test]
    fn test_encode_appends_newline() {
        let mut buf = BytesMut::new();
        encode_line("LIST UPS", &mut buf).unwrap();
        assert_eq!(buf.as_ref(), b"LIST UPS\n");
    }

    #[test]
    fn test_encode_rejects_embedded_newline() {
        let mut buf = BytesMut::new();
        let result = encode_line("SET VAR ups1 x \"a\nLOGOUT\"", &mut buf);
        assert!(matches!(result, Err(FrameError::EmbeddedNewline)));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_incomplete_line() {
        let mut buf = BytesMut::from(&b"UPS ups1"[..]);
        assert!(decode_line(&mut buf, DEFAULT_MAX_LINE).unwrap().is_none());
        assert_eq!(buf.len(), 8);
    }

    #[test]
    fn test_decode_multiple_lines() {
        let mut buf = BytesMut::from(&b"BEGIN LIST UPS\r\nUPS ups1 \"desc\"\n\nEND"[..]);

        let l1 = decode_line(&mut buf, DEFAULT_MAX_LINE).unwrap().unwrap();
        let l2 = decode_line(&mut buf, DEFAULT_MAX_LINE).unwrap().unwrap();
        let l3 = decode_line(&mut buf, DEFAULT_MAX_LINE).unwrap().unwrap();

        assert_eq!(l1, "BEGIN LIST UPS");
        assert_eq!(l2, "UPS ups1 \"desc\"");
        assert_eq!(l3, "");
        assert_eq!(buf.as_ref(), b"END");
    }

    #[test]
    fn test_decode_line_too_long() {
        let mut buf = BytesMut::from(&b"0123456789\n"[..]);
        let result = decode_line(&mut buf, 4);
        assert!(matches!(result, Err(FrameError::LineTooLong { size: 10, max: 4 })));

        let mut unterminated = BytesMut::from(&b"0123456789"[..]);
        let result = decode_line(&mut unterminated, 4);
        assert!(matches!(result, Err(FrameError::LineTooLong { .. })));
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let mut buf = BytesMut::from(&[0xFF, 0xFE, b'\n'][..]);
        let result = decode_line(&mut buf, DEFAULT_MAX_LINE);
        assert!(matches!(result, Err(FrameError::InvalidUtf8)));
    }
}
