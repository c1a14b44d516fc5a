//! Newline-delimited request/response framing for the upsd protocol.
//!
//! Every command is one ASCII line. Responses are either a single line or,
//! for `LIST` commands, a run of lines closed by an `END <command>` echo.
//! This crate owns that discipline so that callers always deal in complete
//! lines and complete responses:
//! - [`LineWriter`] appends the newline and writes the whole command
//! - [`LineReader`] buffers partial reads and returns whole responses
//! - [`Framing`] decides, per command, where a response ends

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_line, encode_line, Framing, LineConfig, DEFAULT_MAX_LINE, ERROR_PREFIX, LIST_PREFIX,
    OK_LINE,
};
pub use error::{FrameError, Result};
pub use reader::LineReader;
pub use writer::LineWriter;
