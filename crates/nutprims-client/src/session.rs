use std::io::{Read, Write};

use nutprims_frame::{Framing, LineReader, LineWriter, OK_LINE};
use nutprims_transport::NutStream;
use serde::Serialize;
use tracing::{debug, info};

use crate::device::Device;
use crate::dispatch::{self, check_response, list_items, redact};
use crate::error::{ClientError, Result};
use crate::wire::split_name_value;

/// Replies to `LOGOUT` that count as a clean goodbye.
pub const LOGOUT_REPLIES: [&str; 2] = ["OK Goodbye", "Goodbye..."];

/// A device as listed by `LIST UPS`, without any per-device queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceSummary {
    pub name: String,
    pub description: String,
}

/// An open upsd session.
///
/// Strictly one command in flight: every operation takes `&mut self`, sends
/// one line and reads its complete response before returning.
pub struct Session<R = NutStream, W = NutStream> {
    reader: LineReader<R>,
    writer: LineWriter<W>,
    version: String,
    protocol_version: String,
}

impl<R: Read, W: Write> Session<R, W> {
    /// Build a session over connected halves and read the server versions.
    pub fn from_parts(reader: LineReader<R>, writer: LineWriter<W>) -> Result<Self> {
        let mut session = Self {
            reader,
            writer,
            version: String::new(),
            protocol_version: String::new(),
        };
        session.version = session.server_version()?;
        session.protocol_version = session.network_protocol_version()?;
        info!(
            version = %session.version,
            protocol_version = %session.protocol_version,
            "upsd session established"
        );
        Ok(session)
    }

    /// Send one command and return its checked response lines.
    ///
    /// The response is never empty. An `ERR` reply fails with
    /// [`ClientError::Server`] and nothing of the response is returned.
    pub fn dispatch(&mut self, command: &str) -> Result<Vec<String>> {
        let framing = Framing::for_command(command);
        debug!(command = %redact(command), multi_line = framing.multi_line, "sending command");

        self.writer.send(command)?;
        let response = self.reader.read_response(&framing)?;
        debug!(lines = response.len(), "received response");

        check_response(command, response).inspect_err(|err| {
            if let ClientError::Server(server) = err {
                debug!(code = %server.code, command = %redact(command), "server returned error");
            }
        })
    }

    /// Send a command and return only the first response line.
    pub(crate) fn dispatch_line(&mut self, command: &str) -> Result<String> {
        let mut response = self.dispatch(command)?;
        Ok(response.swap_remove(0))
    }

    /// Application version advertised by the server at connect time.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Network protocol version advertised by the server at connect time.
    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    /// Ask the server for its application version (`VER`).
    pub fn server_version(&mut self) -> Result<String> {
        self.dispatch_line("VER")
    }

    /// Ask the server for its network protocol version (`NETVER`).
    pub fn network_protocol_version(&mut self) -> Result<String> {
        self.dispatch_line("NETVER")
    }

    /// The list of commands the server understands (`HELP`).
    pub fn help(&mut self) -> Result<String> {
        self.dispatch_line("HELP")
    }

    /// Send `USERNAME` then `PASSWORD`.
    ///
    /// Returns true only if both were acknowledged with `OK`. An `ERR` reply
    /// to either fails instead.
    pub fn authenticate(&mut self, username: &str, password: &str) -> Result<bool> {
        let user_reply = self.dispatch_line(&dispatch::username(username))?;
        let pass_reply = self.dispatch_line(&dispatch::password(password))?;
        let accepted = user_reply == OK_LINE && pass_reply == OK_LINE;
        debug!(username, accepted, "authentication finished");
        Ok(accepted)
    }

    /// Names and descriptions from `LIST UPS`, with no further round trips.
    pub fn device_names(&mut self) -> Result<Vec<DeviceSummary>> {
        let response = self.dispatch(&dispatch::list_ups())?;
        list_items(&response, "UPS ")
            .map(|item| {
                let (name, description) = split_name_value(item)?;
                Ok(DeviceSummary {
                    name: name.to_string(),
                    description,
                })
            })
            .collect()
    }

    /// Every device with all fields populated.
    ///
    /// Fails as a whole if any device fails to build.
    pub fn list_devices(&mut self) -> Result<Vec<Device>> {
        let names = self.device_names()?;
        names
            .into_iter()
            .map(|summary| Device::fetch(self, &summary.name))
            .collect()
    }

    /// One fully populated device.
    pub fn device(&mut self, name: &str) -> Result<Device> {
        Device::fetch(self, name)
    }

    /// Log out gracefully and close the session.
    ///
    /// Returns true if the server said goodbye in one of the accepted forms.
    pub fn disconnect(mut self) -> Result<bool> {
        let reply = self.dispatch_line("LOGOUT")?;
        let clean = LOGOUT_REPLIES.contains(&reply.as_str());
        debug!(reply = %reply, clean, "logged out");
        Ok(clean)
    }

    /// Split the session back into its reader and writer.
    pub fn into_parts(self) -> (LineReader<R>, LineWriter<W>) {
        (self.reader, self.writer)
    }
}

impl<R, W> std::fmt::Debug for Session<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("version", &self.version)
            .field("protocol_version", &self.protocol_version)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::io::Cursor;

    use super::*;

    pub const VERSION_LINE: &str = "Network UPS Tools upsd 2.8.0 - http://www.networkupstools.org/";
    pub const NETVER_LINE: &str = "1.3";

    pub type ScriptedSession = Session<Cursor<Vec<u8>>, Vec<u8>>;

    /// A session whose server replies are `replies`, after the version handshake.
    pub fn scripted(replies: &[&str]) -> ScriptedSession {
        let mut wire = format!("{VERSION_LINE}\n{NETVER_LINE}\n");
        for reply in replies {
            wire.push_str(reply);
            wire.push('\n');
        }
        Session::from_parts(
            LineReader::new(Cursor::new(wire.into_bytes())),
            LineWriter::new(Vec::new()),
        )
        .expect("scripted handshake should succeed")
    }

    /// Commands written by the session, excluding the version handshake.
    pub fn sent(session: ScriptedSession) -> Vec<String> {
        let (_, writer) = session.into_parts();
        String::from_utf8(writer.into_inner())
            .expect("commands are utf-8")
            .lines()
            .skip(2)
            .map(str::to_string)
            .collect()
    }
}
