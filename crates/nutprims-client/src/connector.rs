use nutprims_frame::{LineReader, LineWriter};
use nutprims_transport::CancelFlag;
use tracing::debug;

use crate::config::ConnectConfig;
use crate::error::Result;
use crate::session::Session;

/// Connect to upsd at `host:port` and read its versions.
pub fn connect(host: &str, port: u16) -> Result<Session> {
    connect_with_config(&ConnectConfig::new(host, port), None)
}

/// Connect with explicit configuration.
///
/// `cancel` aborts connection establishment only; once the socket is up the
/// session relies on the configured read/write timeouts.
pub fn connect_with_config(
    config: &ConnectConfig,
    cancel: Option<&CancelFlag>,
) -> Result<Session> {
    let stream = nutprims_transport::connect_with(
        &config.host,
        config.port,
        config.connect_timeout,
        cancel,
    )?;
    let reader_stream = stream.try_clone()?;

    let line_config = config.line_config();
    let reader = LineReader::with_config_tcp(reader_stream, line_config.clone())?;
    let writer = LineWriter::with_config_tcp(stream, line_config)?;

    debug!(host = %config.host, port = config.port, "reading server versions");
    Session::from_parts(reader, writer)
}
