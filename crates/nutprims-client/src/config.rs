use std::time::Duration;

use nutprims_frame::{LineConfig, DEFAULT_MAX_LINE};
use nutprims_transport::DEFAULT_PORT;

/// Default host when none is given.
pub const DEFAULT_HOST: &str = "localhost";

/// Configuration for opening a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectConfig {
    /// Host name or address of upsd.
    pub host: String,
    /// TCP port. Default: 3493.
    pub port: u16,
    /// Deadline for establishing the TCP connection.
    pub connect_timeout: Option<Duration>,
    /// Read timeout applied to the socket once connected.
    pub read_timeout: Option<Duration>,
    /// Write timeout applied to the socket once connected.
    pub write_timeout: Option<Duration>,
    /// Maximum length of a single response line.
    pub max_line_length: usize,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            connect_timeout: None,
            read_timeout: None,
            write_timeout: None,
            max_line_length: DEFAULT_MAX_LINE,
        }
    }
}

impl ConnectConfig {
    /// Configuration for `host:port` with everything else defaulted.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Apply the same timeout to socket reads and writes.
    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self.write_timeout = Some(timeout);
        self
    }

    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    pub(crate) fn line_config(&self) -> LineConfig {
        LineConfig {
            max_line_length: self.max_line_length,
            read_timeout: self.read_timeout,
            write_timeout: self.write_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_local_upsd() {
        let config = ConnectConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 3493);
        assert_eq!(config.connect_timeout, None);
    }

    #[test]
    fn builders_fill_line_config() {
        let config = ConnectConfig::new("nas.local", 3494)
            .with_connect_timeout(Duration::from_secs(2))
            .with_io_timeout(Duration::from_millis(750))
            .with_max_line_length(1024);
        let line = config.line_config();
        assert_eq!(line.max_line_length, 1024);
        assert_eq!(line.read_timeout, Some(Duration::from_millis(750)));
        assert_eq!(line.write_timeout, Some(Duration::from_millis(750)));
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(2)));
    }
}
