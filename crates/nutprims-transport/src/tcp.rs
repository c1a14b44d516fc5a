use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::stream::NutStream;

/// Default upsd TCP port.
pub const DEFAULT_PORT: u16 = 3493;

/// Shared flag that aborts an in-progress [`connect_with`].
///
/// Cancellation is only observed between address attempts; it never
/// interrupts a socket that is already connected.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a new, un-cancelled flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Connect to `host:port` without a deadline (blocking).
pub fn connect(host: &str, port: u16) -> Result<NutStream> {
    connect_with(host, port, None, None)
}

/// Connect to `host:port`, trying each resolved address in order.
///
/// `timeout` is a deadline for the whole operation, shared across all
/// resolved addresses. `cancel` is checked before each attempt.
pub fn connect_with(
    host: &str,
    port: u16,
    timeout: Option<Duration>,
    cancel: Option<&CancelFlag>,
) -> Result<NutStream> {
    let address = format!("{host}:{port}");
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|source| TransportError::Resolve {
            address: address.clone(),
            source,
        })?
        .collect();

    if addrs.is_empty() {
        return Err(TransportError::Resolve {
            address,
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "host resolved to no addresses",
            ),
        });
    }

    let deadline = timeout.map(|t| (Instant::now() + t, t));
    let mut last_err = None;

    for addr in addrs {
        if cancel.is_some_and(CancelFlag::is_cancelled) {
            return Err(TransportError::Cancelled { address });
        }

        let attempt = match deadline {
            Some((at, total)) => {
                let remaining = at.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return Err(TransportError::Timeout {
                        address,
                        timeout: total,
                    });
                }
                TcpStream::connect_timeout(&addr, remaining)
            }
            None => TcpStream::connect(addr),
        };

        match attempt {
            Ok(stream) => {
                let _ = stream.set_nodelay(true);
                debug!(%addr, "connected to upsd");
                return Ok(NutStream::from_tcp(stream));
            }
            Err(err) => {
                debug!(%addr, error = %err, "connect attempt failed");
                last_err = Some(err);
            }
        }
    }

    let source = last_err
        .unwrap_or_else(|| std::io::Error::other("no address attempted"));
    if source.kind() == std::io::ErrorKind::TimedOut {
        if let Some((_, total)) = deadline {
            return Err(TransportError::Timeout {
                address,
                timeout: total,
            });
        }
    }
    Err(TransportError::Connect { address, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    #[test]
    fn test_connect_and_exchange() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = std::thread::spawn(move || {
            let (mut server, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4];
            server.read_exact(&mut buf).unwrap();
            assert_eq!(&buf, b"VER\n");
            server.write_all(b"upsd 2.8.0\n").unwrap();
        });

        let mut client = connect("127.0.0.1", port).unwrap();
        client.write_all(b"VER\n").unwrap();
        let mut reply = String::new();
        client.read_to_string(&mut reply).unwrap();
        assert_eq!(reply, "upsd 2.8.0\n");

        handle.join().unwrap();
    }

    #[test]
    fn test_connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = connect_with("127.0.0.1", port, Some(Duration::from_secs(2)), None);
        assert!(matches!(
            result,
            Err(TransportError::Connect { .. }) | Err(TransportError::Timeout { .. })
        ));
    }

    #[test]
    fn test_cancelled_before_attempt() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let cancel = CancelFlag::new();
        cancel.cancel();
        let result = connect_with("127.0.0.1", port, None, Some(&cancel));
        assert!(matches!(result, Err(TransportError::Cancelled { .. })));
    }

    #[test]
    fn test_clone_shares_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = std::thread::spawn(move || {
            let (mut server, _) = listener.accept().unwrap();
            server.write_all(b"pong\n").unwrap();
        });

        let stream = connect_with("127.0.0.1", port, Some(Duration::from_secs(2)), None).unwrap();
        let mut reader = stream.try_clone().unwrap();
        let mut buf = [0u8; 5];
        reader.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"pong\n");
        assert_eq!(stream.peer_addr().unwrap().port(), port);

        handle.join().unwrap();
        stream.shutdown().unwrap();
    }
}
