use std::io;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::net::TcpStream;
use tokio::time::timeout;

#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("dial tcp {addr}: i/o timeout after {}ms", .limit.as_millis())]
    TimedOut { addr: SocketAddr, limit: Duration },
    #[error("dial tcp {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// Completes one TCP handshake with `addr` and returns how long it took.
///
/// The connection is closed as soon as it is established.
pub async fn handshake(addr: SocketAddr, probe_timeout: Duration) -> Result<Duration, HandshakeError> {
    let started: Instant = Instant::now();

    match timeout(probe_timeout, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => {
            let elapsed: Duration = started.elapsed();
            drop(stream);
            Ok(elapsed)
        }
        Ok(Err(source)) => Err(HandshakeError::Connect { addr, source }),
        Err(_elapsed) => Err(HandshakeError::TimedOut {
            addr,
            limit: probe_timeout,
        }),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
