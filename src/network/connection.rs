//! Connection Handle
//!
//! Owns one TCP stream to the server under test. Dropping the handle closes
//! the socket, so a connection never outlives the scope that opened it,
//! whether that scope exits normally or through `?`.

use std::io::Write;
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::Config;
use crate::error::{PulseError, Result};
use crate::protocol::Frame;

/// A single outgoing connection
pub struct Connection {
    /// TCP stream to the server
    stream: TcpStream,

    /// Peer address for logging
    peer_addr: String,

    /// Frames written on this connection
    frames_sent: u64,

    /// Bytes written on this connection
    bytes_sent: u64,
}

impl Connection {
    /// Connect to the server named in `config`
    ///
    /// Sets TCP_NODELAY and the configured write timeout.
    pub fn open(config: &Config) -> Result<Self> {
        let addr = config.addr();
        let stream = connect(&addr, config.connect_timeout_ms).map_err(|source| {
            tracing::warn!("Connection to {} failed: {}", addr, source);
            PulseError::Connect {
                addr: addr.clone(),
                source,
            }
        })?;

        // Frames are small; send each one as soon as it is written
        stream.set_nodelay(true)?;

        if config.write_timeout_ms > 0 {
            stream.set_write_timeout(Some(Duration::from_millis(config.write_timeout_ms)))?;
        }

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| addr.clone());

        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self {
            stream,
            peer_addr,
            frames_sent: 0,
            bytes_sent: 0,
        })
    }

    /// Write one frame
    ///
    /// Returns the number of bytes written.
    pub fn send(&mut self, frame: &Frame) -> Result<usize> {
        let bytes = frame.encode();
        self.stream
            .write_all(&bytes)
            .and_then(|_| self.stream.flush())
            .map_err(|source| PulseError::Write {
                peer: self.peer_addr.clone(),
                source,
            })?;

        self.frames_sent += 1;
        self.bytes_sent += bytes.len() as u64;
        tracing::trace!(
            "Sent command {} ({} bytes) to {}",
            frame.command_id,
            bytes.len(),
            self.peer_addr
        );
        Ok(bytes.len())
    }

    /// Write every frame of `frames` in order
    ///
    /// Returns the number of bytes written.
    pub fn send_all(&mut self, frames: &[Frame]) -> Result<usize> {
        let mut written = 0;
        for frame in frames {
            written += self.send(frame)?;
        }
        Ok(written)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        // The peer may already be gone; closing is best effort
        let _ = self.stream.shutdown(Shutdown::Both);
        tracing::debug!(
            "Closed connection to {} after {} frames ({} bytes)",
            self.peer_addr,
            self.frames_sent,
            self.bytes_sent
        );
    }
}

/// Resolve `addr` and connect, honouring an optional timeout
fn connect(addr: &str, timeout_ms: u64) -> std::io::Result<TcpStream> {
    if timeout_ms == 0 {
        return TcpStream::connect(addr);
    }

    let timeout = Duration::from_millis(timeout_ms);
    let candidates: Vec<SocketAddr> = addr.to_socket_addrs()?.collect();
    let mut last_err = None;

    for candidate in candidates {
        match TcpStream::connect_timeout(&candidate, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }

    Err(last_err.unwrap_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} did not resolve to any address", addr),
        )
    }))
}
