//! Packet Sender
//!
//! Drives the configured command sequence onto the wire.
//!
//! - Periodic: one connection, the sequence every `period`.
//! - Burst: a new connection per burst, the sequence `size` times back to
//!   back, then close.
//!
//! Connect and write failures are returned immediately; nothing is retried.
//! Both loops run until the shutdown token is cancelled or the optional
//! iteration limit is reached.

use std::time::Duration;

use super::Connection;
use crate::config::{Config, Mode};
use crate::error::Result;
use crate::protocol::Frame;
use crate::shutdown::Shutdown;

/// Totals for a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendStats {
    /// Frames written
    pub frames: u64,

    /// Bytes written
    pub bytes: u64,

    /// Connections opened
    pub connections: u64,

    /// Completed iterations (periodic) or bursts (burst)
    pub iterations: u64,
}

/// Sends the configured sequence to the server
pub struct PacketSender {
    config: Config,

    /// The sequence, framed once up front
    frames: Vec<Frame>,

    shutdown: Shutdown,
}

impl PacketSender {
    /// Create a sender for a validated config
    pub fn new(config: Config, shutdown: Shutdown) -> Result<Self> {
        config.validate()?;
        let frames = config
            .sequence
            .iter()
            .map(Frame::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            config,
            frames,
            shutdown,
        })
    }

    /// The frames sent on every iteration
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Run the configured mode (blocking)
    pub fn run(&self) -> Result<SendStats> {
        match self.config.mode {
            Mode::Periodic { period, iterations } => self.run_periodic(period, iterations),
            Mode::Burst { size, bursts } => self.run_burst(size, bursts),
        }
    }

    /// Send the sequence over one connection every `period`
    pub fn run_periodic(&self, period: Duration, limit: Option<u64>) -> Result<SendStats> {
        let mut stats = SendStats::default();
        if self.shutdown.is_cancelled() {
            return Ok(stats);
        }

        let mut conn = Connection::open(&self.config)?;
        stats.connections = 1;
        tracing::info!(
            "Sending {} frames to {} every {:?}",
            self.frames.len(),
            conn.peer_addr(),
            period
        );

        while !reached(stats.iterations, limit) {
            stats.bytes += conn.send_all(&self.frames)? as u64;
            stats.frames += self.frames.len() as u64;
            stats.iterations += 1;
            tracing::debug!("Iteration {} sent to {}", stats.iterations, conn.peer_addr());

            if reached(stats.iterations, limit) || self.shutdown.wait_timeout(period) {
                break;
            }
        }

        tracing::info!(
            "Periodic run finished: {} iterations, {} frames, {} bytes",
            stats.iterations,
            stats.frames,
            stats.bytes
        );
        Ok(stats)
    }

    /// Open a connection per burst and send the sequence `size` times on it
    pub fn run_burst(&self, size: usize, limit: Option<u64>) -> Result<SendStats> {
        let mut stats = SendStats::default();

        while !self.shutdown.is_cancelled() && !reached(stats.iterations, limit) {
            let (frames, bytes) = self.send_burst(size)?;
            stats.frames += frames;
            stats.bytes += bytes;
            stats.connections += 1;
            stats.iterations += 1;
            tracing::info!(
                "Burst {} done: {} frames, {} bytes",
                stats.iterations,
                frames,
                bytes
            );
        }

        Ok(stats)
    }

    /// One burst on a fresh connection
    ///
    /// The connection is dropped, and so closed, when this returns, including
    /// on a write error.
    fn send_burst(&self, size: usize) -> Result<(u64, u64)> {
        let mut conn = Connection::open(&self.config)?;
        for _ in 0..size {
            if self.shutdown.is_cancelled() {
                break;
            }
            conn.send_all(&self.frames)?;
        }
        Ok((conn.frames_sent(), conn.bytes_sent()))
    }
}

fn reached(done: u64, limit: Option<u64>) -> bool {
    limit.is_some_and(|limit| done >= limit)
}
