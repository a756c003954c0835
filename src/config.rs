//! Configuration for cmdpulse
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::error::{PulseError, Result};
use crate::protocol::{default_sequence, Command};

/// Main configuration for a sender run
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Target
    // -------------------------------------------------------------------------
    /// Server host name or address
    pub host: String,

    /// Server TCP port
    pub port: u16,

    // -------------------------------------------------------------------------
    // Transmission
    // -------------------------------------------------------------------------
    /// How frames are pushed to the server
    pub mode: Mode,

    /// Commands sent, in order, on every iteration
    pub sequence: Vec<Command>,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Connect timeout (milliseconds, 0 = block until the OS gives up)
    pub connect_timeout_ms: u64,

    /// Socket write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,
}

/// Transmission mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One connection; send the sequence, sleep `period`, repeat
    Periodic {
        period: Duration,
        /// Stop after this many iterations (None = until shutdown)
        iterations: Option<u64>,
    },

    /// A fresh connection per burst; send the sequence `size` times, close, repeat
    Burst {
        size: usize,
        /// Stop after this many bursts (None = until shutdown)
        bursts: Option<u64>,
    },
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Periodic {
            period: Duration::from_secs(1),
            iterations: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 33721,
            mode: Mode::default(),
            sequence: default_sequence(),
            connect_timeout_ms: 0,
            write_timeout_ms: 0,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `host:port` as passed to the resolver
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject configurations that could never send anything
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(PulseError::Config("host must not be empty".to_string()));
        }
        if self.sequence.is_empty() {
            return Err(PulseError::Config(
                "command sequence must not be empty".to_string(),
            ));
        }
        if let Mode::Burst { size: 0, .. } = self.mode {
            return Err(PulseError::Config(
                "burst size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Send periodically over one connection
    pub fn periodic(mut self, period: Duration, iterations: Option<u64>) -> Self {
        self.config.mode = Mode::Periodic { period, iterations };
        self
    }

    /// Send in bursts over fresh connections
    pub fn burst(mut self, size: usize, bursts: Option<u64>) -> Self {
        self.config.mode = Mode::Burst { size, bursts };
        self
    }

    /// Replace the command sequence
    pub fn sequence(mut self, sequence: Vec<Command>) -> Self {
        self.config.sequence = sequence;
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
