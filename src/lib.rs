//! # cmdpulse
//!
//! A test client that pushes CMD frames to a TCP server:
//! - Fixed `"CMD"` header, big-endian command id, payload, CRC-16/ARC trailer
//! - Periodic mode over one long-lived connection
//! - Burst mode over a fresh connection per burst
//! - Cancellable loops for clean shutdown
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    CLI / Config                              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   PacketSender                               │
//! │             (Periodic / Burst loops)                         │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │                              │
//!            ▼                              ▼
//!   ┌─────────────────┐            ┌─────────────────┐
//!   │    Protocol     │            │   Connection    │
//!   │ (Frame + CRC16) │            │  (TcpStream)    │
//!   └─────────────────┘            └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod shutdown;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{PulseError, Result};
pub use config::{Config, Mode};
pub use network::{PacketSender, SendStats};
pub use shutdown::Shutdown;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of cmdpulse
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
