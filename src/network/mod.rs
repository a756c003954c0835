//! Network Module
//!
//! Outgoing TCP connections and the transmission loops.
//!
//! ## Architecture
//! - Single thread, blocking sockets
//! - One `Connection` owned per scope, closed on drop
//! - Loops stop on the shared `Shutdown` token

mod connection;
mod sender;

pub use connection::Connection;
pub use sender::{PacketSender, SendStats};
