//! Protocol Module
//!
//! Defines the CMD frame format sent to the server under test.
//!
//! ## Frame Format
//! ```text
//! ┌───────────┬──────────┬──────────────────────┬────────────┐
//! │ "CMD" (3) │  Id (2)  │  Payload (variable)  │  CRC (2)   │
//! └───────────┴──────────┴──────────────────────┴────────────┘
//! ```
//!
//! ### Commands
//! - 0x0001: TEXT - Payload: len (1) + bytes[len]
//! - 0x0002: BYTE - Payload: value (1)
//! - 0x0003: PAIR - Payload: word (2, BE) + value (1)
//!
//! ### Checksum
//! CRC-16/ARC over id + payload, big-endian.

mod checksum;
mod command;
mod frame;

pub use checksum::{checksum, crc16_arc, frame_checksum, CHECKSUM_SIZE};
pub use command::{
    build_sequence, default_sequence, with_text, Command, CommandType, PayloadShape,
};
pub use frame::{
    encode_frame, read_frame, to_hex, write_frame, Frame, COMMAND_ID_SIZE, HEADER, HEADER_SIZE,
    MIN_FRAME_SIZE,
};
