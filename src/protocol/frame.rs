//! Frame codec
//!
//! Encoding and decoding of CMD frames.
//!
//! ## Wire Format
//! ```text
//! ┌───────────┬──────────┬──────────────────────┬────────────┐
//! │ "CMD" (3) │  Id (2)  │  Payload (variable)  │  CRC (2)   │
//! └───────────┴──────────┴──────────────────────┴────────────┘
//! ```
//!
//! Id and CRC are big-endian. The CRC covers `Id || Payload` only.
//! The payload length is not on the wire; a stream reader has to know the
//! shape of each command to find the end of a frame.

use std::io::{Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use super::checksum::{frame_checksum, CHECKSUM_SIZE};
use super::command::{Command, PayloadShape};
use crate::error::{PulseError, Result};

/// Header size in bytes
pub const HEADER_SIZE: usize = 3;

/// Literal frame header
pub const HEADER: &[u8; HEADER_SIZE] = b"CMD";

/// Command id size in bytes
pub const COMMAND_ID_SIZE: usize = 2;

/// Smallest possible frame: header + id + empty payload + checksum
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + COMMAND_ID_SIZE + CHECKSUM_SIZE;

/// A single frame: command id plus its raw payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub command_id: u16,
    pub payload: Bytes,
}

impl Frame {
    /// Create a frame from a 16-bit id and a payload
    pub fn new(command_id: u16, payload: impl Into<Bytes>) -> Self {
        Self {
            command_id,
            payload: payload.into(),
        }
    }

    /// Create a frame from an untyped id, rejecting ids wider than 16 bits
    pub fn with_raw_id(command_id: u32, payload: impl Into<Bytes>) -> Result<Self> {
        let command_id = u16::try_from(command_id).map_err(|_| {
            PulseError::Encoding(format!(
                "command id {} does not fit in 16 bits",
                command_id
            ))
        })?;
        Ok(Self::new(command_id, payload))
    }

    /// CRC-16/ARC over `command_id || payload`
    pub fn checksum(&self) -> u16 {
        frame_checksum(self.command_id, &self.payload)
    }

    /// Number of bytes this frame occupies on the wire
    pub fn encoded_len(&self) -> usize {
        MIN_FRAME_SIZE + self.payload.len()
    }

    /// Append the wire encoding of this frame to `buf`
    pub fn encode_into(&self, buf: &mut BytesMut) {
        buf.reserve(self.encoded_len());
        buf.put_slice(HEADER);
        buf.put_u16(self.command_id);
        buf.put_slice(&self.payload);
        buf.put_u16(self.checksum());
    }

    /// Encode this frame to bytes
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf.freeze()
    }

    /// Decode exactly one complete frame
    ///
    /// The whole slice is taken as the frame, so any command id is accepted
    /// and everything between the id and the trailing checksum is the payload.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < MIN_FRAME_SIZE {
            return Err(PulseError::Protocol(format!(
                "Incomplete frame: expected at least {} bytes, got {}",
                MIN_FRAME_SIZE,
                bytes.len()
            )));
        }

        check_header(&bytes[..HEADER_SIZE])?;

        let command_id = u16::from_be_bytes([bytes[HEADER_SIZE], bytes[HEADER_SIZE + 1]]);
        let crc_pos = bytes.len() - CHECKSUM_SIZE;
        let payload = &bytes[HEADER_SIZE + COMMAND_ID_SIZE..crc_pos];
        let expected = u16::from_be_bytes([bytes[crc_pos], bytes[crc_pos + 1]]);

        let frame = Frame::new(command_id, Bytes::copy_from_slice(payload));
        verify_checksum(&frame, expected)?;
        Ok(frame)
    }

    /// Interpret the payload as a typed command
    pub fn to_command(&self) -> Result<Command> {
        Command::from_frame(self)
    }
}

impl TryFrom<&Command> for Frame {
    type Error = PulseError;

    fn try_from(command: &Command) -> Result<Self> {
        command.to_frame()
    }
}

/// Encode a frame straight from an id and a payload
pub fn encode_frame(command_id: u16, payload: &[u8]) -> Bytes {
    Frame::new(command_id, Bytes::copy_from_slice(payload)).encode()
}

fn check_header(header: &[u8]) -> Result<()> {
    if header != HEADER {
        return Err(PulseError::Protocol(format!(
            "Bad frame header: {:02x?}",
            header
        )));
    }
    Ok(())
}

fn verify_checksum(frame: &Frame, expected: u16) -> Result<()> {
    let actual = frame.checksum();
    if actual != expected {
        return Err(PulseError::Protocol(format!(
            "Checksum mismatch for command {}: frame carries 0x{:04x}, computed 0x{:04x}",
            frame.command_id, expected, actual
        )));
    }
    Ok(())
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one complete frame from a stream
///
/// Blocks until the frame is complete. The payload is delimited using the
/// known shape of the command id; unknown ids cannot be delimited and are
/// reported as protocol errors. A stream that ends between frames yields an
/// I/O error of kind `UnexpectedEof`.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Frame> {
    let mut head = [0u8; HEADER_SIZE + COMMAND_ID_SIZE];
    reader.read_exact(&mut head)?;

    check_header(&head[..HEADER_SIZE])?;
    let command_id = u16::from_be_bytes([head[HEADER_SIZE], head[HEADER_SIZE + 1]]);

    let payload = match PayloadShape::for_command(command_id) {
        Some(PayloadShape::LengthPrefixed) => {
            let mut len = [0u8; 1];
            reader.read_exact(&mut len)?;
            let mut payload = vec![0u8; 1 + len[0] as usize];
            payload[0] = len[0];
            reader.read_exact(&mut payload[1..])?;
            payload
        }
        Some(PayloadShape::Fixed(len)) => {
            let mut payload = vec![0u8; len];
            reader.read_exact(&mut payload)?;
            payload
        }
        None => {
            return Err(PulseError::Protocol(format!(
                "Cannot delimit payload of unknown command id {}",
                command_id
            )))
        }
    };

    let mut crc = [0u8; CHECKSUM_SIZE];
    reader.read_exact(&mut crc)?;

    let frame = Frame::new(command_id, payload);
    verify_checksum(&frame, u16::from_be_bytes(crc))?;
    Ok(frame)
}

/// Write a frame to a stream
pub fn write_frame<W: Write>(writer: &mut W, frame: &Frame) -> Result<()> {
    writer.write_all(&frame.encode())?;
    writer.flush()?;
    Ok(())
}

/// Render bytes as space separated uppercase hex
pub fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_len_counts_header_id_and_trailer() {
        let frame = Frame::new(3, vec![0x01u8, 0x00, 0x10]);
        assert_eq!(frame.encoded_len(), 10);
        assert_eq!(frame.encode().len(), 10);
    }

    #[test]
    fn hex_rendering() {
        assert_eq!(to_hex(b"CMD"), "43 4D 44");
        assert_eq!(to_hex(&[]), "");
    }
}
