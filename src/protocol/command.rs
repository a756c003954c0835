//! Command definitions
//!
//! Typed views over the payload shapes the server understands, plus a raw
//! escape hatch for anything else.

use std::fmt;
use std::str::FromStr;

use bytes::{BufMut, Bytes, BytesMut};

use super::frame::Frame;
use crate::error::{PulseError, Result};

/// Command ids with a known payload shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum CommandType {
    Text = 0x0001,
    Byte = 0x0002,
    Pair = 0x0003,
}

impl CommandType {
    pub fn from_id(id: u16) -> Option<Self> {
        match id {
            0x0001 => Some(CommandType::Text),
            0x0002 => Some(CommandType::Byte),
            0x0003 => Some(CommandType::Pair),
            _ => None,
        }
    }
}

/// How the payload of a command is delimited on a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// One length byte followed by that many bytes
    LengthPrefixed,

    /// A fixed number of bytes
    Fixed(usize),
}

impl PayloadShape {
    /// Shape of the payload for `command_id`, if the id is known
    pub fn for_command(command_id: u16) -> Option<Self> {
        CommandType::from_id(command_id).map(|t| match t {
            CommandType::Text => PayloadShape::LengthPrefixed,
            CommandType::Byte => PayloadShape::Fixed(1),
            CommandType::Pair => PayloadShape::Fixed(3),
        })
    }
}

/// A command to put on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Id 1: length-prefixed byte string
    ///
    /// Longer than 255 bytes cannot be encoded; `payload` and `to_frame`
    /// return an encoding error for it.
    Text(Bytes),

    /// Id 2: a single byte
    Byte(u8),

    /// Id 3: a big-endian u16 followed by a byte
    Pair(u16, u8),

    /// Any id with a verbatim payload
    Raw { id: u16, payload: Bytes },
}

impl Command {
    /// Build a text command, rejecting text that does not fit the length byte
    pub fn text(text: impl AsRef<[u8]>) -> Result<Self> {
        let text = text.as_ref();
        text_len(text)?;
        Ok(Command::Text(Bytes::copy_from_slice(text)))
    }

    /// The command id this command is sent with
    pub fn id(&self) -> u16 {
        match self {
            Command::Text(_) => CommandType::Text as u16,
            Command::Byte(_) => CommandType::Byte as u16,
            Command::Pair(..) => CommandType::Pair as u16,
            Command::Raw { id, .. } => *id,
        }
    }

    /// Encode the payload bytes (without header, id or checksum)
    pub fn payload(&self) -> Result<Bytes> {
        let payload = match self {
            Command::Text(text) => {
                let mut buf = BytesMut::with_capacity(1 + text.len());
                buf.put_u8(text_len(text)?);
                buf.put_slice(text);
                buf.freeze()
            }
            Command::Byte(value) => Bytes::copy_from_slice(&[*value]),
            Command::Pair(word, byte) => {
                let mut buf = BytesMut::with_capacity(3);
                buf.put_u16(*word);
                buf.put_u8(*byte);
                buf.freeze()
            }
            Command::Raw { payload, .. } => payload.clone(),
        };
        Ok(payload)
    }

    pub fn to_frame(&self) -> Result<Frame> {
        Ok(Frame::new(self.id(), self.payload()?))
    }

    /// Interpret a decoded frame
    ///
    /// Frames with an unknown id come back as `Raw`. A known id whose
    /// payload does not match its shape is a protocol error.
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        let payload = &frame.payload;
        let Some(kind) = CommandType::from_id(frame.command_id) else {
            return Ok(Command::Raw {
                id: frame.command_id,
                payload: payload.clone(),
            });
        };

        match kind {
            CommandType::Text => {
                let len = *payload.first().ok_or_else(|| {
                    PulseError::Protocol("text command: missing length byte".to_string())
                })? as usize;
                if payload.len() != 1 + len {
                    return Err(PulseError::Protocol(format!(
                        "text command: length byte says {} bytes, got {}",
                        len,
                        payload.len() - 1
                    )));
                }
                Ok(Command::Text(payload.slice(1..)))
            }
            CommandType::Byte => match &payload[..] {
                [value] => Ok(Command::Byte(*value)),
                _ => Err(PulseError::Protocol(format!(
                    "byte command: expected 1 byte, got {}",
                    payload.len()
                ))),
            },
            CommandType::Pair => match &payload[..] {
                [hi, lo, byte] => Ok(Command::Pair(u16::from_be_bytes([*hi, *lo]), *byte)),
                _ => Err(PulseError::Protocol(format!(
                    "pair command: expected 3 bytes, got {}",
                    payload.len()
                ))),
            },
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Text(text) => write!(f, "text({:?})", String::from_utf8_lossy(text)),
            Command::Byte(value) => write!(f, "byte(0x{:02x})", value),
            Command::Pair(word, byte) => write!(f, "pair(0x{:04x}, 0x{:02x})", word, byte),
            Command::Raw { id, payload } => write!(f, "raw({}, {} bytes)", id, payload.len()),
        }
    }
}

/// Parses `ID:HEX`, e.g. `2:0a` or `0x0003:010010`, into a raw command
impl FromStr for Command {
    type Err = PulseError;

    fn from_str(s: &str) -> Result<Self> {
        let (id, hex) = s.split_once(':').ok_or_else(|| {
            PulseError::Encoding(format!("expected ID:HEX, got {:?}", s))
        })?;

        let id = id.trim();
        let id = match id.strip_prefix("0x").or_else(|| id.strip_prefix("0X")) {
            Some(digits) => u32::from_str_radix(digits, 16),
            None => id.parse::<u32>(),
        }
        .map_err(|e| PulseError::Encoding(format!("invalid command id {:?}: {}", id, e)))?;

        let frame = Frame::with_raw_id(id, parse_hex(hex)?)?;
        Ok(Command::Raw {
            id: frame.command_id,
            payload: frame.payload,
        })
    }
}

/// Length byte for a text payload
fn text_len(text: &[u8]) -> Result<u8> {
    u8::try_from(text.len()).map_err(|_| {
        PulseError::Encoding(format!(
            "text of {} bytes exceeds the 255 byte length prefix",
            text.len()
        ))
    })
}

/// Replace the payload of every text command in `sequence`
pub fn with_text(mut sequence: Vec<Command>, text: impl AsRef<[u8]>) -> Result<Vec<Command>> {
    let replacement = Command::text(text)?;
    for command in sequence.iter_mut() {
        if matches!(command, Command::Text(_)) {
            *command = replacement.clone();
        }
    }
    Ok(sequence)
}

/// Pick the sequence to send
///
/// Raw commands, when given, replace the default sequence outright and
/// `text` is ignored. Otherwise `text` rewrites the default text command.
pub fn build_sequence(raw: Vec<Command>, text: Option<&str>) -> Result<Vec<Command>> {
    if !raw.is_empty() {
        return Ok(raw);
    }
    match text {
        Some(text) => with_text(default_sequence(), text),
        None => Ok(default_sequence()),
    }
}

/// Parse a hex string, ignoring whitespace
fn parse_hex(hex: &str) -> Result<Vec<u8>> {
    let digits: Vec<u8> = hex.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err(PulseError::Encoding(format!(
            "hex payload {:?} has an odd number of digits",
            hex
        )));
    }

    digits
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| PulseError::Encoding(format!("invalid hex byte in {:?}", hex)))
        })
        .collect()
}

/// The sequence sent on every iteration unless configured otherwise
pub fn default_sequence() -> Vec<Command> {
    vec![
        Command::Text(Bytes::from_static(b"ABCDE-12345")),
        Command::Byte(0x0A),
        Command::Pair(0x0100, 0x10),
    ]
}
