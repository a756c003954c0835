//! Frame checksum
//!
//! CRC-16/ARC: reflected polynomial 0xA001 (0x8005 normal form), initial
//! value 0x0000, no final XOR. The trailer of every frame carries this
//! value, most significant byte first, computed over `command_id || payload`.

use crc::{Crc, CRC_16_ARC};

/// Size of the checksum trailer in bytes
pub const CHECKSUM_SIZE: usize = 2;

const ARC: Crc<u16> = Crc::<u16>::new(&CRC_16_ARC);

/// Compute the CRC-16/ARC of `data`
pub fn crc16_arc(data: &[u8]) -> u16 {
    ARC.checksum(data)
}

/// Compute the checksum of `data` as it appears on the wire
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_SIZE] {
    crc16_arc(data).to_be_bytes()
}

/// Checksum over a command id and its payload without concatenating them first
pub fn frame_checksum(command_id: u16, payload: &[u8]) -> u16 {
    let mut digest = ARC.digest();
    digest.update(&command_id.to_be_bytes());
    digest.update(payload);
    digest.finalize()
}
