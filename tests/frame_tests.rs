//! Frame Tests
//!
//! Encoding, decoding and stream reading of CMD frames.

use std::io::Cursor;

use bytes::Bytes;
use cmdpulse::protocol::{
    checksum, default_sequence, encode_frame, read_frame, write_frame, Command, Frame,
    MIN_FRAME_SIZE,
};
use cmdpulse::PulseError;

// =============================================================================
// Encoding
// =============================================================================

#[test]
fn test_encode_byte_command_exact_bytes() {
    let encoded = encode_frame(2, &[0x0A]);
    assert_eq!(
        encoded.as_ref(),
        &[0x43, 0x4D, 0x44, 0x00, 0x02, 0x0A, 0x67, 0x81]
    );
}

#[test]
fn test_default_sequence_wire_bytes() {
    let frames: Vec<Bytes> = default_sequence()
        .iter()
        .map(|c| c.to_frame().unwrap().encode())
        .collect();

    assert_eq!(frames[0].as_ref(), b"CMD\x00\x01\x0BABCDE-12345\x94\x72");
    assert_eq!(frames[1].as_ref(), b"CMD\x00\x02\x0A\x67\x81");
    assert_eq!(frames[2].as_ref(), b"CMD\x00\x03\x01\x00\x10\x48\x50");
}

#[test]
fn test_empty_payload_frame() {
    let encoded = encode_frame(0xFFFF, &[]);
    assert_eq!(encoded.len(), MIN_FRAME_SIZE);
    assert_eq!(&encoded[..5], b"CMD\xFF\xFF");
    assert_eq!(&encoded[5..], &checksum(&[0xFF, 0xFF]));
}

#[test]
fn test_raw_id_wider_than_16_bits_is_encoding_error() {
    assert!(Frame::with_raw_id(0xFFFF, Vec::<u8>::new()).is_ok());

    match Frame::with_raw_id(0x1_0000, vec![0x01u8]) {
        Err(PulseError::Encoding(_)) => {}
        other => panic!("Expected encoding error, got {:?}", other),
    }
}

#[test]
fn test_text_longer_than_length_byte_is_encoding_error() {
    assert!(Command::text(vec![b'a'; 255]).is_ok());
    assert!(matches!(
        Command::text(vec![b'a'; 256]),
        Err(PulseError::Encoding(_))
    ));
}

// =============================================================================
// Decoding
// =============================================================================

#[test]
fn test_decode_recovers_id_and_payload() {
    let cases: Vec<(u16, Vec<u8>)> = vec![
        (0, vec![]),
        (1, b"\x0BABCDE-12345".to_vec()),
        (2, vec![0x0A]),
        (0x1234, vec![0x00, 0xFF, 0x43, 0x4D, 0x44]),
        (u16::MAX, (0..=255).collect()),
    ];

    for (id, payload) in cases {
        let encoded = encode_frame(id, &payload);
        let decoded = Frame::decode(&encoded).unwrap();
        assert_eq!(decoded.command_id, id);
        assert_eq!(decoded.payload.as_ref(), payload.as_slice());

        let mut covered = id.to_be_bytes().to_vec();
        covered.extend_from_slice(&payload);
        assert_eq!(&encoded[encoded.len() - 2..], &checksum(&covered));
    }
}

#[test]
fn test_decode_rejects_corrupted_payload() {
    let mut encoded = encode_frame(3, &[0x01, 0x00, 0x10]).to_vec();
    encoded[6] ^= 0x01;

    match Frame::decode(&encoded) {
        Err(PulseError::Protocol(msg)) => assert!(msg.contains("Checksum")),
        other => panic!("Expected checksum error, got {:?}", other),
    }
}

#[test]
fn test_decode_rejects_bad_header() {
    let mut encoded = encode_frame(2, &[0x0A]).to_vec();
    encoded[0] = b'X';
    assert!(matches!(Frame::decode(&encoded), Err(PulseError::Protocol(_))));
}

#[test]
fn test_decode_rejects_short_input() {
    assert!(matches!(Frame::decode(b"CMD\x00\x02\x0A"), Err(PulseError::Protocol(_))));
    assert!(matches!(Frame::decode(&[]), Err(PulseError::Protocol(_))));
}

// =============================================================================
// Typed Commands
// =============================================================================

#[test]
fn test_command_from_frame() {
    for command in default_sequence() {
        let frame = Frame::decode(&command.to_frame().unwrap().encode()).unwrap();
        assert_eq!(frame.to_command().unwrap(), command);
    }

    let raw = Frame::new(42, vec![1u8, 2, 3]);
    assert_eq!(
        raw.to_command().unwrap(),
        Command::Raw {
            id: 42,
            payload: Bytes::from_static(&[1, 2, 3])
        }
    );
}

#[test]
fn test_command_from_frame_with_wrong_shape() {
    assert!(Frame::new(2, vec![0x0Au8, 0x0B]).to_command().is_err());
    assert!(Frame::new(3, vec![0x01u8]).to_command().is_err());
    assert!(Frame::new(1, vec![0x05u8, b'a']).to_command().is_err());
    assert!(Frame::new(1, Vec::<u8>::new()).to_command().is_err());
}

#[test]
fn test_parse_raw_command() {
    let cmd: Command = "2:0a".parse().unwrap();
    assert_eq!(cmd.id(), 2);
    assert_eq!(cmd.payload().unwrap().as_ref(), &[0x0A]);

    let cmd: Command = "0x0003:01 00 10".parse().unwrap();
    assert_eq!(cmd.id(), 3);
    assert_eq!(cmd.payload().unwrap().as_ref(), &[0x01, 0x00, 0x10]);

    assert!(matches!("70000:00".parse::<Command>(), Err(PulseError::Encoding(_))));
    assert!(matches!("2".parse::<Command>(), Err(PulseError::Encoding(_))));
    assert!(matches!("x:00".parse::<Command>(), Err(PulseError::Encoding(_))));
}

// =============================================================================
// Stream I/O
// =============================================================================

#[test]
fn test_read_frames_from_stream() {
    let mut buf = Vec::new();
    for command in default_sequence() {
        write_frame(&mut buf, &command.to_frame().unwrap()).unwrap();
    }

    let mut cursor = Cursor::new(buf);
    let mut commands = Vec::new();
    loop {
        match read_frame(&mut cursor) {
            Ok(frame) => commands.push(frame.to_command().unwrap()),
            Err(PulseError::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(e) => panic!("Unexpected error: {}", e),
        }
    }

    assert_eq!(commands, default_sequence());
}

#[test]
fn test_read_frame_unknown_id_cannot_be_delimited() {
    let encoded = encode_frame(9, &[0x01]);
    let mut cursor = Cursor::new(encoded.to_vec());
    assert!(matches!(read_frame(&mut cursor), Err(PulseError::Protocol(_))));
}

#[test]
fn test_read_frame_detects_bad_checksum() {
    let mut encoded = encode_frame(2, &[0x0A]).to_vec();
    let last = encoded.len() - 1;
    encoded[last] ^= 0xFF;

    let mut cursor = Cursor::new(encoded);
    assert!(matches!(read_frame(&mut cursor), Err(PulseError::Protocol(_))));
}

#[test]
fn test_read_frame_truncated() {
    let encoded = encode_frame(3, &[0x01, 0x00, 0x10]);
    let mut cursor = Cursor::new(encoded[..7].to_vec());

    match read_frame(&mut cursor) {
        Err(e) => assert_eq!(e.io_kind(), Some(std::io::ErrorKind::UnexpectedEof)),
        Ok(frame) => panic!("Expected EOF, got {:?}", frame),
    }
}
