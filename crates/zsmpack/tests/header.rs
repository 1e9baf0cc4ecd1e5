use std::convert::TryFrom;

use zsmpack::{PackError, ZSM_HEADER_SIZE, ZsmDocument, ZsmHeader};

/// Build a 16-byte header with recognizable field values.
fn header_bytes() -> Vec<u8> {
    vec![
        b'z', b'm', // magic
        0x01, // version
        0x34, 0x12, 0x00, // loop offset = 0x001234
        0x00, 0x00, 0x00, // pcm offset = 0 (absent)
        0x3F, // fm channel mask
        0xFF, 0x00, // psg channel mask = 0x00FF
        0x3C, 0x00, // tick rate = 60
        0xAA, 0xBB, // reserved
    ]
}

#[test]
fn parse_header_fields() {
    let mut bytes = header_bytes();
    bytes.push(0x80); // end-of-stream marker

    let doc = ZsmDocument::try_from(bytes.as_slice()).expect("failed to parse");
    let expected = ZsmHeader {
        version: 0x01,
        loop_offset: 0x001234,
        pcm_offset: 0,
        fm_channel_mask: 0x3F,
        psg_channel_mask: 0x00FF,
        tick_rate: 60,
        reserved: [0xAA, 0xBB],
    };
    assert_eq!(doc.header, expected);
    assert!(!doc.header.has_pcm());
}

#[test]
fn header_round_trips_to_bytes() {
    let mut bytes = header_bytes();
    bytes.push(0x80);

    let doc = ZsmDocument::try_from(bytes.as_slice()).expect("failed to parse");
    assert_eq!(doc.header.to_bytes().as_slice(), &bytes[..ZSM_HEADER_SIZE]);
}

#[test]
fn bad_magic_is_rejected_before_line_parsing() {
    let mut bytes = header_bytes();
    bytes[0] = b'x';
    bytes[1] = b'y';
    bytes.push(0x80);

    match ZsmDocument::try_from(bytes.as_slice()) {
        Err(PackError::InvalidMagic(m)) => assert_eq!(m, [b'x', b'y']),
        other => panic!("expected InvalidMagic, got {:?}", other),
    }
}

#[test]
fn short_header_is_rejected() {
    let bytes = &header_bytes()[..10];
    match ZsmDocument::try_from(bytes) {
        Err(PackError::HeaderTooShort { available }) => assert_eq!(available, 10),
        other => panic!("expected HeaderTooShort, got {:?}", other),
    }
}

#[test]
fn pcm_offset_flags_presence() {
    let mut bytes = header_bytes();
    bytes[0x06] = 0x20; // pcm offset = 0x000020
    bytes.push(0x80);

    let doc = ZsmDocument::try_from(bytes.as_slice()).expect("failed to parse");
    assert_eq!(doc.header.pcm_offset, 0x20);
    assert!(doc.header.has_pcm());
}
