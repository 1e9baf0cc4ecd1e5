use std::collections::HashMap;
use std::convert::TryFrom;

use zsmpack::{
    BankCursor, CompressedDictionary, Line, PackConfig, PackError, ZsmDocument, ZsmHeader,
    compress, compress_document,
};

/// Minimal valid header followed by `body`.
fn zsm(body: &[u8]) -> Vec<u8> {
    let mut bytes = vec![
        b'z', b'm', 0x01, // magic + version
        0, 0, 0, // loop offset
        0, 0, 0, // pcm offset
        0, // fm channel mask
        0, 0, // psg channel mask
        0x3C, 0, // tick rate = 60
        0, 0, // reserved
    ];
    bytes.extend_from_slice(body);
    bytes
}

/// Decode the pointer table of a dictionary: `line_count` 3-byte
/// little-endian entries, each biased by -1.
fn decode_pointers(dict: &CompressedDictionary) -> Vec<u32> {
    let bytes = dict.as_bytes();
    (0..dict.line_count)
        .map(|i| {
            let e = &bytes[i * 3..i * 3 + 3];
            let stored = e[0] as u32 | (e[1] as u32) << 8 | (e[2] as u32) << 16;
            stored.wrapping_add(1)
        })
        .collect()
}

/// Reconstruct the original line-byte sequence from a dictionary by walking
/// the pointer table and resolving each address to its stored unique payload.
fn reconstruct(doc: &ZsmDocument, dict: &CompressedDictionary, config: &PackConfig) -> Vec<u8> {
    // Replay the allocation to find where each unique payload sits, both in
    // the target address space and in the payload section of the output.
    let mut cursor = BankCursor::new(config.start_bank(), config.base_addr(), config.window_size());
    cursor.reserve(doc.lines.len() * 3);

    let mut seen: HashMap<[u8; 32], ()> = HashMap::new();
    let mut payload_ranges: HashMap<u32, (usize, usize)> = HashMap::new();
    let mut payload_off = dict.line_count * 3;
    for line in &doc.lines {
        if seen.insert(line.fingerprint(), ()).is_none() {
            let address = cursor.alloc(line.len());
            payload_ranges.insert(address.packed(), (payload_off, line.len()));
            payload_off += line.len();
        }
    }

    let mut out = Vec::new();
    for packed in decode_pointers(dict) {
        let (off, len) = payload_ranges[&packed];
        out.extend_from_slice(&dict.as_bytes()[off..off + len]);
    }
    out
}

#[test]
fn single_line_layout() {
    // One PSG write of value 5, then a 1-tick delay: exactly one line of
    // 3 bytes, one pointer entry, the same 3 bytes as payload.
    let bytes = zsm(&[0x00, 0x05, 0x81]);
    let config = PackConfig::default();
    let dict = compress(&bytes, &config).expect("failed to pack");

    assert_eq!(dict.line_count, 1);
    assert_eq!(dict.unique_count, 1);
    assert_eq!(dict.unique_payload_bytes, 3);

    // The reserved pointer table is 3 bytes, so the line lands at
    // bank 1, offset 0xA003; the stored entry carries the -1 bias.
    assert_eq!(
        dict.as_bytes(),
        &[0x02, 0xA0, 0x01, 0x00, 0x05, 0x81][..]
    );
}

#[test]
fn duplicate_lines_share_one_slot() {
    // Two identical lines, then the EOF line: 3 occurrences, 2 unique
    // payloads, pointer entries 0 and 1 hold the same address.
    let bytes = zsm(&[0x00, 0x05, 0x81, 0x00, 0x05, 0x81, 0x80]);
    let config = PackConfig::default();
    let dict = compress(&bytes, &config).expect("failed to pack");

    assert_eq!(dict.line_count, 3);
    assert_eq!(dict.unique_count, 2);
    assert_eq!(dict.unique_payload_bytes, 4);

    let pointers = decode_pointers(&dict);
    assert_eq!(pointers[0], pointers[1]);
    assert_ne!(pointers[1], pointers[2]);

    // 9 reserved pointer bytes, then [00 05 81] at 0xA009 and [80] at 0xA00C.
    assert_eq!(pointers[0], 0x01A009);
    assert_eq!(pointers[2], 0x01A00C);
    assert_eq!(&dict.as_bytes()[9..], &[0x00, 0x05, 0x81, 0x80]);
}

#[test]
fn round_trip_reproduces_original_line_bytes() {
    let body = [
        0x00, 0x05, 0x81, // line A
        0x42, 0x20, 0x01, 0x28, 0xF0, 0x83, // line B
        0x00, 0x05, 0x81, // line A again
        0x00, 0x05, 0x81, // and again
        0x42, 0x20, 0x01, 0x28, 0xF0, 0x83, // line B again
        0x01, 0x1F, 0x9E, // line C
        0x80, // EOF line
    ];
    let bytes = zsm(&body);
    let config = PackConfig::default();
    let doc = ZsmDocument::try_from(bytes.as_slice()).expect("failed to parse");
    let dict = compress_document(&doc, &config).expect("failed to pack");

    assert_eq!(dict.line_count, 7);
    assert_eq!(dict.unique_count, 4);

    let original: Vec<u8> = doc.iter().flat_map(|l| l.bytes().to_vec()).collect();
    assert_eq!(original.as_slice(), body.as_slice());
    assert_eq!(reconstruct(&doc, &dict, &config), original);
}

#[test]
fn unique_size_never_exceeds_total_and_matches_when_distinct() {
    // All-distinct input: unique payload size equals the total.
    let distinct = zsm(&[0x00, 0x01, 0x81, 0x00, 0x02, 0x81, 0x80]);
    let dict = compress(&distinct, &PackConfig::default()).expect("failed to pack");
    assert_eq!(dict.unique_payload_bytes, 3 + 3 + 1);

    // Repeated input: strictly smaller.
    let repeated = zsm(&[0x00, 0x01, 0x81, 0x00, 0x01, 0x81, 0x80]);
    let doc = ZsmDocument::try_from(repeated.as_slice()).expect("failed to parse");
    let dict = compress_document(&doc, &PackConfig::default()).expect("failed to pack");
    assert!(dict.unique_payload_bytes < doc.total_payload_bytes());
}

#[test]
fn compression_is_deterministic() {
    let mut body = Vec::new();
    for i in 0..64u8 {
        body.extend_from_slice(&[i % 8, i, 0x81]);
    }
    body.push(0x80);
    let bytes = zsm(&body);

    let a = compress(&bytes, &PackConfig::default()).expect("failed to pack");
    let b = compress(&bytes, &PackConfig::default()).expect("failed to pack");
    assert_eq!(a.as_bytes(), b.as_bytes());
}

#[test]
fn allocations_are_increasing_and_non_overlapping() {
    let mut body = Vec::new();
    for i in 0..200u8 {
        // Distinct FM lines of 4 bytes each, long enough to wrap banks
        // with a small window below.
        body.extend_from_slice(&[0x41, 0x20, i, 0x81]);
    }
    body.push(0x80);
    let bytes = zsm(&body);

    let config = PackConfig::default()
        .with_window_size(0x100)
        .expect("valid window");
    let doc = ZsmDocument::try_from(bytes.as_slice()).expect("failed to parse");
    let dict = compress_document(&doc, &config).expect("failed to pack");
    assert_eq!(dict.unique_count, 201);

    // Project each unique address onto a linear byte index and check that
    // consecutive allocations never overlap, modulo bank wraparound.
    let pointers = decode_pointers(&dict);
    let mut seen: Vec<u32> = Vec::new();
    for &p in &pointers {
        if !seen.contains(&p) {
            seen.push(p);
        }
    }
    let linear = |packed: u32| -> u64 {
        let bank = (packed >> 16) as u64;
        let offset = (packed & 0xFFFF) as u64;
        (bank - config.start_bank() as u64) * config.window_size() as u64
            + (offset - config.base_addr() as u64)
    };
    let lens: Vec<usize> = {
        let mut v = Vec::new();
        let mut fps = Vec::new();
        for line in &doc.lines {
            if !fps.contains(&line.fingerprint()) {
                fps.push(line.fingerprint());
                v.push(line.len());
            }
        }
        v
    };
    for i in 1..seen.len() {
        assert!(linear(seen[i]) >= linear(seen[i - 1]) + lens[i - 1] as u64);
    }
}

#[test]
fn bank_cursor_wraps_past_window() {
    let mut cursor = BankCursor::new(1, 0xA000, 0x2000);

    // A run that fills the window exactly does not wrap.
    let a = cursor.alloc(0x2000);
    assert_eq!((a.bank, a.offset), (1, 0xA000));
    assert_eq!(
        (cursor.position().bank, cursor.position().offset),
        (1, 0xC000)
    );

    // The next byte spills into the following bank.
    let b = cursor.alloc(1);
    assert_eq!((b.bank, b.offset), (1, 0xC000));
    assert_eq!(
        (cursor.position().bank, cursor.position().offset),
        (2, 0xA001)
    );

    // A reservation larger than two windows skips whole banks.
    let mut cursor = BankCursor::new(1, 0xA000, 0x2000);
    cursor.reserve(0x5000);
    assert_eq!(
        (cursor.position().bank, cursor.position().offset),
        (3, 0xB000)
    );
}

#[test]
fn empty_line_is_its_own_entry() {
    let header = ZsmHeader::default();
    let doc = ZsmDocument {
        header,
        lines: vec![Line::new(16, Vec::new(), true, 1)],
    };
    let dict = compress_document(&doc, &PackConfig::default()).expect("failed to pack");

    assert_eq!(dict.line_count, 1);
    assert_eq!(dict.unique_count, 1);
    assert_eq!(dict.unique_payload_bytes, 0);
    // Output is the single pointer entry and nothing else.
    assert_eq!(dict.as_bytes().len(), 3);

    // The empty fingerprint is distinct from any non-empty line's.
    let empty = Line::new(0, Vec::new(), true, 1);
    let non_empty = Line::new(0, vec![0x81], true, 1);
    assert_ne!(empty.fingerprint(), non_empty.fingerprint());
}

#[test]
fn colliding_addresses_abort_instead_of_corrupting() {
    // A zero-length line and the line allocated right after it start at the
    // same address; resolving that address can no longer distinguish the
    // two entries, which must abort the pack rather than emit wrong bytes.
    let doc = ZsmDocument {
        header: ZsmHeader::default(),
        lines: vec![
            Line::new(16, Vec::new(), true, 1),
            Line::new(16, vec![0x00, 0x05, 0x81], true, 1),
        ],
    };
    assert!(matches!(
        compress_document(&doc, &PackConfig::default()),
        Err(PackError::InvariantViolation(_))
    ));
}

#[test]
fn config_invariants_are_rejected_at_construction() {
    assert!(matches!(
        PackConfig::default().with_min_pause_ticks(0),
        Err(PackError::InvalidConfig(_))
    ));
    assert!(matches!(
        PackConfig::default().with_window_size(0),
        Err(PackError::InvalidConfig(_))
    ));
    assert!(PackConfig::default().with_min_pause_ticks(4).is_ok());
}

#[test]
fn non_default_bank_and_base_shift_addresses() {
    let bytes = zsm(&[0x00, 0x05, 0x81]);
    let config = PackConfig::default()
        .with_start_bank(4)
        .with_base_addr(0x8000);
    let dict = compress(&bytes, &config).expect("failed to pack");

    let pointers = decode_pointers(&dict);
    assert_eq!(pointers[0], (4 << 16) | 0x8003);
}

#[test]
fn dropping_ext_commands_shrinks_the_dictionary() {
    let body = [0x40, 0x02, 0xAA, 0xBB, 0x81, 0x80];
    let bytes = zsm(&body);

    let kept = compress(&bytes, &PackConfig::default()).expect("failed to pack");
    let dropped = compress(
        &bytes,
        &PackConfig::default().with_keep_ext_commands(false),
    )
    .expect("failed to pack");

    assert_eq!(kept.unique_payload_bytes, 6);
    assert_eq!(dropped.unique_payload_bytes, 2);
    // No extended-command byte survives anywhere in the dropped payload
    // section.
    let payloads = &dropped.as_bytes()[dropped.line_count * 3..];
    assert_eq!(payloads, &[0x81, 0x80]);
}
