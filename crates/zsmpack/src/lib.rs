#![doc = include_str!("../README.md")]
//! zsmpack — bank-aware dictionary compressor for ZSM sound-chip command streams
//!
//! `zsmpack` compresses a tick-driven sound-chip command stream (the ZSM
//! format) for a bank-constrained embedded player. The stream is segmented
//! into pause-terminated lines; identical lines are stored once and a compact
//! 3-byte pointer table lets the player replay the full original sequence,
//! repeats included, by following addresses instead of re-reading duplicated
//! bytes.
//!
//! Key pieces:
//! - Stream parser: segments the command bytes into a `ZsmHeader` plus an
//!   ordered list of `Line` records (`ZsmDocument`).
//! - Dedup engine: maps each line to a SHA-256 content fingerprint and
//!   assigns each distinct payload exactly one storage slot.
//! - Bank allocator: lays unique lines into a fixed-size, paged memory
//!   window exactly as the target runtime will see them.
//! - Serializer: emits the pointer table followed by the concatenated
//!   unique payloads.
//!
//! Example: parse and compress a stream
//!
//! ```rust
//! use zsmpack::{PackConfig, compress};
//!
//! // 16-byte header followed by one PSG write and a 1-tick delay,
//! // then the end-of-stream marker.
//! let mut stream = vec![
//!     b'z', b'm', 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 60, 0, 0, 0,
//! ];
//! stream.extend_from_slice(&[0x00, 0x05, 0x81, 0x80]);
//!
//! let dict = compress(&stream, &PackConfig::default()).unwrap();
//! // two lines ([0x00, 0x05, 0x81] and the EOF marker), both unique
//! assert_eq!(dict.line_count, 2);
//! assert_eq!(dict.unique_count, 2);
//! assert_eq!(dict.as_bytes().len(), 2 * 3 + 3 + 1);
//! ```
mod binutil;
pub mod pack;
pub mod zsm;

pub use binutil::PackError;
pub use pack::{
    BankAddress, BankCursor, CompressedDictionary, DedupTable, DictEntry, POINTER_ENTRY_SIZE,
    PackConfig, compress, compress_document,
};
pub use zsm::{Line, PAUSE_TICKS_EOF, ParseOptions, ZSM_HEADER_SIZE, ZSM_MAGIC, ZsmDocument, ZsmHeader};
