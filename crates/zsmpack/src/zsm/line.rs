//! The `Line` type: a pause-terminated run of command bytes.
//!
//! A line is the unit of deduplication and addressing. It is produced once by
//! the parser and never mutated; its SHA-256 content fingerprint is computed
//! on first use and cached.
use std::sync::OnceLock;

use sha2::{Digest, Sha256};

/// Pause-tick value recorded for a line terminated by the end-of-stream
/// marker rather than an explicit delay.
pub const PAUSE_TICKS_EOF: i32 = -1;

/// A maximal run of command bytes ending in a pause, delay or the
/// end-of-stream marker.
///
/// The payload holds the verbatim opcode bytes exactly as the player must
/// replay them. Two lines with identical payloads share one storage slot in
/// the compressed dictionary; the fingerprint is the dedup key.
#[derive(Debug, Clone)]
pub struct Line {
    start_offset: usize,
    bytes: Vec<u8>,
    ends_on_pause: bool,
    pause_ticks: i32,
    fingerprint: OnceLock<[u8; 32]>,
}

impl Line {
    /// Create a line from its start offset in the original stream, its
    /// verbatim payload bytes and its terminating-pause annotation.
    pub fn new(start_offset: usize, bytes: Vec<u8>, ends_on_pause: bool, pause_ticks: i32) -> Self {
        Line {
            start_offset,
            bytes,
            ends_on_pause,
            pause_ticks,
            fingerprint: OnceLock::new(),
        }
    }

    /// Absolute offset of the first payload byte in the original stream.
    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    /// The verbatim payload bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a length-0 line. An empty payload is legal; it fingerprints
    /// to the SHA-256 empty-message digest, distinct from any non-empty line.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True when the line was terminated by a pause or the end-of-stream
    /// marker (false only for a trailing, terminator-less accumulator).
    pub fn ends_on_pause(&self) -> bool {
        self.ends_on_pause
    }

    /// Tick count of the terminating delay; [`PAUSE_TICKS_EOF`] when the
    /// line was terminated by the end-of-stream marker.
    pub fn pause_ticks(&self) -> i32 {
        self.pause_ticks
    }

    /// SHA-256 digest of the payload bytes, computed once and cached.
    pub fn fingerprint(&self) -> [u8; 32] {
        *self.fingerprint.get_or_init(|| {
            let mut hasher = Sha256::new();
            hasher.update(&self.bytes);
            hasher.finalize().into()
        })
    }
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        self.start_offset == other.start_offset
            && self.bytes == other.bytes
            && self.ends_on_pause == other.ends_on_pause
            && self.pause_ticks == other.pause_ticks
    }
}

impl Eq for Line {}
