//! Compression pipeline: configuration, deduplication pass and output
//! assembly.
//!
//! The pipeline is fully sequential: the parsed line list is walked once,
//! interleaving deduplication with address allocation, and the dictionary is
//! serialized only after every address is final. Re-running on the same input
//! yields byte-identical output.
use std::collections::HashMap;

use crate::binutil::PackError;
use crate::zsm::{ParseOptions, ZsmDocument};

mod bank;
mod dedup;
mod writer;

pub use bank::{BankAddress, BankCursor};
pub use dedup::{DedupTable, DictEntry};
pub use writer::POINTER_ENTRY_SIZE;

/// Compression configuration.
///
/// The consuming player is built out-of-band with the same base address,
/// window size and starting bank; a mismatch produces silently wrong
/// playback, not a detectable error. Values with invariants are validated at
/// construction time, before any input is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackConfig {
    start_bank: u32,
    base_addr: u32,
    window_size: u32,
    min_pause_ticks: u8,
    keep_ext_commands: bool,
}

impl Default for PackConfig {
    /// Conventional target defaults: bank 1, window of 0x2000 bytes based
    /// at 0xA000, every delay a line boundary, extended commands retained.
    fn default() -> Self {
        PackConfig {
            start_bank: 1,
            base_addr: 0xA000,
            window_size: 0x2000,
            min_pause_ticks: 1,
            keep_ext_commands: true,
        }
    }
}

impl PackConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memory bank the dictionary is loaded into first.
    pub fn with_start_bank(mut self, start_bank: u32) -> Self {
        self.start_bank = start_bank;
        self
    }

    /// Low address of the addressable window inside each bank.
    pub fn with_base_addr(mut self, base_addr: u32) -> Self {
        self.base_addr = base_addr;
        self
    }

    /// Number of addressable bytes per bank available to this data.
    /// A zero window is rejected (the cursor could never advance).
    pub fn with_window_size(mut self, window_size: u32) -> Result<Self, PackError> {
        if window_size == 0 {
            return Err(PackError::InvalidConfig("window_size must be >= 1".into()));
        }
        self.window_size = window_size;
        Ok(self)
    }

    /// Minimum delay tick count that terminates a line. Must be >= 1.
    pub fn with_min_pause_ticks(mut self, min_pause_ticks: u8) -> Result<Self, PackError> {
        if min_pause_ticks < 1 {
            return Err(PackError::InvalidConfig(
                "min_pause_ticks must be >= 1".into(),
            ));
        }
        self.min_pause_ticks = min_pause_ticks;
        Ok(self)
    }

    /// Whether extended commands are stored or only skipped over.
    pub fn with_keep_ext_commands(mut self, keep: bool) -> Self {
        self.keep_ext_commands = keep;
        self
    }

    pub fn start_bank(&self) -> u32 {
        self.start_bank
    }

    pub fn base_addr(&self) -> u32 {
        self.base_addr
    }

    pub fn window_size(&self) -> u32 {
        self.window_size
    }

    pub fn min_pause_ticks(&self) -> u8 {
        self.min_pause_ticks
    }

    pub fn keep_ext_commands(&self) -> bool {
        self.keep_ext_commands
    }

    /// Segmentation options for the stream parser.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            min_pause_ticks: self.min_pause_ticks,
            keep_ext_commands: self.keep_ext_commands,
        }
    }
}

/// A finished compressed dictionary plus the numbers the run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedDictionary {
    bytes: Vec<u8>,
    /// Original line occurrences (pointer-table entries).
    pub line_count: usize,
    /// Distinct payloads stored.
    pub unique_count: usize,
    /// Total bytes of the unique payload section.
    pub unique_payload_bytes: usize,
}

impl CompressedDictionary {
    /// The serialized dictionary: pointer table followed by payloads.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Parse a raw ZSM byte buffer and compress it into a dictionary.
pub fn compress(bytes: &[u8], config: &PackConfig) -> Result<CompressedDictionary, PackError> {
    let document = ZsmDocument::parse_with(bytes, &config.parse_options())?;
    compress_document(&document, config)
}

/// Compress an already parsed document into a dictionary.
///
/// One forward pass over the lines assigns every first-seen payload an
/// address (after reserving room for the pointer table itself) and records
/// one pointer per original occurrence; the serializer then emits the
/// pointer table and the unique payloads.
pub fn compress_document(
    document: &ZsmDocument,
    config: &PackConfig,
) -> Result<CompressedDictionary, PackError> {
    let mut cursor = BankCursor::new(config.start_bank, config.base_addr, config.window_size);
    // The pointer table precedes the payloads in the player's memory image.
    cursor.reserve(document.lines.len() * POINTER_ENTRY_SIZE);

    let mut table = DedupTable::new();
    let mut pointers: Vec<BankAddress> = Vec::with_capacity(document.lines.len());
    let mut by_address: HashMap<u32, usize> = HashMap::new();
    let mut unique_payload_bytes = 0usize;

    for (i, line) in document.lines.iter().enumerate() {
        let (address, first_seen) = table.record(line, &mut cursor);
        if first_seen {
            by_address.insert(address.packed(), i);
            unique_payload_bytes += line.len();
        }
        pointers.push(address);
    }

    let bytes = writer::write_dictionary(
        &document.lines,
        &pointers,
        &table,
        &by_address,
        unique_payload_bytes,
    )?;

    Ok(CompressedDictionary {
        bytes,
        line_count: document.lines.len(),
        unique_count: table.len(),
        unique_payload_bytes,
    })
}
