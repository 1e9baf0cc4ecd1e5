//! ZSM header utilities
//!
//! This module defines `ZsmHeader` — the in-memory representation of the
//! fixed 16-byte ZSM preamble — along with parse and serialize helpers.
//!
//! The header is immutable once parsed; `to_bytes` reproduces the original
//! 16 bytes (including the two reserved bytes) for round-trip tooling.
use crate::binutil::{
    PackError, read_slice, read_u8_at, read_u16_le_at, read_u24_le_at, write_u16_le, write_u24_le,
};

/// Size of the fixed ZSM preamble in bytes.
pub const ZSM_HEADER_SIZE: usize = 16;

/// The two magic bytes at the start of every ZSM stream.
pub const ZSM_MAGIC: [u8; 2] = *b"zm";

/// The fixed 16-byte ZSM preamble.
///
/// Field layout (all multi-byte fields little-endian):
/// - 0x00: 2-byte magic `b"zm"`
/// - 0x02: format version
/// - 0x03: 24-bit loop-point offset
/// - 0x06: 24-bit PCM offset (0 = no PCM data)
/// - 0x09: FM channel mask
/// - 0x0A: 16-bit PSG channel mask
/// - 0x0C: 16-bit tick rate
/// - 0x0E: 2 reserved bytes (ignored, preserved)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ZsmHeader {
    pub version: u8,
    pub loop_offset: u32,
    pub pcm_offset: u32,
    pub fm_channel_mask: u8,
    pub psg_channel_mask: u16,
    pub tick_rate: u16,
    pub reserved: [u8; 2],
}

impl ZsmHeader {
    /// True when the stream carries PCM data after the end-of-stream marker.
    pub fn has_pcm(&self) -> bool {
        self.pcm_offset != 0
    }

    /// Serialize the header back to its fixed 16-byte form.
    pub fn to_bytes(&self) -> [u8; ZSM_HEADER_SIZE] {
        let mut buf = [0u8; ZSM_HEADER_SIZE];
        buf[0x00..0x02].copy_from_slice(&ZSM_MAGIC);
        buf[0x02] = self.version;
        write_u24_le(&mut buf, 0x03, self.loop_offset);
        write_u24_le(&mut buf, 0x06, self.pcm_offset);
        buf[0x09] = self.fm_channel_mask;
        write_u16_le(&mut buf, 0x0A, self.psg_channel_mask);
        write_u16_le(&mut buf, 0x0C, self.tick_rate);
        buf[0x0E..0x10].copy_from_slice(&self.reserved);
        buf
    }
}

/// Parse a ZSM header located at the start of `bytes`.
///
/// Validates the 2-byte magic and requires the full 16-byte preamble to be
/// present before any command parsing begins. On success returns the parsed
/// `ZsmHeader` and the header size in bytes (always [`ZSM_HEADER_SIZE`]).
pub(crate) fn parse_zsm_header(bytes: &[u8]) -> Result<(ZsmHeader, usize), PackError> {
    if bytes.len() < ZSM_HEADER_SIZE {
        return Err(PackError::HeaderTooShort {
            available: bytes.len(),
        });
    }

    let magic_slice = read_slice(bytes, 0x00, 2)?;
    if magic_slice != ZSM_MAGIC {
        let mut m: [u8; 2] = [0; 2];
        m.copy_from_slice(magic_slice);
        return Err(PackError::InvalidMagic(m));
    }

    let header = ZsmHeader {
        version: read_u8_at(bytes, 0x02)?,
        loop_offset: read_u24_le_at(bytes, 0x03)?,
        pcm_offset: read_u24_le_at(bytes, 0x06)?,
        fm_channel_mask: read_u8_at(bytes, 0x09)?,
        psg_channel_mask: read_u16_le_at(bytes, 0x0A)?,
        tick_rate: read_u16_le_at(bytes, 0x0C)?,
        reserved: {
            let s = read_slice(bytes, 0x0E, 2)?;
            let mut a = [0u8; 2];
            a.copy_from_slice(s);
            a
        },
    };

    Ok((header, ZSM_HEADER_SIZE))
}
