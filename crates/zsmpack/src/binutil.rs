//! Utilities used by the parser and packer: error type and byte readers/writers.
use std::fmt;

/// Error type returned by the parsing and packing routines in this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackError {
    /// The two magic bytes at the start of the stream did not match `b"zm"`.
    ///
    /// The contained array is the raw 2 bytes that were read.
    InvalidMagic([u8; 2]),

    /// The input ended before the fixed 16-byte header was complete.
    ///
    /// `available` is the number of bytes that were present.
    HeaderTooShort { available: usize },

    /// A command declared more payload bytes than remain in the input.
    ///
    /// - `offset` is the index where the read was attempted.
    /// - `needed` is the number of bytes required for the operation.
    /// - `available` is the number of bytes remaining from `offset`.
    TruncatedStream {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A configuration value was rejected at construction time.
    ///
    /// The contained `String` names the offending value.
    InvalidConfig(String),

    /// Internal bookkeeping became inconsistent while assembling the output.
    ///
    /// This is a defect, not an input error; the pack is aborted rather than
    /// emitting a partial or silently wrong dictionary.
    InvariantViolation(String),
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackError::InvalidMagic(m) => {
                write!(f, "invalid magic: {:02X?} (expected \"zm\")", m)
            }
            PackError::HeaderTooShort { available } => {
                write!(f, "header too short: {} bytes (need 16)", available)
            }
            PackError::TruncatedStream {
                offset,
                needed,
                available,
            } => write!(
                f,
                "truncated stream at 0x{:X} (needed {} bytes, available {})",
                offset, needed, available
            ),
            PackError::InvalidConfig(s) => write!(f, "invalid config: {}", s),
            PackError::InvariantViolation(s) => write!(f, "invariant violation: {}", s),
        }
    }
}

impl std::error::Error for PackError {}

/// Read a single byte from `bytes` at `off`.
///
/// Returns `Err(PackError::TruncatedStream)` when `off` is out of bounds.
pub(crate) fn read_u8_at(bytes: &[u8], off: usize) -> Result<u8, PackError> {
    if bytes.len() <= off {
        return Err(PackError::TruncatedStream {
            offset: off,
            needed: 1,
            available: 0,
        });
    }
    Ok(bytes[off])
}

/// Read a 16-bit little-endian unsigned integer from `bytes` at `off`.
pub(crate) fn read_u16_le_at(bytes: &[u8], off: usize) -> Result<u16, PackError> {
    if bytes.len() < off + 2 {
        return Err(PackError::TruncatedStream {
            offset: off,
            needed: 2,
            available: bytes.len().saturating_sub(off),
        });
    }
    let mut tmp: [u8; 2] = [0; 2];
    tmp.copy_from_slice(&bytes[off..off + 2]);
    Ok(u16::from_le_bytes(tmp))
}

/// Read a 24-bit little-endian unsigned integer from `bytes` at `off`.
///
/// The value is returned widened to a `u32`.
pub(crate) fn read_u24_le_at(bytes: &[u8], off: usize) -> Result<u32, PackError> {
    if bytes.len() < off + 3 {
        return Err(PackError::TruncatedStream {
            offset: off,
            needed: 3,
            available: bytes.len().saturating_sub(off),
        });
    }
    let b0 = bytes[off] as u32;
    let b1 = bytes[off + 1] as u32;
    let b2 = bytes[off + 2] as u32;
    Ok(b0 | (b1 << 8) | (b2 << 16))
}

/// Return a borrowed slice of length `len` starting at `off` from `bytes`.
pub(crate) fn read_slice(bytes: &[u8], off: usize, len: usize) -> Result<&[u8], PackError> {
    if bytes.len() < off + len {
        return Err(PackError::TruncatedStream {
            offset: off,
            needed: len,
            available: bytes.len().saturating_sub(off),
        });
    }
    Ok(&bytes[off..off + len])
}

/// Write a 16-bit little-endian unsigned integer `v` into `buf` at `off`.
///
/// Callers must ensure the destination range is valid.
pub(crate) fn write_u16_le(buf: &mut [u8], off: usize, v: u16) {
    buf[off..off + 2].copy_from_slice(&v.to_le_bytes());
}

/// Write the low 24 bits of `v` into `buf` at `off`, little-endian.
///
/// Callers must ensure the destination range is valid.
pub(crate) fn write_u24_le(buf: &mut [u8], off: usize, v: u32) {
    buf[off..off + 3].copy_from_slice(&v.to_le_bytes()[..3]);
}
