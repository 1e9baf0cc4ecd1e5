//! ZSM stream parser
//!
//! This module segments a raw ZSM byte buffer into a [`ZsmHeader`] plus an
//! ordered sequence of pause-terminated [`Line`] records.
//!
//! The parser is a state machine over the first byte of each command,
//! starting immediately after the fixed 16-byte header:
//!
//! | Byte range  | Meaning                                   |
//! |-------------|-------------------------------------------|
//! | 0x00..=0x3F | PSG register write (opcode + 1 data byte) |
//! | 0x40        | extended command (header byte, low 6 bits = payload length) |
//! | 0x41..=0x7F | FM register write (low 6 bits = register/value pair count) |
//! | 0x80        | end-of-stream marker                      |
//! | 0x81..=0xFF | delay (low 7 bits = tick count)           |
//!
//! Command bytes accumulate into a reusable scratch buffer; a delay whose
//! tick count reaches the configured minimum-pause threshold (or the
//! end-of-stream marker) finalizes the accumulator into an immutable `Line`.
//! Bytes after the end-of-stream marker (PCM data) are not interpreted.
//!
//! The parser performs strict validation and returns `PackError` for invalid
//! input (bad magic, short header, commands that declare more bytes than
//! remain).
use crate::binutil::{PackError, read_slice, read_u8_at};
use crate::zsm::document::ZsmDocument;
use crate::zsm::header::parse_zsm_header;
use crate::zsm::line::{Line, PAUSE_TICKS_EOF};

/// Parser knobs that affect how the command stream is segmented.
///
/// Both are first-class configuration: the minimum-pause threshold decides
/// which delays act as line boundaries, and extended-command retention
/// decides whether `0x40` commands are stored or only skipped over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Minimum delay tick count that terminates a line. Must be >= 1;
    /// smaller delays keep accumulating into the current line.
    pub min_pause_ticks: u8,
    /// When false, extended commands are consumed from the input (offsets
    /// still advance past them) but none of their bytes are stored.
    pub keep_ext_commands: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            min_pause_ticks: 1,
            keep_ext_commands: true,
        }
    }
}

impl ParseOptions {
    /// Validate the options, rejecting a zero minimum-pause threshold
    /// before any input is touched.
    pub fn validate(&self) -> Result<(), PackError> {
        if self.min_pause_ticks < 1 {
            return Err(PackError::InvalidConfig(
                "min_pause_ticks must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

/// Parse a complete ZSM stream from a byte slice into a `ZsmDocument`.
///
/// High-level parsing steps:
/// 1. Parse and validate the fixed 16-byte header with `parse_zsm_header`.
/// 2. Walk the command stream, accumulating command bytes into a scratch
///    buffer and snapshotting it into a `Line` at each qualifying pause.
/// 3. Stop at the end-of-stream marker (`0x80`); anything after it (for
///    example PCM sample data) is left uninterpreted.
///
/// If the input ends without an end-of-stream marker while the accumulator
/// holds bytes, the trailing run is finalized as a line with no terminating
/// pause (pause flag = false, ticks = 0) so every parsed byte stays
/// addressable.
pub(crate) fn parse_zsm(bytes: &[u8], options: &ParseOptions) -> Result<ZsmDocument, PackError> {
    options.validate()?;

    let (header, mut off) = parse_zsm_header(bytes)?;

    let mut lines: Vec<Line> = Vec::new();
    let mut scratch: Vec<u8> = Vec::new();
    let mut line_start = off;
    let mut eof_seen = false;

    while off < bytes.len() {
        let opcode = read_u8_at(bytes, off)?;
        match opcode {
            // PSG register write: opcode selects the register, one data byte follows.
            0x00..=0x3F => {
                let value = read_u8_at(bytes, off + 1)?;
                scratch.push(opcode);
                scratch.push(value);
                off += 2;
            }
            // Extended command: the header byte's low 6 bits give the payload length.
            0x40 => {
                let ext_header = read_u8_at(bytes, off + 1)?;
                let n = (ext_header & 0x3F) as usize;
                let payload = read_slice(bytes, off + 2, n)?;
                if options.keep_ext_commands {
                    scratch.push(opcode);
                    scratch.push(ext_header);
                    scratch.extend_from_slice(payload);
                }
                off += 2 + n;
            }
            // FM register write: low 6 bits give the register/value pair count.
            0x41..=0x7F => {
                let pairs = (opcode & 0x3F) as usize;
                let payload = read_slice(bytes, off + 1, pairs * 2)?;
                scratch.push(opcode);
                scratch.extend_from_slice(payload);
                off += 1 + pairs * 2;
            }
            // End-of-stream marker. PCM data may follow; this parser stops here.
            0x80 => {
                scratch.push(opcode);
                off += 1;
                finalize_line(&mut lines, &mut scratch, line_start, true, PAUSE_TICKS_EOF);
                eof_seen = true;
                break;
            }
            // Delay: low 7 bits give the tick count. A delay at or above the
            // minimum-pause threshold terminates the current line.
            0x81..=0xFF => {
                let ticks = opcode & 0x7F;
                scratch.push(opcode);
                off += 1;
                if ticks >= options.min_pause_ticks {
                    finalize_line(&mut lines, &mut scratch, line_start, true, ticks as i32);
                    line_start = off;
                }
            }
        }
    }

    // Terminator-less input: keep the trailing run addressable.
    if !eof_seen && !scratch.is_empty() {
        finalize_line(&mut lines, &mut scratch, line_start, false, 0);
    }

    Ok(ZsmDocument { header, lines })
}

/// Snapshot the scratch accumulator into an immutable `Line` and clear it.
///
/// The drained payload is an owned, independent byte sequence; the scratch
/// buffer is reused for the next line with no aliasing between the two.
fn finalize_line(
    lines: &mut Vec<Line>,
    scratch: &mut Vec<u8>,
    start_offset: usize,
    ends_on_pause: bool,
    pause_ticks: i32,
) {
    let payload = std::mem::take(scratch);
    lines.push(Line::new(start_offset, payload, ends_on_pause, pause_ticks));
}
