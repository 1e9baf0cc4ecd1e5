//! Dictionary serializer.
//!
//! Emits the pointer table (one 3-byte entry per original line occurrence,
//! original order) followed by the unique payloads concatenated in
//! insertion-index order, with no intervening metadata.
use std::collections::HashMap;

use crate::binutil::PackError;
use crate::pack::bank::BankAddress;
use crate::pack::dedup::DedupTable;
use crate::zsm::Line;

/// Size of one pointer-table entry in bytes.
pub const POINTER_ENTRY_SIZE: usize = 3;

/// Assemble the output binary.
///
/// `pointers` holds one address per original line occurrence; `by_address`
/// maps each first-seen packed address back to its line index in `lines`.
/// An entry whose address has no line behind it, or resolves to a line whose
/// fingerprint disagrees with the entry's, is an internal-invariant
/// violation: the whole pack aborts rather than emitting partial or
/// silently wrong output.
pub(crate) fn write_dictionary(
    lines: &[Line],
    pointers: &[BankAddress],
    table: &DedupTable,
    by_address: &HashMap<u32, usize>,
    payload_bytes: usize,
) -> Result<Vec<u8>, PackError> {
    let mut out = Vec::with_capacity(pointers.len() * POINTER_ENTRY_SIZE + payload_bytes);

    // Pointer table. The -1 bias matches the consuming routine, which
    // pre-increments its read cursor before dereferencing.
    for address in pointers {
        let biased = address.packed().wrapping_sub(1);
        out.extend_from_slice(&biased.to_le_bytes()[..POINTER_ENTRY_SIZE]);
    }

    // Payload section, in insertion-index order.
    for (i, entry) in table.entries().iter().enumerate() {
        if entry.insert_index != i {
            return Err(PackError::InvariantViolation(format!(
                "dict entry out of insertion order: index {} holds insert_index {}",
                i, entry.insert_index
            )));
        }
        let line_index = by_address.get(&entry.address.packed()).ok_or_else(|| {
            PackError::InvariantViolation(format!(
                "no line behind address {:06X} (bank {}, offset 0x{:04X})",
                entry.address.packed(),
                entry.address.bank,
                entry.address.offset
            ))
        })?;
        let line = &lines[*line_index];
        if line.fingerprint() != entry.fingerprint {
            return Err(PackError::InvariantViolation(format!(
                "address {:06X} resolves to a line with a different fingerprint",
                entry.address.packed()
            )));
        }
        out.extend_from_slice(line.bytes());
    }

    Ok(out)
}
