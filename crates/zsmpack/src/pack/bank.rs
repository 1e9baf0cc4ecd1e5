//! Bank-aware address allocation.
//!
//! Models the paged memory window of the target player: each bank
//! independently starts at the same base address and exposes a fixed number
//! of addressable bytes. The cursor advances linearly and wraps into the
//! next bank when the window is exhausted.

/// A (bank, in-bank offset) pair inside the target's paged memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BankAddress {
    pub bank: u32,
    pub offset: u32,
}

impl BankAddress {
    /// Pack the address into the 24-bit form the pointer table stores:
    /// bank in the high byte, in-bank offset in the two low bytes.
    pub fn packed(self) -> u32 {
        (self.bank << 16) | (self.offset & 0xFFFF)
    }
}

/// Allocation cursor over the paged memory window.
///
/// Only first-seen lines allocate; duplicate occurrences reuse the address
/// recorded at first sight and never advance the cursor.
#[derive(Debug, Clone)]
pub struct BankCursor {
    bank: u32,
    offset: u32,
    base: u32,
    window: u32,
}

impl BankCursor {
    /// Create a cursor positioned at `base_addr` in `start_bank`.
    ///
    /// `window_size` is the number of addressable bytes per bank available
    /// to this data; it must be validated non-zero by the caller.
    pub fn new(start_bank: u32, base_addr: u32, window_size: u32) -> Self {
        BankCursor {
            bank: start_bank,
            offset: base_addr,
            base: base_addr,
            window: window_size,
        }
    }

    /// Current cursor position.
    pub fn position(&self) -> BankAddress {
        BankAddress {
            bank: self.bank,
            offset: self.offset,
        }
    }

    /// Return the address where a run of `len` bytes starts and advance the
    /// cursor past it, wrapping into the next bank as needed.
    pub fn alloc(&mut self, len: usize) -> BankAddress {
        let start = self.position();
        self.advance(len);
        start
    }

    /// Advance the cursor by `len` bytes without handing out an address.
    /// Used to keep line payloads clear of the pointer table that precedes
    /// them in the output.
    pub fn reserve(&mut self, len: usize) {
        self.advance(len);
    }

    fn advance(&mut self, len: usize) {
        let mut relative = (self.offset - self.base) as u64 + len as u64;
        while relative > self.window as u64 {
            relative -= self.window as u64;
            self.bank += 1;
        }
        self.offset = relative as u32 + self.base;
    }
}
