//! ZSM document type
//!
//! `ZsmDocument` is the in-memory representation of a parsed ZSM stream:
//! the fixed header plus the ordered sequence of pause-terminated lines.
//! Conversion from bytes is provided via `TryFrom<&[u8]>` (with default
//! [`ParseOptions`]) and `ZsmDocument::parse_with` for explicit options.
use std::convert::TryFrom;

use crate::binutil::PackError;
use crate::zsm::header::ZsmHeader;
use crate::zsm::line::Line;
use crate::zsm::parser::{ParseOptions, parse_zsm};

/// A parsed ZSM stream: header plus ordered line sequence.
///
/// The line order is the original encounter order and is what the pointer
/// table of the compressed dictionary reproduces.
#[derive(Debug, Clone, PartialEq)]
pub struct ZsmDocument {
    pub header: ZsmHeader,
    pub lines: Vec<Line>,
}

impl ZsmDocument {
    /// Parse a ZSM byte buffer with explicit segmentation options.
    pub fn parse_with(bytes: &[u8], options: &ParseOptions) -> Result<Self, PackError> {
        parse_zsm(bytes, options)
    }

    /// Return an iterator over `Line` references in original order.
    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }

    /// Total payload bytes across all lines (before deduplication).
    pub fn total_payload_bytes(&self) -> usize {
        self.lines.iter().map(|l| l.len()).sum()
    }
}

/// Attempt to convert a raw ZSM byte slice into a `ZsmDocument` using the
/// default segmentation options.
impl TryFrom<&[u8]> for ZsmDocument {
    type Error = PackError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        parse_zsm(bytes, &ParseOptions::default())
    }
}

/// Iterate over lines by reference: `for line in &doc { ... }`.
impl<'a> IntoIterator for &'a ZsmDocument {
    type Item = &'a Line;
    type IntoIter = std::slice::Iter<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Consume the document and iterate its lines by value.
impl IntoIterator for ZsmDocument {
    type Item = Line;
    type IntoIter = std::vec::IntoIter<Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.into_iter()
    }
}
