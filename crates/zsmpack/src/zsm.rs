//! ZSM stream parsing and document handling.
//!
//! This module exposes the ZSM header, line and document types and the
//! segmentation options used by the stream parser.
mod document;
mod header;
mod line;
pub mod parser;

pub use document::ZsmDocument;
pub use header::{ZSM_HEADER_SIZE, ZSM_MAGIC, ZsmHeader};
pub use line::{Line, PAUSE_TICKS_EOF};
pub use parser::ParseOptions;
