//! Range errors shared by every span-carrying type.

use thiserror::Error;

/// Errors raised when a range is malformed or a lookup falls outside its container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// `end` would lie before `begin`.
    #[error("inverted span: begin {begin} is after end {end}")]
    Inverted { begin: usize, end: usize },

    /// Indexed access past the end of a sequence.
    #[error("index {index} out of bounds for {len} elements")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The range does not fall inside the reconstructed text.
    #[error("range {begin}..{end} lies outside the text ({text_begin}..{text_end})")]
    OutsideText {
        begin: usize,
        end: usize,
        text_begin: usize,
        text_end: usize,
    },

    /// The range cuts through a multi-byte character.
    #[error("range {begin}..{end} does not fall on character boundaries")]
    NotCharBoundary { begin: usize, end: usize },

    /// `begin + length` does not fit in a byte offset.
    #[error("range starting at {begin} with length {length} overflows")]
    Overflow { begin: usize, length: usize },
}
