//! Error types for HTML to Markdown conversion.
//!
//! Conversion is a best-effort text transducer: malformed markup, mismatched
//! tags and unknown elements are always recovered from, never reported. The
//! only failure a caller can observe is refusing an input too large for the
//! engine's cursor arithmetic.

use thiserror::Error;

/// Inputs beyond this many bytes are rejected up front instead of risking an
/// allocation failure mid-conversion.
pub const MAX_INPUT_LEN: usize = 1 << 30;

/// Errors that can occur during conversion.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConversionError {
    /// The input exceeds [`MAX_INPUT_LEN`] bytes.
    #[error("input of {size} bytes exceeds the {limit} byte conversion limit")]
    InputTooLarge {
        /// Size of the rejected input in bytes.
        size: usize,
        /// The enforced limit in bytes.
        limit: usize,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConversionError>;
