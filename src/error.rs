//! Error types for TUN/TAP framing and I/O

use std::io;
use thiserror::Error;

/// Errors surfaced by header access, frame decoding and interface I/O
#[derive(Debug, Error)]
pub enum TunTapError {
    /// Error from the underlying device (open, read, write or close)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Fewer bytes were read than the active framing mode requires
    #[error("Short frame: need at least {needed} bytes, got {got}")]
    ShortFrame { needed: usize, got: usize },

    /// The header's payload length disagrees with the bytes that followed it
    #[error("Malformed header: declared payload length {declared}, actual {actual}")]
    MalformedHeader { declared: usize, actual: usize },

    /// An address field was assigned from a slice of the wrong length
    #[error("Size mismatch: expected {expected} bytes, got {got}")]
    SizeMismatch { expected: usize, got: usize },

    /// Header-validated framing was asked to encode a packet without a header
    #[error("Missing header: header-validated framing requires a fixed header")]
    MissingHeader,

    /// The device accepted fewer bytes than the encoded frame holds
    #[error("Short write: wrote {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },
}

/// Result type alias using TunTapError.
pub type Result<T> = std::result::Result<T, TunTapError>;
