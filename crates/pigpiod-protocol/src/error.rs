//! Protocol error types.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while building or decoding wire messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// An extension was declared with zero elements; omit it instead.
    #[error("extension must contain at least one element")]
    EmptyExtension,

    /// An extension element does not fit its declared width.
    #[error("extension value {value} does not fit a {width}-byte element")]
    ElementOutOfRange { value: u32, width: usize },

    /// A pin index outside the 32-bit bitmap range.
    #[error("pin {pin} is outside the 0-31 bitmap range")]
    InvalidPin { pin: u8 },

    /// A response header slice of the wrong size.
    #[error("response header must be {expected} bytes, got {received}")]
    InvalidHeader { expected: usize, received: usize },

    /// Extension payload does not match the length declared by the status.
    #[error("extension length mismatch: declared {declared} bytes, got {received}")]
    ExtensionLengthMismatch { declared: usize, received: usize },

    /// Extension payload is not a whole number of elements.
    #[error("extension payload of {len} bytes is not a multiple of element width {width}")]
    UnalignedExtension { len: usize, width: usize },

    /// IO error during read/write.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
