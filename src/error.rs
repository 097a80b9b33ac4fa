use thiserror::Error;

/// I/O errors raised by a [`Source`](crate::io::Source).
///
/// These are the only failures that stop a decoder early. Malformed file
/// content never produces an error value; it is recorded as a diagnostic.
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// The file could not be opened or its length queried
    #[error("Cannot open {path}: {message}")]
    Open { path: String, message: String },

    /// Requested range exceeds source bounds
    #[error("Range out of bounds: requested {requested} bytes at offset {offset}, size is {size}")]
    RangeOutOfBounds {
        offset: u64,
        requested: u64,
        size: u64,
    },

    /// The underlying read failed
    #[error("Read failed at offset {offset}: {message}")]
    Read { offset: u64, message: String },
}

/// Errors surfaced by the file dispatch layer.
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    /// I/O error while opening or reading the file
    #[error("I/O error: {0}")]
    Io(#[from] IoError),
}
