//! Error types for g1mport-common.

use thiserror::Error;

/// Common error type for binary reading and writing.
#[derive(Debug, Error)]
pub enum Error {
    /// A read ran past the end of the buffer.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// A value does not fit the field it is written to.
    #[error("value {value} does not fit in a {bits}-bit field")]
    Overflow { value: u64, bits: u32 },
}

/// Result type for binary reading and writing.
pub type Result<T> = std::result::Result<T, Error>;
