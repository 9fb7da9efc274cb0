//! Error types for status decoding

use thiserror::Error;

use crate::DataField;

/// Result type for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors raised when a status dump does not match its declared field table
///
/// These are contract violations between a device's firmware and the table
/// declared for its hardware type. They are reported, never papered over
/// with a default value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// A field position points past the end of the status
    #[error("field position {position} is out of range for a status of {len} tokens")]
    FieldOutOfRange { position: usize, len: usize },

    /// A field was declared with no token positions
    #[error("field has no token positions")]
    EmptyField,

    /// The concatenated tokens are not a hexadecimal literal
    #[error("invalid hex literal '{literal}'")]
    InvalidHex { literal: String },

    /// The field has more hex digits than fit in 64 bits
    #[error("field of {digits} hex digits does not fit in 64 bits")]
    FieldTooWide { digits: usize },

    /// The hardware's field table does not declare the requested field
    #[error("field table '{table}' has no '{field}' field")]
    MissingField {
        field: DataField,
        table: &'static str,
    },
}
