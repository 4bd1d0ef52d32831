use crate::label::UniversalLabel;
use thiserror::Error;

/// Main error type for KLV encoding and decoding
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KlvError {
    #[error("Unknown identifier: no codec registered for {0}")]
    UnknownIdentifier(UniversalLabel),

    #[error("Malformed length: {0}")]
    MalformedLength(String),

    #[error("Identifier mismatch: expected {expected}, found {found}")]
    IdentifierMismatch {
        expected: UniversalLabel,
        found: UniversalLabel,
    },

    #[error("Checksum mismatch: computed 0x{computed:04X}, trailer holds 0x{stored:04X}")]
    ChecksumMismatch { computed: u16, stored: u16 },

    #[error("Checksum trailer missing")]
    ChecksumMissing,

    #[error("Duplicate series key: {0}")]
    DuplicateKey(u64),

    #[error("Truncated series: {0}")]
    TruncatedSeries(String),

    #[error("Length {length} does not fit the {form} length form")]
    LengthOverflow { length: usize, form: &'static str },

    #[error("Size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Registry error: {0}")]
    Registry(String),
}

/// Result type alias for KLV operations
pub type KlvResult<T> = Result<T, KlvError>;
