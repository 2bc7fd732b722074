//! Error types for ferro-varmap
//!
//! Every failure of the mapping engine is terminal for the given inputs:
//! mapping is a deterministic function of the variant and the collaborator
//! data, so errors are surfaced to the caller unchanged and never retried.
//! Each variant carries a stable [`ErrorCode`] for programmatic handling.

use std::fmt;
use thiserror::Error;

use crate::hgvs::variant::CoordinateSystem;

/// Error codes for categorizing errors
///
/// These codes can be used for programmatic error handling
/// and for documentation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Input errors (E1xxx)
    /// Variant tagged with the wrong coordinate system
    InvalidVariantType = 1001,
    /// Empty or malformed accession
    InvalidAccession = 1002,

    // Collaborator data errors (E2xxx)
    /// No alignment for a transcript/genome pair
    NoAlignment = 2001,
    /// Sequence could not be fetched
    SequenceFetch = 2002,
    /// Alignment blocks are inconsistent
    InvalidAlignment = 2003,

    // Projection errors (E3xxx)
    /// Position or interval cannot be projected
    InvalidCoordinates = 3001,
    /// Transcript has no coding sequence
    NotCodingTranscript = 3002,

    // Validation errors (E4xxx)
    /// Stated reference disagrees with the resolved reference
    ReferenceMismatch = 4001,

    // Conversion errors (E5xxx)
    /// Edit cannot be carried into the target system
    ConversionFailed = 5001,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
    /// JSON parsing error
    JsonError = 9002,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E1001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    /// Get a brief description of this error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::InvalidVariantType => "variant has the wrong coordinate system",
            ErrorCode::InvalidAccession => "invalid accession",
            ErrorCode::NoAlignment => "no alignment for accession pair",
            ErrorCode::SequenceFetch => "sequence not available",
            ErrorCode::InvalidAlignment => "inconsistent alignment",
            ErrorCode::InvalidCoordinates => "position cannot be projected",
            ErrorCode::NotCodingTranscript => "transcript is not coding",
            ErrorCode::ReferenceMismatch => "reference sequence mismatch",
            ErrorCode::ConversionFailed => "coordinate conversion failed",
            ErrorCode::IoError => "file I/O error",
            ErrorCode::JsonError => "JSON parsing error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for ferro-varmap
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FerroError {
    /// A directed conversion received a variant of another coordinate system
    #[error("Invalid variant type: expected {expected} variant, got {actual}")]
    InvalidVariantType {
        expected: CoordinateSystem,
        actual: CoordinateSystem,
    },

    /// Accession is empty or otherwise unusable
    #[error("Invalid accession: {msg}")]
    InvalidAccession { msg: String },

    /// Position or interval falls outside the aligned exons
    #[error("Invalid coordinates: {msg}")]
    InvalidCoordinates { msg: String },

    /// CDS or protein operation on a transcript without CDS bounds
    #[error("Not a coding transcript: {accession}")]
    NotCodingTranscript { accession: String },

    /// The alignment provider knows no alignment for the pair
    #[error("No alignment between {tx_ac} and {alt_ac} using method '{method}'")]
    NoAlignment {
        tx_ac: String,
        alt_ac: String,
        method: String,
    },

    /// The sequence provider could not supply the requested interval
    #[error("Failed to fetch {accession}[{start}..{end}]: {msg}")]
    SequenceFetch {
        accession: String,
        start: u64,
        end: u64,
        msg: String,
    },

    /// Alignment blocks do not tile the transcript or disagree with their CIGAR
    #[error("Invalid alignment: {msg}")]
    InvalidAlignment { msg: String },

    /// Stated reference disagrees with the reference sequence
    #[error("Reference mismatch at {location}: expected {expected}, found {found}")]
    ReferenceMismatch {
        location: String,
        expected: String,
        found: String,
    },

    /// Generic conversion failure
    #[error("Conversion error: {msg}")]
    ConversionError { msg: String },

    /// IO error (file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },

    /// JSON parsing error
    #[error("JSON error: {msg}")]
    Json { msg: String },
}

impl FerroError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            FerroError::InvalidVariantType { .. } => ErrorCode::InvalidVariantType,
            FerroError::InvalidAccession { .. } => ErrorCode::InvalidAccession,
            FerroError::InvalidCoordinates { .. } => ErrorCode::InvalidCoordinates,
            FerroError::NotCodingTranscript { .. } => ErrorCode::NotCodingTranscript,
            FerroError::NoAlignment { .. } => ErrorCode::NoAlignment,
            FerroError::SequenceFetch { .. } => ErrorCode::SequenceFetch,
            FerroError::InvalidAlignment { .. } => ErrorCode::InvalidAlignment,
            FerroError::ReferenceMismatch { .. } => ErrorCode::ReferenceMismatch,
            FerroError::ConversionError { .. } => ErrorCode::ConversionFailed,
            FerroError::Io { .. } => ErrorCode::IoError,
            FerroError::Json { .. } => ErrorCode::JsonError,
        }
    }

    /// Shorthand for an [`FerroError::InvalidCoordinates`] error
    pub(crate) fn coordinates(msg: impl Into<String>) -> Self {
        FerroError::InvalidCoordinates { msg: msg.into() }
    }
}

impl From<std::io::Error> for FerroError {
    fn from(err: std::io::Error) -> Self {
        FerroError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for FerroError {
    fn from(err: serde_json::Error) -> Self {
        FerroError::Json {
            msg: err.to_string(),
        }
    }
}
