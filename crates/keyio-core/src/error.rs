//! Error types for keyio-core
//!
//! Decoding failures are the expected outcome for invalid vectors and get
//! their own taxonomy; everything else aborts a generation run.

use std::fmt;

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Decoder failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Checksum does not match the payload
    #[error("Checksum mismatch: {0}")]
    ChecksumMismatch(String),

    /// Character outside the relevant alphabet
    #[error("Invalid character: {0}")]
    InvalidCharacter(String),

    /// Payload, program or string length outside protocol bounds
    #[error("Invalid length: {0}")]
    InvalidLength(String),

    /// Bech32 string mixes upper and lower case
    #[error("Mixed case: {0}")]
    MixedCase(String),

    /// Bech32 vs bech32m constant does not fit the witness version
    #[error("Invalid checksum variant: {0}")]
    InvalidChecksumVariant(String),

    /// Human-readable prefix is not the one expected for the network
    #[error("HRP mismatch: {0}")]
    HrpMismatch(String),

    /// Witness version above 16
    #[error("Invalid witness version: {0}")]
    InvalidWitnessVersion(String),

    /// Non-canonical 5-bit to 8-bit regrouping
    #[error("Invalid padding: {0}")]
    InvalidPadding(String),
}

/// keyio-core errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Decoding failed
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Template cannot be assembled
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// Encoder rejected its input
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Generator produced something inconsistent with its own decoder
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Check if error must abort a generation run
    ///
    /// Only decode failures are recoverable; the generator uses them to
    /// classify candidates.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Decode(_))
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Decode(e) => match e {
                DecodeError::ChecksumMismatch(_) | DecodeError::InvalidChecksumVariant(_) => {
                    ErrorCategory::Checksum
                }
                DecodeError::InvalidCharacter(_) | DecodeError::MixedCase(_) => {
                    ErrorCategory::Character
                }
                DecodeError::InvalidLength(_)
                | DecodeError::InvalidPadding(_)
                | DecodeError::HrpMismatch(_)
                | DecodeError::InvalidWitnessVersion(_) => ErrorCategory::Structure,
            },
            Error::InvalidTemplate(_) => ErrorCategory::Template,
            Error::Encoding(_) | Error::Internal(_) => ErrorCategory::Internal,
            Error::Io(_) | Error::Serialization(_) => ErrorCategory::Output,
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Checksum-related decode failures
    Checksum,
    /// Alphabet and case decode failures
    Character,
    /// Structural decode failures (length, prefix, version, padding)
    Structure,
    /// Malformed template tables
    Template,
    /// Writing the document failed
    Output,
    /// Internal/system errors
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Checksum => write!(f, "Checksum"),
            ErrorCategory::Character => write!(f, "Character"),
            ErrorCategory::Structure => write!(f, "Structure"),
            ErrorCategory::Template => write!(f, "Template"),
            ErrorCategory::Output => write!(f, "Output"),
            ErrorCategory::Internal => write!(f, "Internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_detection() {
        assert!(!Error::from(DecodeError::MixedCase("x".to_string())).is_fatal());
        assert!(Error::InvalidTemplate("test".to_string()).is_fatal());
        assert!(Error::Internal("test".to_string()).is_fatal());
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            Error::from(DecodeError::ChecksumMismatch("test".to_string())).category(),
            ErrorCategory::Checksum
        );
        assert_eq!(
            Error::from(DecodeError::InvalidChecksumVariant("test".to_string())).category(),
            ErrorCategory::Checksum
        );
        assert_eq!(
            Error::from(DecodeError::MixedCase("test".to_string())).category(),
            ErrorCategory::Character
        );
        assert_eq!(
            Error::from(DecodeError::InvalidPadding("test".to_string())).category(),
            ErrorCategory::Structure
        );
        assert_eq!(
            Error::InvalidTemplate("test".to_string()).category(),
            ErrorCategory::Template
        );
    }

    #[test]
    fn test_decode_error_display() {
        let err = Error::from(DecodeError::InvalidLength("too short".to_string()));
        assert_eq!(err.to_string(), "Decode error: Invalid length: too short");
        assert_eq!(ErrorCategory::Structure.to_string(), "Structure");
    }
}
