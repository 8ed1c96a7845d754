//! Error types for the miner.
//!
//! Running out of iterations is not an error: it is reported through
//! [`MiningResult`](crate::MiningResult) with `found() == false`.

use thiserror::Error;

/// Why a hex string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodingFault {
    /// The string contained no characters at all.
    #[error("empty string")]
    Empty,
    /// The string had an odd number of characters.
    #[error("odd length {0}")]
    OddLength(usize),
    /// The string was not the required length.
    #[error("expected {expected} characters, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    /// A character outside `[0-9a-fA-F]`.
    #[error("invalid character {c:?} at index {index}")]
    InvalidCharacter { c: char, index: usize },
}

/// Why a mining parameter was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArgumentFault {
    /// Difficulty above the longest supported needle.
    #[error("difficulty {difficulty} exceeds maximum {max}")]
    DifficultyOutOfRange { difficulty: usize, max: usize },
    /// An iteration budget of zero can never succeed.
    #[error("max_iterations must be greater than zero")]
    ZeroIterations,
}

/// Errors raised before the mining loop starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MinerError {
    /// A fingerprint or nonce was not well-formed hex of the right length.
    #[error("invalid {field}: {fault}")]
    InvalidEncoding {
        field: &'static str,
        fault: EncodingFault,
    },
    /// A numeric parameter was out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentFault),
}

impl MinerError {
    pub(crate) fn encoding(field: &'static str, fault: EncodingFault) -> Self {
        MinerError::InvalidEncoding { field, fault }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_display_names_field() {
        let err = MinerError::encoding(
            "block hash",
            EncodingFault::InvalidCharacter { c: 'z', index: 3 },
        );
        assert_eq!(
            err.to_string(),
            "invalid block hash: invalid character 'z' at index 3"
        );
    }

    #[test]
    fn test_argument_fault_converts() {
        let err: MinerError = ArgumentFault::ZeroIterations.into();
        assert!(matches!(
            err,
            MinerError::InvalidArgument(ArgumentFault::ZeroIterations)
        ));
    }
}
