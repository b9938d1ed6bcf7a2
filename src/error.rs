//! Engine error type
//!
//! Only caller-contract violations are errors. Partial results (a lattice that
//! never reaches its target, a tree path shorter than the valuation, a pair of
//! generators with no relation) are ordinary return values.

use num_bigint::BigUint;
use thiserror::Error;

/// Errors returned by the quaternion engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Generator sets, splittings and tree paths need an odd prime
    #[error("{0} is not an odd prime")]
    InvalidPrime(u64),

    /// A supplied norm factorization contains a composite entry
    #[error("{0} is not prime")]
    NotPrime(u64),

    /// Text input is not an integral quaternion
    #[error("cannot parse quaternion {input:?}: {reason}")]
    Parse { input: String, reason: String },

    /// The zero quaternion has no norm factorization and no tree address
    #[error("the zero quaternion is not a valid input")]
    ZeroQuaternion,

    /// Tree path requested for a prime that does not divide the norm
    #[error("{prime} does not divide the norm {norm}")]
    PrimeDoesNotDivideNorm { prime: u64, norm: BigUint },

    /// The supplied prime powers do not multiply to the norm
    #[error("prime powers multiply to {product}, but the norm is {norm}")]
    FactorizationMismatch { norm: BigUint, product: BigUint },

    /// Trial division gave up before the norm was fully factored
    #[error("norm {norm} has a prime factor above the trial-division limit {limit}")]
    UnfactoredNorm { norm: BigUint, limit: u64 },
}

/// Result type used throughout the engine
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        EngineError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_value() {
        assert_eq!(EngineError::InvalidPrime(9).to_string(), "9 is not an odd prime");

        let err = EngineError::PrimeDoesNotDivideNorm {
            prime: 7,
            norm: BigUint::from(65u32),
        };
        assert_eq!(err.to_string(), "7 does not divide the norm 65");

        let err = EngineError::parse("1.5+i", "unexpected character '.'");
        assert!(err.to_string().contains("1.5+i"));
    }
}
