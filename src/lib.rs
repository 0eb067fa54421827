//! Factoring attack on RSA keys whose modulus splits into two close primes.
//!
//! Given a public key `(e, n)` and a ciphertext, the attack factors `n`
//! with a Fermat-style close-factor search, verifies both factors with
//! Miller-Rabin, derives the private exponent `d` from Euler's totient,
//! and decrypts the ciphertext with a two-accumulator exponentiation
//! ladder. All arithmetic is arbitrary-precision (`BigUint`).
//!
//! The search only terminates quickly when the two prime factors of `n`
//! are numerically close; it is bounded by a configurable step cap and
//! reports `ResourceExceeded` instead of spinning forever.

use std::fmt;

pub mod arith;
pub mod attack;
pub mod fermat;
pub mod primality;

pub use attack::{attack, AttackParams, Recovery};
pub use fermat::{factorize, Factorization, SearchParams};

/// Default Miller-Rabin round count. Far more than needed for a
/// false-positive probability below 4^-64, but the attack is dominated
/// by the factor search, so the extra rounds cost nothing noticeable.
pub const DEFAULT_ROUNDS: u32 = 1000;

/// Default cap on Fermat search steps before giving up.
pub const DEFAULT_MAX_STEPS: u64 = 1_000_000;

/// Tagged failure of any stage of the attack.
///
/// Every failure mode is a distinct variant so callers can tell
/// "this key is not vulnerable" apart from "the computation was cut
/// short" without inspecting a sentinel value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttackError {
    /// Malformed input to a primitive (e.g. primality of a number below 2).
    InvalidArgument(String),
    /// gcd(e, phi) != 1, so no private exponent exists for this key.
    NoInverseExists,
    /// The factor search hit its step cap without finding a square.
    ResourceExceeded { steps: u64 },
    /// A discovered factor failed the primality check; n is not a semiprime.
    CompositeFactors,
    /// The modulus itself is prime; there is nothing to split.
    PrimeModulus,
}

impl fmt::Display for AttackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttackError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            AttackError::NoInverseExists => {
                write!(f, "no modular inverse exists (gcd != 1)")
            }
            AttackError::ResourceExceeded { steps } => {
                write!(f, "factor search exceeded {} steps without a split", steps)
            }
            AttackError::CompositeFactors => {
                write!(f, "discovered factors are not both prime")
            }
            AttackError::PrimeModulus => write!(f, "modulus is prime, nothing to factor"),
        }
    }
}

impl std::error::Error for AttackError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            AttackError::ResourceExceeded { steps: 42 }.to_string(),
            "factor search exceeded 42 steps without a split"
        );
        assert!(AttackError::InvalidArgument("n must be >= 2".into())
            .to_string()
            .contains("n must be >= 2"));
    }
}
