//! Attack orchestration: factor, verify, invert, decrypt.

use std::time::{Duration, Instant};

use num_bigint::BigUint;
use num_traits::One;
use rand::Rng;

use crate::arith::{mod_inverse, mod_pow};
use crate::fermat::{factorize, Factorization, SearchParams};
use crate::primality::miller_rabin;
use crate::{AttackError, DEFAULT_MAX_STEPS, DEFAULT_ROUNDS};

/// Tuning knobs for one attack invocation.
#[derive(Debug, Clone)]
pub struct AttackParams {
    pub miller_rabin_rounds: u32,
    pub max_search_steps: u64,
}

impl Default for AttackParams {
    fn default() -> Self {
        Self {
            miller_rabin_rounds: DEFAULT_ROUNDS,
            max_search_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// Everything recovered by a successful attack.
///
/// The factor pair, totient and private exponent are diagnostic
/// by-products; `plaintext` is the contract's actual output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovery {
    pub p: BigUint,
    pub q: BigUint,
    pub phi: BigUint,
    pub d: BigUint,
    pub plaintext: BigUint,
    pub duration: Duration,
}

/// Recover the plaintext of `ciphertext` under the public key `(e, n)`.
///
/// Sequence: split n with the close-factor search, verify both factors
/// with Miller-Rabin, derive phi = (p-1)(q-1), invert e modulo phi, and
/// apply the private exponent to the ciphertext. Every way the attack
/// can fail surfaces as a distinct `AttackError`; a returned `Recovery`
/// always carries a genuine decryption.
pub fn attack(
    e: &BigUint,
    n: &BigUint,
    ciphertext: &BigUint,
    params: &AttackParams,
    rng: &mut impl Rng,
) -> Result<Recovery, AttackError> {
    let one = BigUint::one();
    if e < &one {
        return Err(AttackError::InvalidArgument(
            "public exponent e must be >= 1".into(),
        ));
    }
    if n < &BigUint::from(2u32) {
        return Err(AttackError::InvalidArgument(
            "modulus n must be >= 2".into(),
        ));
    }

    let start = Instant::now();
    let search = SearchParams {
        max_steps: params.max_search_steps,
        primality_rounds: params.miller_rabin_rounds,
    };

    let (p, q) = match factorize(n, &search, rng)? {
        Factorization::Prime => {
            log::info!("modulus {} is prime; the attack does not apply", n);
            return Err(AttackError::PrimeModulus);
        }
        Factorization::Split { p, q } => (p, q),
    };
    log::info!("factored n: p = {}, q = {}", p, q);

    // The search guarantees p * q == n, not that either factor is prime.
    // phi = (p-1)(q-1) is only Euler's totient for a true semiprime.
    if !miller_rabin(&p, params.miller_rabin_rounds, rng)?
        || !miller_rabin(&q, params.miller_rabin_rounds, rng)?
    {
        log::info!("split {} * {} is not a pair of primes", p, q);
        return Err(AttackError::CompositeFactors);
    }

    let phi = (&p - &one) * (&q - &one);
    log::debug!("phi = {}", phi);

    let d = mod_inverse(e, &phi).ok_or(AttackError::NoInverseExists)?;
    log::info!("private exponent d = {}", d);

    let plaintext = mod_pow(ciphertext, &d, n);

    Ok(Recovery {
        p,
        q,
        phi,
        d,
        plaintext,
        duration: start.elapsed(),
    })
}
