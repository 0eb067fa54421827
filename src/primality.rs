//! Miller-Rabin probabilistic primality testing.
//!
//! The witness source is injected so callers can seed it and get
//! reproducible runs; nothing here touches a global RNG.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use rand::Rng;

use crate::arith::mod_pow;
use crate::AttackError;

/// Sample a uniform witness in [2, n-2]. Requires n > 4.
fn random_witness(n: &BigUint, rng: &mut impl Rng) -> BigUint {
    let two = BigUint::from(2u32);
    let range = n - BigUint::from(3u32); // size of [2, n-2]
    let num_bytes = n.to_bytes_be().len();
    loop {
        let mut bytes = vec![0u8; num_bytes];
        rng.fill(&mut bytes[..]);
        let val = BigUint::from_bytes_be(&bytes) % &range;
        let a = val + &two;
        if a <= n - &two {
            return a;
        }
    }
}

/// Miller-Rabin primality test with `rounds` random witnesses.
///
/// Writes n-1 = 2^s * d with d odd, then for each witness a computes
/// x = a^d mod n and squares up to s-1 times looking for n-1. A single
/// round that never reaches 1 or n-1 proves n composite and returns
/// immediately. The false-positive probability after `rounds` passing
/// rounds is at most 4^-rounds.
///
/// Numbers below 2 are outside the domain of the test and are rejected
/// with `InvalidArgument` rather than being reported composite.
pub fn miller_rabin(
    n: &BigUint,
    rounds: u32,
    rng: &mut impl Rng,
) -> Result<bool, AttackError> {
    let one = BigUint::one();
    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);

    if n < &two {
        return Err(AttackError::InvalidArgument(format!(
            "primality is undefined for {} (must be >= 2)",
            n
        )));
    }
    if *n == two || *n == three {
        return Ok(true);
    }
    // Parity guard: every other even number is composite, no witnesses needed.
    if n.is_even() {
        return Ok(false);
    }

    // n - 1 = 2^s * d with d odd
    let n_minus_1 = n - &one;
    let mut d = n_minus_1.clone();
    let mut s: u32 = 0;
    while d.is_even() {
        d >>= 1u32;
        s += 1;
    }

    'witness: for _ in 0..rounds {
        let a = random_witness(n, rng);
        let mut x = mod_pow(&a, &d, n);

        if x == one || x == n_minus_1 {
            continue 'witness;
        }

        for _ in 0..s.saturating_sub(1) {
            x = (&x * &x) % n;
            if x == n_minus_1 {
                continue 'witness;
            }
        }

        return Ok(false);
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn is_prime(n: u64, rounds: u32) -> bool {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        miller_rabin(&BigUint::from(n), rounds, &mut rng).unwrap()
    }

    #[test]
    fn test_small_primes() {
        for p in [2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47] {
            assert!(is_prime(p, 1), "{} should be prime even with 1 round", p);
            assert!(is_prime(p, 20), "{} should be prime", p);
        }
    }

    #[test]
    fn test_small_composites() {
        for c in [4u64, 6, 8, 9, 15, 21, 25, 27, 33, 35, 49, 91, 100] {
            assert!(!is_prime(c, 20), "{} should be composite", c);
        }
    }

    #[test]
    fn test_even_numbers_short_circuit() {
        // Even composites fail regardless of witness luck.
        for c in [4u64, 100, 65_536, 1_000_000] {
            assert!(!is_prime(c, 1), "{} is even, must be composite", c);
        }
        assert!(is_prime(2, 1));
    }

    #[test]
    fn test_carmichael_numbers() {
        // Fermat pseudoprimes to many bases; Miller-Rabin must reject them.
        for c in [561u64, 1105, 1729, 2465, 2821, 6601] {
            assert!(!is_prime(c, 20), "Carmichael number {} should fail", c);
        }
    }

    #[test]
    fn test_larger_primes() {
        for p in [7919u64, 104_729, 104_743, 1_000_003, 1_000_033, 2_147_483_647] {
            assert!(is_prime(p, 20), "{} should be prime", p);
        }
    }

    #[test]
    fn test_semiprimes_rejected() {
        assert!(!is_prime(3233, 20)); // 53 * 61
        assert!(!is_prime(8051, 20)); // 83 * 97
        assert!(!is_prime(104_729 * 104_743, 20));
    }

    #[test]
    fn test_below_two_is_invalid() {
        let mut rng = StdRng::seed_from_u64(1);
        for n in [0u64, 1] {
            let err = miller_rabin(&BigUint::from(n), 5, &mut rng).unwrap_err();
            assert!(matches!(err, AttackError::InvalidArgument(_)));
        }
    }

    #[test]
    fn test_deterministic_with_same_seed() {
        let n = BigUint::from(1_000_003u64);
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        // Same seed, same witnesses, same verdict.
        assert_eq!(
            miller_rabin(&n, 10, &mut a).unwrap(),
            miller_rabin(&n, 10, &mut b).unwrap()
        );
    }
}
