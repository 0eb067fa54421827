//! Fermat close-factor search.
//!
//! Walks x upward from ceil(sqrt(n)) looking for x^2 - n to be a perfect
//! square y^2; when it is, n = (x - y)(x + y). The walk length is about
//! (p + q)/2 - sqrt(n), so this splits n quickly only when its two
//! factors are numerically close. That narrowness is inherent to the
//! method, not a defect; the step cap turns the bad case into a clean
//! `ResourceExceeded` instead of an unbounded spin.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use rand::Rng;

use crate::arith::{ceil_sqrt, is_perfect_square};
use crate::primality::miller_rabin;
use crate::{AttackError, DEFAULT_MAX_STEPS, DEFAULT_ROUNDS};

/// Outcome of a factorization attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Factorization {
    /// The input itself passed the primality test; no split exists.
    Prime,
    /// A two-factor split with p * q == n and p <= q.
    Split { p: BigUint, q: BigUint },
}

/// Knobs for the close-factor search.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Give up (with `ResourceExceeded`) after this many increments of x.
    pub max_steps: u64,
    /// Miller-Rabin rounds for the "already prime" pre-check.
    pub primality_rounds: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            primality_rounds: DEFAULT_ROUNDS,
        }
    }
}

/// Factor n into two factors whose product is exactly n.
///
/// Prime n is reported as `Factorization::Prime` so callers can treat it
/// distinctly from a genuine split. Even n short-circuits to (2, n/2);
/// the square-difference walk only applies to odd composites.
pub fn factorize(
    n: &BigUint,
    params: &SearchParams,
    rng: &mut impl Rng,
) -> Result<Factorization, AttackError> {
    let one = BigUint::one();
    let two = BigUint::from(2u32);

    if n < &two {
        return Err(AttackError::InvalidArgument(format!(
            "cannot factor {} (must be >= 2)",
            n
        )));
    }

    if miller_rabin(n, params.primality_rounds, rng)? {
        return Ok(Factorization::Prime);
    }

    // n is composite from here on. Fermat's recurrence assumes odd n.
    if n.is_even() {
        return Ok(Factorization::Split {
            p: two.clone(),
            q: n / &two,
        });
    }

    let mut x = ceil_sqrt(n);
    let mut steps: u64 = 0;

    loop {
        // Non-modular difference: x started at ceil(sqrt(n)), so x^2 >= n.
        let t = &x * &x - n;
        if is_perfect_square(&t) {
            let y = t.sqrt();
            let p = &x - &y;
            let q = &x + &y;
            debug_assert_eq!(&p * &q, *n);
            log::debug!("split after {} steps: {} = {} * {}", steps, n, p, q);
            return Ok(Factorization::Split { p, q });
        }

        steps += 1;
        if steps >= params.max_steps {
            log::debug!("no square found for {} within {} steps", n, steps);
            return Err(AttackError::ResourceExceeded { steps });
        }
        x += &one;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn run(n: u64, params: &SearchParams) -> Result<Factorization, AttackError> {
        let mut rng = StdRng::seed_from_u64(7);
        factorize(&BigUint::from(n), params, &mut rng)
    }

    fn assert_split(n: u64, p: u64, q: u64) {
        match run(n, &SearchParams::default()).unwrap() {
            Factorization::Split { p: fp, q: fq } => {
                assert_eq!(fp, BigUint::from(p), "p of {}", n);
                assert_eq!(fq, BigUint::from(q), "q of {}", n);
                assert_eq!(fp * fq, BigUint::from(n));
            }
            Factorization::Prime => panic!("{} should split", n),
        }
    }

    #[test]
    fn test_splits_close_semiprimes() {
        assert_split(3233, 53, 61);
        assert_split(8051, 83, 97);
        assert_split(143, 11, 13);
        assert_split(1_000_003 * 1_000_033, 1_000_003, 1_000_033);
        assert_split(104_729 * 104_743, 104_729, 104_743);
    }

    #[test]
    fn test_splits_odd_composites_with_small_offset() {
        // 85 = 5 * 17 needs one increment past ceil(sqrt(85)) = 10.
        assert_split(85, 5, 17);
        assert_split(21, 3, 7);
    }

    #[test]
    fn test_perfect_square_input() {
        // x starts exactly at sqrt(n), t = 0 is a perfect square.
        assert_split(9, 3, 3);
        assert_split(104_729 * 104_729, 104_729, 104_729);
    }

    #[test]
    fn test_prime_input_reported_as_prime() {
        for p in [2u64, 3, 61, 104_729, 1_000_003] {
            assert_eq!(run(p, &SearchParams::default()).unwrap(), Factorization::Prime);
        }
    }

    #[test]
    fn test_even_input_short_circuits() {
        match run(2 * 1_000_003, &SearchParams::default()).unwrap() {
            Factorization::Split { p, q } => {
                assert_eq!(p, BigUint::from(2u64));
                assert_eq!(q, BigUint::from(1_000_003u64));
            }
            Factorization::Prime => panic!("even composite should split"),
        }
    }

    #[test]
    fn test_far_apart_factors_hit_step_cap() {
        // 101 * 100003: the walk would need ~47k increments; cap it early.
        let params = SearchParams {
            max_steps: 1000,
            ..SearchParams::default()
        };
        let err = run(101 * 100_003, &params).unwrap_err();
        assert_eq!(err, AttackError::ResourceExceeded { steps: 1000 });
    }

    #[test]
    fn test_input_below_two_is_invalid() {
        for n in [0u64, 1] {
            let err = run(n, &SearchParams::default()).unwrap_err();
            assert!(matches!(err, AttackError::InvalidArgument(_)));
        }
    }
}
