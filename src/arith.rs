//! Arbitrary-precision modular arithmetic primitives.
//!
//! Everything operates on `BigUint`; negative intermediate values in the
//! extended Euclid are tracked with explicit sign flags.

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Modular exponentiation: base^exponent mod modulus.
///
/// Left-to-right binary ladder over the exponent's bits, keeping two
/// accumulators that are both updated on every bit so the per-bit work
/// is the same on either branch. `x` holds the result once all bits are
/// consumed, most significant first.
pub fn mod_pow(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    if modulus.is_zero() || modulus.is_one() {
        return BigUint::zero();
    }
    if exponent.is_zero() {
        return BigUint::one();
    }

    let mut x = BigUint::one();
    let mut y = base % modulus;

    for i in (0..exponent.bits()).rev() {
        let bit = (exponent >> i) & BigUint::one();
        if bit.is_zero() {
            y = (&x * &y) % modulus;
            x = (&x * &x) % modulus;
        } else {
            x = (&x * &y) % modulus;
            y = (&y * &y) % modulus;
        }
    }

    x
}

/// Modular multiplicative inverse: a^(-1) mod m, reduced into [0, m).
///
/// Iterative extended Euclidean algorithm. `BigUint` cannot represent
/// negative coefficients, so the sign of each Bezout coefficient is
/// carried in a separate flag. Returns `None` when gcd(a, m) != 1 or
/// m <= 1, i.e. whenever no inverse exists.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    let one = BigUint::one();
    if m <= &one {
        return None;
    }
    let a_mod = a % m;
    if a_mod.is_zero() {
        return None;
    }

    // Remainder sequence: r_prev starts at a, r at m.
    let mut r_prev = a_mod;
    let mut r = m.clone();

    // Coefficient of the original `a` in r_prev and r, with sign flags.
    let mut c_prev = BigUint::one();
    let mut c_prev_neg = false;
    let mut c = BigUint::zero();
    let mut c_neg = false;

    while !r.is_zero() {
        let q = &r_prev / &r;
        let rem = &r_prev % &r;
        r_prev = std::mem::replace(&mut r, rem);

        // next = c_prev - q * c, with manual sign handling.
        let qc = &q * &c;
        let (next, next_neg) = if c_prev_neg == c_neg {
            if c_prev >= qc {
                (&c_prev - &qc, c_prev_neg)
            } else {
                (&qc - &c_prev, !c_prev_neg)
            }
        } else {
            (&c_prev + &qc, c_prev_neg)
        };

        c_prev = std::mem::replace(&mut c, next);
        c_prev_neg = std::mem::replace(&mut c_neg, if c.is_zero() { false } else { next_neg });
    }

    // r_prev is gcd(a, m)
    if r_prev != one {
        return None;
    }

    if c_prev_neg {
        Some(m - (&c_prev % m))
    } else {
        Some(&c_prev % m)
    }
}

/// Integer square root (floor).
pub fn isqrt(n: &BigUint) -> BigUint {
    n.sqrt()
}

/// Smallest integer whose square is >= n.
pub fn ceil_sqrt(n: &BigUint) -> BigUint {
    let root = isqrt(n);
    if &(&root * &root) == n {
        root
    } else {
        root + BigUint::one()
    }
}

/// Fast perfect square test: mod-16 bitmask filter, then integer sqrt.
/// Squares can only be 0, 1, 4 or 9 mod 16, which rejects 75% of
/// non-squares with a single bitwise check.
pub fn is_perfect_square(x: &BigUint) -> bool {
    if x.is_zero() {
        return true;
    }
    let digits = x.to_u64_digits();
    if !digits.is_empty() {
        let m16 = digits[0] & 0xF;
        if !matches!(m16, 0 | 1 | 4 | 9) {
            return false;
        }
    }
    let root = x.sqrt();
    &(&root * &root) == x
}
