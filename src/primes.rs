//! Prime Tests and Norm Factorization
//!
//! Primes in this crate are small enough for exhaustive four-squares search,
//! so `u64` is plenty for them. Norms are `BigUint` and get factored by trial
//! division up to [`TRIAL_DIVISION_LIMIT`].

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use crate::error::{EngineError, EngineResult};

/// Largest trial divisor tried by [`factor_norm`]
pub const TRIAL_DIVISION_LIMIT: u64 = 1 << 20;

/// Witnesses that make Miller-Rabin deterministic for every `u64`
const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Deterministic Miller-Rabin primality test
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for &w in &WITNESSES {
        if n == w {
            return true;
        }
        if n % w == 0 {
            return false;
        }
    }

    // Write n-1 as 2^r × d
    let mut d = n - 1;
    let mut r = 0u32;
    while d % 2 == 0 {
        d /= 2;
        r += 1;
    }

    'witness: for &a in &WITNESSES {
        let mut x = mod_pow(a, d, n);
        if x == 1 || x == n - 1 {
            continue 'witness;
        }

        for _ in 1..r {
            x = mod_mul(x, x, n);
            if x == n - 1 {
                continue 'witness;
            }
        }

        return false; // n is composite
    }

    true
}

pub fn is_odd_prime(p: u64) -> bool {
    p != 2 && is_prime(p)
}

/// Reject anything that is not an odd prime
pub fn validate_odd_prime(p: u64) -> EngineResult<()> {
    if is_odd_prime(p) {
        Ok(())
    } else {
        Err(EngineError::InvalidPrime(p))
    }
}

/// Modular exponentiation: (base^exp) mod m
pub fn mod_pow(base: u64, mut exp: u64, m: u64) -> u64 {
    if m == 1 {
        return 0;
    }

    let mut result = 1u64;
    let mut b = base % m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mod_mul(result, b, m);
        }
        b = mod_mul(b, b, m);
        exp >>= 1;
    }
    result
}

#[inline]
pub fn mod_mul(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

/// Factor a norm into ascending `(prime, exponent)` pairs
///
/// Trial division runs up to [`TRIAL_DIVISION_LIMIT`]. A leftover cofactor is
/// accepted when it is provably prime (below the square of the last divisor
/// tried); otherwise the norm is reported as unfactored.
pub fn factor_norm(norm: &BigUint) -> EngineResult<Vec<(u64, u32)>> {
    let mut factors = Vec::new();
    if norm.is_zero() || norm.is_one() {
        return Ok(factors);
    }

    let mut n = norm.clone();
    let mut d = 2u64;
    while d <= TRIAL_DIVISION_LIMIT {
        if BigUint::from(d) * d > n {
            break;
        }
        let mut exponent = 0u32;
        while (&n % d).is_zero() {
            n /= d;
            exponent += 1;
        }
        if exponent > 0 {
            factors.push((d, exponent));
        }
        d += if d == 2 { 1 } else { 2 };
    }

    if !n.is_one() {
        let fully_sieved = BigUint::from(d) * d > n;
        match n.to_u64() {
            Some(last) if fully_sieved => factors.push((last, 1)),
            _ => {
                return Err(EngineError::UnfactoredNorm {
                    norm: norm.clone(),
                    limit: TRIAL_DIVISION_LIMIT,
                })
            }
        }
    }

    Ok(factors)
}

/// Exponent of `p` in `n` (zero when `n` is zero)
pub fn valuation(n: &BigUint, p: u64) -> u32 {
    if n.is_zero() || p < 2 {
        return 0;
    }
    let mut n = n.clone();
    let mut e = 0;
    while (&n % p).is_zero() {
        n /= p;
        e += 1;
    }
    e
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Simple trial division primality test
    fn is_prime_trial(n: u64) -> bool {
        if n < 2 {
            return false;
        }
        let mut d = 2u64;
        while d * d <= n {
            if n % d == 0 {
                return false;
            }
            d += 1;
        }
        true
    }

    #[test]
    fn test_is_prime_matches_trial_division() {
        for n in 0..2000u64 {
            assert_eq!(is_prime(n), is_prime_trial(n), "disagreement at {}", n);
        }
    }

    #[test]
    fn test_is_prime_large() {
        assert!(is_prime(1099511922689)); // 41-bit NTT-friendly prime
        assert!(is_prime(18446744073709551557)); // largest prime below 2^64
        assert!(!is_prime(3215031751)); // strong pseudoprime to bases 2, 3, 5, 7
        assert!(!is_prime(1099511922689 * 3));
    }

    #[test]
    fn test_validate_odd_prime() {
        assert!(validate_odd_prime(5).is_ok());
        assert!(validate_odd_prime(13).is_ok());
        assert_eq!(validate_odd_prime(2), Err(EngineError::InvalidPrime(2)));
        assert_eq!(validate_odd_prime(9), Err(EngineError::InvalidPrime(9)));
        assert_eq!(validate_odd_prime(1), Err(EngineError::InvalidPrime(1)));
    }

    #[test]
    fn test_factor_norm() {
        assert_eq!(factor_norm(&BigUint::from(65u32)).unwrap(), vec![(5, 1), (13, 1)]);
        assert_eq!(factor_norm(&BigUint::from(1u32)).unwrap(), vec![]);
        assert_eq!(
            factor_norm(&BigUint::from(2u32 * 2 * 3 * 5 * 5 * 5 * 101)).unwrap(),
            vec![(2, 2), (3, 1), (5, 3), (101, 1)]
        );
        // 1_000_003 is prime and survives trial division as a cofactor
        assert_eq!(
            factor_norm(&BigUint::from(7u64 * 1_000_003)).unwrap(),
            vec![(7, 1), (1_000_003, 1)]
        );
    }

    #[test]
    fn test_factor_norm_beyond_limit() {
        // Product of two primes above the trial-division limit
        let p = BigUint::from(1_000_000_007u64);
        let q = BigUint::from(1_000_000_009u64);
        let n = &p * &q;
        assert!(matches!(factor_norm(&n), Err(EngineError::UnfactoredNorm { .. })));
    }

    #[test]
    fn test_valuation() {
        assert_eq!(valuation(&BigUint::from(325u32), 5), 2);
        assert_eq!(valuation(&BigUint::from(325u32), 13), 1);
        assert_eq!(valuation(&BigUint::from(325u32), 7), 0);
        assert_eq!(valuation(&BigUint::zero(), 7), 0);
    }
}
