//! Modular Field Utilities
//!
//! Reduction of integral quaternions modulo an odd prime p. With a fixed
//! solution of x₀² + y₀² ≡ -1 (mod p) the quaternion algebra over F_p splits
//! as 2×2 matrices:
//!
//! ```text
//! i ↦ [[ 0, -1], [ 1,   0]]
//! j ↦ [[x₀, y₀], [y₀, -x₀]]
//! k ↦ [[-y₀, x₀], [x₀, y₀]]     (k = i·j)
//!
//! M(a + bi + cj + dk) = [[a + c·x₀ - d·y₀, -b + c·y₀ + d·x₀],
//!                        [b + c·y₀ + d·x₀,  a - c·x₀ + d·y₀]]   (mod p)
//! ```
//!
//! `det M(q) ≡ norm(q)`, so a quaternion of norm p maps to a rank-one
//! matrix whose kernel is a point of P¹(F_p). That point is the quaternion's
//! label, and it does not change under left multiplication by ±1, ±i, ±j, ±k.

use std::fmt;
use std::iter;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::primes::{mod_mul, validate_odd_prime};
use crate::quaternion::Quaternion;

/// A point of the projective line P¹(F_p): `0, 1, ..., p-1` or `∞`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum P1Point {
    Finite(u64),
    Infinity,
}

impl P1Point {
    /// All p + 1 points in order `0, 1, ..., p-1, ∞`
    pub fn all(p: u64) -> impl Iterator<Item = P1Point> {
        (0..p).map(P1Point::Finite).chain(iter::once(P1Point::Infinity))
    }
}

impl fmt::Display for P1Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            P1Point::Finite(t) => write!(f, "{}", t),
            P1Point::Infinity => write!(f, "∞"),
        }
    }
}

/// A 2×2 matrix over F_p, entries reduced to `0..p`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matrix2 {
    pub rows: [[u64; 2]; 2],
    pub modulus: u64,
}

impl Matrix2 {
    pub fn det(&self) -> u64 {
        let [[a, b], [c, d]] = self.rows;
        sub_mod(mod_mul(a, d, self.modulus), mod_mul(b, c, self.modulus), self.modulus)
    }

    pub fn is_zero(&self) -> bool {
        self.rows.iter().flatten().all(|&x| x == 0)
    }

    pub fn mul(&self, other: &Matrix2) -> Matrix2 {
        let p = self.modulus;
        let mut rows = [[0u64; 2]; 2];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, entry) in row.iter_mut().enumerate() {
                *entry = add_mod(
                    mod_mul(self.rows[r][0], other.rows[0][c], p),
                    mod_mul(self.rows[r][1], other.rows[1][c], p),
                    p,
                );
            }
        }
        Matrix2 { rows, modulus: p }
    }
}

#[inline]
fn add_mod(u: u64, v: u64, p: u64) -> u64 {
    ((u as u128 + v as u128) % p as u128) as u64
}

#[inline]
fn sub_mod(u: u64, v: u64, p: u64) -> u64 {
    add_mod(u, p - v % p, p)
}

/// Least non-negative residue of `x` modulo `p`
pub fn residue(x: &BigInt, p: u64) -> u64 {
    let r = x.mod_floor(&BigInt::from(p));
    r.to_u64()
        .unwrap_or_else(|| unreachable!("residue {} modulo {} exceeds u64", r, p))
}

/// Inverse of `a` modulo `m` by the extended Euclidean algorithm
///
/// `None` exactly when gcd(a, m) ≠ 1.
pub fn mod_inverse(a: u64, m: u64) -> Option<u64> {
    if m == 0 {
        return None;
    }

    let (mut old_r, mut r) = ((a % m) as i128, m as i128);
    let (mut old_s, mut s) = (1i128, 0i128);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }

    if old_r != 1 {
        return None;
    }
    Some(old_s.rem_euclid(m as i128) as u64)
}

/// Inverse of a nonzero element of F_p; failure is an arithmetic bug
fn field_inverse(a: u64, p: u64) -> u64 {
    mod_inverse(a, p)
        .unwrap_or_else(|| unreachable!("{} is not invertible modulo the prime {}", a, p))
}

/// Integers (x, y) with x² + y² ≡ -1 (mod p)
///
/// For p ≡ 1 (mod 4) a square root of -1 is preferred (y = 0); otherwise
/// pairs are searched lexicographically with y ≥ 1.
pub fn find_xy_solution(p: u64) -> EngineResult<(u64, u64)> {
    validate_odd_prime(p)?;
    let minus_one = p - 1;

    if p % 4 == 1 {
        if let Some(x) = (0..p).find(|&x| mod_mul(x, x, p) == minus_one) {
            return Ok((x, 0));
        }
    }

    for x in 0..p {
        let xx = mod_mul(x, x, p);
        for y in 1..p {
            if add_mod(xx, mod_mul(y, y, p), p) == minus_one {
                return Ok((x, y));
            }
        }
    }

    unreachable!("-1 is a sum of two squares modulo every odd prime, including {}", p)
}

/// Image of `q` under the splitting fixed by (x₀, y₀)
pub fn quaternion_to_matrix(q: &Quaternion, x0: u64, y0: u64, p: u64) -> Matrix2 {
    let [a, b, c, d] = q.coords().map(|v| residue(v, p));
    let (x0, y0) = (x0 % p, y0 % p);

    let cx = mod_mul(c, x0, p);
    let cy = mod_mul(c, y0, p);
    let dx = mod_mul(d, x0, p);
    let dy = mod_mul(d, y0, p);

    Matrix2 {
        rows: [
            [sub_mod(add_mod(a, cx, p), dy, p), sub_mod(add_mod(cy, dx, p), b, p)],
            [add_mod(add_mod(b, cy, p), dx, p), add_mod(sub_mod(a, cx, p), dy, p)],
        ],
        modulus: p,
    }
}

/// Kernel line of a rank-one matrix as a point of P¹(F_p)
///
/// The kernel vector is read off the first nonzero row (r₀, r₁) as
/// v = (r₁, -r₀); the point is v₀·v₁⁻¹, or `∞` when v₁ = 0. `None` for the
/// zero matrix.
pub fn matrix_kernel(m: &Matrix2) -> Option<P1Point> {
    let p = m.modulus;
    let row = m.rows.iter().find(|r| r[0] != 0 || r[1] != 0)?;
    let (v0, v1) = (row[1], sub_mod(0, row[0], p));

    if v1 == 0 {
        Some(P1Point::Infinity)
    } else {
        Some(P1Point::Finite(mod_mul(v0, field_inverse(v1, p), p)))
    }
}

/// The splitting data for one odd prime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuaternionSplitting {
    pub prime: u64,
    pub x: u64,
    pub y: u64,
}

impl QuaternionSplitting {
    pub fn new(p: u64) -> EngineResult<Self> {
        let (x, y) = find_xy_solution(p)?;
        Ok(QuaternionSplitting { prime: p, x, y })
    }

    #[inline]
    pub fn matrix(&self, q: &Quaternion) -> Matrix2 {
        quaternion_to_matrix(q, self.x, self.y, self.prime)
    }

    /// P¹ label of `q`; `None` when `q ≡ 0 (mod p)`
    #[inline]
    pub fn label(&self, q: &Quaternion) -> Option<P1Point> {
        matrix_kernel(&self.matrix(q))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primes::is_odd_prime;

    fn units() -> Vec<Quaternion> {
        let mut units = Vec::new();
        for u in [Quaternion::one(), Quaternion::i(), Quaternion::j(), Quaternion::k()] {
            units.push(-&u);
            units.push(u);
        }
        units
    }

    #[test]
    fn test_find_xy_solution_p5() {
        let (x, y) = find_xy_solution(5).unwrap();
        assert_eq!((x, y), (2, 0));
        assert_eq!((x * x + y * y) % 5, 4);
    }

    #[test]
    fn test_find_xy_solution_all_small_primes() {
        for p in (3..400u64).filter(|&p| is_odd_prime(p)) {
            let (x, y) = find_xy_solution(p).unwrap();
            assert_eq!((x * x + y * y + 1) % p, 0, "bad solution for p={}", p);
            if p % 4 == 1 {
                assert_eq!(y, 0, "p={} ≡ 1 mod 4 should use y = 0", p);
            } else {
                assert!(y >= 1);
            }
        }
    }

    #[test]
    fn test_find_xy_solution_rejects_non_primes() {
        assert!(find_xy_solution(2).is_err());
        assert!(find_xy_solution(15).is_err());
    }

    #[test]
    fn test_mod_inverse() {
        assert_eq!(mod_inverse(3, 7), Some(5));
        assert_eq!(mod_inverse(1, 13), Some(1));
        assert_eq!(mod_inverse(12, 13), Some(12));
        assert_eq!(mod_inverse(6, 9), None);
        assert_eq!(mod_inverse(0, 7), None);
        for p in [5u64, 7, 13, 101] {
            for a in 1..p {
                let inv = mod_inverse(a, p).unwrap();
                assert_eq!(a * inv % p, 1);
            }
        }
    }

    #[test]
    fn test_residue_of_negative() {
        assert_eq!(residue(&BigInt::from(-1), 5), 4);
        assert_eq!(residue(&BigInt::from(-10), 5), 0);
        assert_eq!(residue(&BigInt::from(17), 5), 2);
    }

    #[test]
    fn test_matrix_representation_is_multiplicative() {
        let samples = [
            Quaternion::new(2, 1, 0, 0),
            Quaternion::new(1, -2, 3, 4),
            Quaternion::new(0, 1, 1, 1),
            Quaternion::new(-7, 0, 5, -2),
        ];
        for p in [3u64, 5, 7, 13, 17] {
            let s = QuaternionSplitting::new(p).unwrap();
            for q1 in &samples {
                for q2 in &samples {
                    let lhs = s.matrix(&(q1 * q2));
                    let rhs = s.matrix(q1).mul(&s.matrix(q2));
                    assert_eq!(lhs, rhs, "p={} q1={} q2={}", p, q1, q2);
                }
            }
        }
    }

    #[test]
    fn test_determinant_is_norm() {
        let s = QuaternionSplitting::new(13).unwrap();
        for q in [Quaternion::new(3, 2, 0, 0), Quaternion::new(1, 5, -2, 7)] {
            assert_eq!(s.matrix(&q).det(), residue(&q.norm(), 13));
        }
    }

    #[test]
    fn test_kernel_annihilates() {
        let s = QuaternionSplitting::new(5).unwrap();
        let m = s.matrix(&Quaternion::new(2, 1, 0, 0));
        assert_eq!(m.det(), 0);
        assert!(!m.is_zero());

        let v = match matrix_kernel(&m).unwrap() {
            P1Point::Finite(t) => [t, 1],
            P1Point::Infinity => [1, 0],
        };
        for row in m.rows {
            assert_eq!(add_mod(mod_mul(row[0], v[0], 5), mod_mul(row[1], v[1], 5), 5), 0);
        }
    }

    #[test]
    fn test_kernel_read_from_second_row_when_first_is_zero() {
        // zero first row does not force ∞: (4, 0) gives v = (0, 1), the point 0
        let m = Matrix2 { rows: [[0, 0], [4, 0]], modulus: 5 };
        assert_eq!(matrix_kernel(&m), Some(P1Point::Finite(0)));

        let m = Matrix2 { rows: [[0, 0], [0, 3]], modulus: 5 };
        assert_eq!(matrix_kernel(&m), Some(P1Point::Infinity));

        let m = Matrix2 { rows: [[0, 0], [2, 3]], modulus: 5 };
        assert_eq!(matrix_kernel(&m), Some(P1Point::Finite(1)));

        assert_eq!(matrix_kernel(&Matrix2 { rows: [[0, 0], [0, 0]], modulus: 5 }), None);
    }

    #[test]
    fn test_label_invariant_under_left_units() {
        let s = QuaternionSplitting::new(13).unwrap();
        let q = Quaternion::new(3, 0, 2, 0);
        let label = s.label(&q).unwrap();
        for u in units() {
            assert_eq!(s.label(&(&u * &q)), Some(label));
        }
    }

    #[test]
    fn test_zero_matrix_has_no_label() {
        let s = QuaternionSplitting::new(7).unwrap();
        assert!(s.matrix(&Quaternion::scalar(7)).is_zero());
        assert_eq!(s.label(&Quaternion::new(7, 14, 0, -21)), None);
        assert!(s.label(&Quaternion::zero()).is_none());
    }

    #[test]
    fn test_p1_points() {
        let points: Vec<_> = P1Point::all(3).collect();
        assert_eq!(
            points,
            vec![P1Point::Finite(0), P1Point::Finite(1), P1Point::Finite(2), P1Point::Infinity]
        );
        assert_eq!(P1Point::Infinity.to_string(), "∞");
        assert!(P1Point::Finite(4) < P1Point::Infinity);
    }
}
