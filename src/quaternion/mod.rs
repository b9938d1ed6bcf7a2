//! Integral Quaternions
//!
//! Exact quaternions q = a + bi + cj + dk with arbitrary-precision integer
//! coordinates. Norms of products in a factorization lattice outgrow 64 bits
//! quickly, so nothing here ever narrows to a fixed-width type.
//!
//! # Conventions
//!
//! - Hamilton product: i² = j² = k² = ijk = -1
//! - `norm(q) = a² + b² + c² + d²` (the reduced norm, no square root)
//! - `conjugate(q) = a - bi - cj - dk`, so `q · conjugate(q) = norm(q)`
//!
//! Projective equality and canonical representatives live in [`projective`];
//! the text grammar lives in [`parse`].

pub mod parse;
pub mod projective;

use std::ops::{Mul, Neg};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};

/// An integral quaternion a + bi + cj + dk
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quaternion {
    pub a: BigInt,
    pub b: BigInt,
    pub c: BigInt,
    pub d: BigInt,
}

impl Quaternion {
    /// Build a quaternion from anything convertible into `BigInt`
    pub fn new<T: Into<BigInt>>(a: T, b: T, c: T, d: T) -> Self {
        Quaternion {
            a: a.into(),
            b: b.into(),
            c: c.into(),
            d: d.into(),
        }
    }

    pub fn from_coords([a, b, c, d]: [BigInt; 4]) -> Self {
        Quaternion { a, b, c, d }
    }

    pub fn zero() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn one() -> Self {
        Self::new(1, 0, 0, 0)
    }

    pub fn i() -> Self {
        Self::new(0, 1, 0, 0)
    }

    pub fn j() -> Self {
        Self::new(0, 0, 1, 0)
    }

    pub fn k() -> Self {
        Self::new(0, 0, 0, 1)
    }

    /// The real quaternion n + 0i + 0j + 0k
    pub fn scalar<T: Into<BigInt>>(n: T) -> Self {
        Quaternion {
            a: n.into(),
            b: BigInt::zero(),
            c: BigInt::zero(),
            d: BigInt::zero(),
        }
    }

    /// Coordinates in the order (a, b, c, d)
    #[inline]
    pub fn coords(&self) -> [&BigInt; 4] {
        [&self.a, &self.b, &self.c, &self.d]
    }

    pub fn is_zero(&self) -> bool {
        self.coords().iter().all(|x| x.is_zero())
    }

    /// First nonzero coordinate, if any
    pub fn first_nonzero(&self) -> Option<&BigInt> {
        self.coords().into_iter().find(|x| !x.is_zero())
    }

    /// Hamilton product `self · other`
    pub fn multiply(&self, other: &Quaternion) -> Quaternion {
        let (a1, b1, c1, d1) = (&self.a, &self.b, &self.c, &self.d);
        let (a2, b2, c2, d2) = (&other.a, &other.b, &other.c, &other.d);

        Quaternion {
            a: a1 * a2 - b1 * b2 - c1 * c2 - d1 * d2,
            b: a1 * b2 + b1 * a2 + c1 * d2 - d1 * c2,
            c: a1 * c2 - b1 * d2 + c1 * a2 + d1 * b2,
            d: a1 * d2 + b1 * c2 - c1 * b2 + d1 * a2,
        }
    }

    pub fn conjugate(&self) -> Quaternion {
        Quaternion {
            a: self.a.clone(),
            b: -&self.b,
            c: -&self.c,
            d: -&self.d,
        }
    }

    /// Reduced norm a² + b² + c² + d²
    pub fn norm(&self) -> BigInt {
        self.coords().iter().map(|x| *x * *x).sum()
    }

    /// Greatest common divisor of the four coordinates (zero for the zero quaternion)
    pub fn content(&self) -> BigInt {
        self.a.gcd(&self.b).gcd(&self.c).gcd(&self.d)
    }

    /// Divide out the content, keeping the sign of every coordinate
    pub fn primitive(&self) -> Quaternion {
        let g = self.content();
        if g.is_zero() || g.is_one() {
            return self.clone();
        }
        Quaternion::from_coords(self.coords().map(|x| x / &g))
    }

    /// Whether every coordinate is a multiple of `n`
    pub fn is_divisible_by(&self, n: &BigInt) -> bool {
        !n.is_zero() && self.coords().iter().all(|x| x.is_multiple_of(n))
    }

    /// Divide every coordinate by `n`, or `None` if some division is inexact
    pub fn div_exact(&self, n: &BigInt) -> Option<Quaternion> {
        if !self.is_divisible_by(n) {
            return None;
        }
        Some(Quaternion::from_coords(self.coords().map(|x| x / n)))
    }

    /// Exact quotient `r` with `self = divisor · r`
    ///
    /// `r = conjugate(divisor) · self / norm(divisor)`; `None` when the
    /// division leaves the integral quaternions or `divisor` is zero.
    pub fn left_divide(&self, divisor: &Quaternion) -> Option<Quaternion> {
        divisor
            .conjugate()
            .multiply(self)
            .div_exact(&divisor.norm())
    }

    /// Exact quotient `r` with `self = r · divisor`
    pub fn right_divide(&self, divisor: &Quaternion) -> Option<Quaternion> {
        self.multiply(&divisor.conjugate())
            .div_exact(&divisor.norm())
    }

    /// Coordinate parities (|a| mod 2, |b| mod 2, |c| mod 2, |d| mod 2)
    pub fn parity(&self) -> [u8; 4] {
        self.coords().map(|x| u8::from(x.is_odd()))
    }

    /// Whether the first nonzero coordinate is positive
    pub fn is_sign_normalized(&self) -> bool {
        self.first_nonzero().map_or(true, |x| x.is_positive())
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::zero()
    }
}

impl Mul<&Quaternion> for &Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: &Quaternion) -> Quaternion {
        self.multiply(rhs)
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Quaternion) -> Quaternion {
        self.multiply(&rhs)
    }
}

impl Neg for &Quaternion {
    type Output = Quaternion;

    fn neg(self) -> Quaternion {
        Quaternion::from_coords(self.coords().map(|x| -x))
    }
}

impl Neg for Quaternion {
    type Output = Quaternion;

    fn neg(self) -> Quaternion {
        -&self
    }
}

/// Hamilton product, free-function form
#[inline]
pub fn multiply(q1: &Quaternion, q2: &Quaternion) -> Quaternion {
    q1.multiply(q2)
}

#[inline]
pub fn conjugate(q: &Quaternion) -> Quaternion {
    q.conjugate()
}

#[inline]
pub fn norm_sq(q: &Quaternion) -> BigInt {
    q.norm()
}
