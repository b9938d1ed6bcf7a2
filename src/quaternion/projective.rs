//! Projective Quaternions
//!
//! Two nonzero quaternions are projectively equal when one is a real multiple
//! of the other. The canonical representative divides out the coordinate gcd
//! and makes the first nonzero coordinate positive. It stays integral (never
//! scaled to unit norm), so it can serve directly as a hash key.

use std::fmt;

use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};

use super::Quaternion;

/// A quaternion up to nonzero real scalars, stored in canonical form
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectiveQuaternion(Quaternion);

impl ProjectiveQuaternion {
    pub fn new(q: &Quaternion) -> Self {
        ProjectiveQuaternion(normalize(q))
    }

    pub fn identity() -> Self {
        ProjectiveQuaternion(Quaternion::one())
    }

    /// The canonical integral representative
    #[inline]
    pub fn representative(&self) -> &Quaternion {
        &self.0
    }

    pub fn into_inner(self) -> Quaternion {
        self.0
    }

    /// Projective product: canonical form of the product of representatives
    pub fn multiply(&self, other: &ProjectiveQuaternion) -> ProjectiveQuaternion {
        ProjectiveQuaternion::new(&self.0.multiply(&other.0))
    }
}

impl From<Quaternion> for ProjectiveQuaternion {
    fn from(q: Quaternion) -> Self {
        ProjectiveQuaternion::new(&q)
    }
}

impl From<&Quaternion> for ProjectiveQuaternion {
    fn from(q: &Quaternion) -> Self {
        ProjectiveQuaternion::new(q)
    }
}

/// Canonical key "a,b,c,d" of the normalized representative
impl fmt::Display for ProjectiveQuaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let q = &self.0;
        write!(f, "{},{},{},{}", q.a, q.b, q.c, q.d)
    }
}

/// Canonical representative of the projective class of `q`
///
/// Idempotent: `normalize(&normalize(q)) == normalize(q)`. The zero
/// quaternion maps to itself.
pub fn normalize(q: &Quaternion) -> Quaternion {
    if q.is_zero() {
        return Quaternion::zero();
    }
    let p = q.primitive();
    if p.first_nonzero().is_some_and(|x| x.is_negative()) {
        -p
    } else {
        p
    }
}

/// Exact projective equality by cross-multiplication
///
/// Both quaternions must have their first nonzero coordinate at the same
/// position `i`, and `q1[k]·q2[i] == q2[k]·q1[i]` must hold for every `k`.
pub fn equals(q1: &Quaternion, q2: &Quaternion) -> bool {
    let (c1, c2) = (q1.coords(), q2.coords());
    let first1 = c1.iter().position(|x| !x.is_zero());
    let first2 = c2.iter().position(|x| !x.is_zero());

    let pivot = match (first1, first2) {
        (None, None) => return true,
        (Some(i), Some(j)) if i == j => i,
        _ => return false,
    };

    (0..4).all(|k| c1[k] * c2[pivot] == c2[k] * c1[pivot])
}
