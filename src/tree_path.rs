//! Tree Path Deriver
//!
//! The vertices of the (p+1)-regular Bruhat–Tits tree at distance n from the
//! root correspond to quaternions of norm pⁿ up to right units. Peeling off
//! one left factor of norm p at a time walks from the root towards q; the
//! P¹ labels of the factors are the edges taken.

use num_bigint::BigInt;
use num_integer::Integer;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::generators::reduced_representatives;
use crate::modular::{P1Point, QuaternionSplitting};
use crate::primes::{valuation, validate_odd_prime};
use crate::quaternion::Quaternion;

/// One edge of a tree address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreePathStep {
    pub depth: usize,
    pub label: P1Point,
    /// Reduced representative of norm p peeled off at this depth
    pub factor: Quaternion,
}

/// Address of a quaternion in the tree of one prime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreePath {
    pub prime: u64,
    /// `v_p(norm(q))`
    pub valuation: u32,
    pub steps: Vec<TreePathStep>,
}

impl TreePath {
    pub fn labels(&self) -> Vec<P1Point> {
        self.steps.iter().map(|s| s.label).collect()
    }

    /// One step per power of p in the norm
    pub fn is_complete(&self) -> bool {
        self.steps.len() == self.valuation as usize
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Canonical tree address of `q` for the odd prime `p`
///
/// Scalar factors of p are stripped before every step. A non-primitive
/// input can therefore run out of factors before `valuation` steps, which
/// yields an incomplete path rather than an error.
pub fn tree_path(q: &Quaternion, p: u64) -> EngineResult<TreePath> {
    validate_odd_prime(p)?;
    if q.is_zero() {
        return Err(EngineError::ZeroQuaternion);
    }

    let norm = q.norm().magnitude().clone();
    let e = valuation(&norm, p);
    if e == 0 {
        return Err(EngineError::PrimeDoesNotDivideNorm { prime: p, norm });
    }

    let splitting = QuaternionSplitting::new(p)?;
    let representatives = reduced_representatives(p);
    let modulus = BigInt::from(p);

    let mut remainder = q.clone();
    let mut steps = Vec::with_capacity(e as usize);
    for depth in 0..e as usize {
        while let Some(reduced) = remainder.div_exact(&modulus) {
            remainder = reduced;
        }
        if !remainder.norm().is_multiple_of(&modulus) {
            break;
        }

        let Some((factor, quotient)) = representatives
            .iter()
            .find_map(|pi| remainder.left_divide(pi).map(|r| (pi, r)))
        else {
            break;
        };
        let Some(label) = splitting.label(factor) else {
            unreachable!("{} has norm {} but vanishes modulo {}", factor, p, p);
        };

        steps.push(TreePathStep {
            depth,
            label,
            factor: factor.clone(),
        });
        remainder = quotient;
    }

    debug!(prime = p, valuation = e, steps = steps.len(), quaternion = %q, "tree path");
    Ok(TreePath {
        prime: p,
        valuation: e,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_norm_65_has_one_step_per_prime() {
        let q = Quaternion::new(8, 1, 0, 0);
        for p in [5, 13] {
            let path = tree_path(&q, p).unwrap();
            assert_eq!(path.valuation, 1);
            assert_eq!(path.len(), 1);
            assert!(path.is_complete());
            assert_eq!(path.steps[0].factor.norm(), BigInt::from(p));
        }
    }

    #[test]
    fn test_depth_two() {
        // norm 25, primitive
        let q = Quaternion::new(-3, 4, 0, 0);
        let path = tree_path(&q, 5).unwrap();
        assert_eq!(path.valuation, 2);
        assert!(path.is_complete());
        assert_eq!(path.steps.iter().map(|s| s.depth).collect::<Vec<_>>(), vec![0, 1]);

        // The two factors rebuild q up to a right unit
        let product = &path.steps[0].factor * &path.steps[1].factor;
        assert_eq!(product.norm(), q.norm());
        assert!(q.left_divide(&product).is_some());
    }

    #[test]
    fn test_labels_match_factors() {
        let q = Quaternion::new(7, 3, 2, 1);
        let path = tree_path(&q, 3).unwrap();
        let splitting = QuaternionSplitting::new(3).unwrap();
        let expected: Vec<P1Point> = path
            .steps
            .iter()
            .map(|s| splitting.label(&s.factor).unwrap())
            .collect();
        assert_eq!(path.labels(), expected);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_scalar_input_is_incomplete() {
        let path = tree_path(&Quaternion::scalar(5), 5).unwrap();
        assert_eq!(path.valuation, 2);
        assert!(path.is_empty());
        assert!(!path.is_complete());
    }

    #[test]
    fn test_contract_violations() {
        let q = Quaternion::new(8, 1, 0, 0);
        assert_eq!(tree_path(&q, 2), Err(EngineError::InvalidPrime(2)));
        assert_eq!(tree_path(&q, 15), Err(EngineError::InvalidPrime(15)));
        assert_eq!(tree_path(&Quaternion::zero(), 5), Err(EngineError::ZeroQuaternion));
        assert!(matches!(
            tree_path(&q, 7),
            Err(EngineError::PrimeDoesNotDivideNorm { prime: 7, .. })
        ));
    }
}
