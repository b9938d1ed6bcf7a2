//! Relation Finder
//!
//! A relation is a quadruple (a, b, b′, a′) of generators with
//! `a·b = b′·a′` up to a nonzero scalar. For a generator of prime p and one
//! of prime q ≠ p, unique factorization of quaternions of norm pq makes
//! b′ and a′ unique among the canonical generators, so every cross-prime
//! pair of primaries yields exactly one relation. These are the square
//! faces of the complex.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::generators::{Generator, GeneratorId, GeneratorSet};
use crate::params::RelationParams;
use crate::quaternion::projective::equals;

/// `a·b ≃ b′·a′` for four generator ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Relation {
    pub a: GeneratorId,
    pub b: GeneratorId,
    pub b_prime: GeneratorId,
    pub a_prime: GeneratorId,
    /// `a′ = a` and `b′ = b`: the two generators commute
    pub degenerate: bool,
}

impl Relation {
    /// `(a, b, b′, a′)`
    pub fn ids(&self) -> (GeneratorId, GeneratorId, GeneratorId, GeneratorId) {
        (self.a, self.b, self.b_prime, self.a_prime)
    }

    /// Re-check the defining identity against a generator set
    pub fn holds_in(&self, generators: &GeneratorSet) -> bool {
        let (Some(a), Some(b), Some(b_prime), Some(a_prime)) = (
            generators.get(self.a),
            generators.get(self.b),
            generators.get(self.b_prime),
            generators.get(self.a_prime),
        ) else {
            return false;
        };
        equals(
            &(&a.quaternion * &b.quaternion),
            &(&b_prime.quaternion * &a_prime.quaternion),
        )
    }
}

/// Find the first `(b′, a′)` completing a square for `a·b`
///
/// `b′` runs over the generators of prime(b) and `a′` over those of
/// prime(a), both in id order. The tautology `(b′, a′) = (a, b)` is skipped.
pub fn find_relation(generators: &GeneratorSet, a: &Generator, b: &Generator) -> Option<Relation> {
    let ab = &a.quaternion * &b.quaternion;

    for b_prime in generators.for_prime(b.prime) {
        for a_prime in generators.for_prime(a.prime) {
            if b_prime.id == a.id && a_prime.id == b.id {
                continue;
            }
            if equals(&ab, &(&b_prime.quaternion * &a_prime.quaternion)) {
                return Some(Relation {
                    a: a.id,
                    b: b.id,
                    b_prime: b_prime.id,
                    a_prime: a_prime.id,
                    degenerate: a_prime.id == a.id && b_prime.id == b.id,
                });
            }
        }
    }
    None
}

/// All relations between ordered pairs of primary generators
///
/// Pairs without a relation are simply absent from the result. The output
/// is ordered by `(a, b)` and contains no duplicate quadruples.
pub fn compute_relations(generators: &GeneratorSet, params: &RelationParams) -> Vec<Relation> {
    let mut seen = HashSet::new();
    let mut relations = Vec::new();
    let mut unmatched = 0usize;

    for a in generators.primaries() {
        for b in generators.primaries() {
            if a.id == b.id || (params.cross_prime_only && a.prime == b.prime) {
                continue;
            }
            match find_relation(generators, a, b) {
                Some(relation) => {
                    if seen.insert(relation.ids()) {
                        relations.push(relation);
                    }
                }
                None => unmatched += 1,
            }
        }
    }

    debug!(
        relations = relations.len(),
        degenerate = relations.iter().filter(|r| r.degenerate).count(),
        unmatched,
        "relation search finished"
    );
    relations
}
