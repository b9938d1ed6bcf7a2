//! Square complex context: a generator set and the relations between its
//! generators, built together and passed around as one value.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::EngineResult;
use crate::generators::{generate_generators, Generator, GeneratorId, GeneratorSet};
use crate::params::RelationParams;
use crate::relations::{compute_relations, Relation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareComplex {
    params: RelationParams,
    generators: GeneratorSet,
    relations: Vec<Relation>,
}

impl SquareComplex {
    pub fn build(primes: &[u64], params: &RelationParams) -> EngineResult<Self> {
        let generators = generate_generators(primes)?;
        Ok(Self::from_generators(generators, params))
    }

    /// Compute relations for an existing generator set
    pub fn from_generators(generators: GeneratorSet, params: &RelationParams) -> Self {
        let relations = compute_relations(&generators, params);
        info!(
            primes = ?generators.primes(),
            generators = generators.len(),
            relations = relations.len(),
            "square complex ready"
        );
        SquareComplex {
            params: *params,
            generators,
            relations,
        }
    }

    #[inline]
    pub fn params(&self) -> &RelationParams {
        &self.params
    }

    #[inline]
    pub fn generators(&self) -> &GeneratorSet {
        &self.generators
    }

    #[inline]
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn generator(&self, id: GeneratorId) -> Option<&Generator> {
        self.generators.get(id)
    }

    /// Relations whose first generator is `a`
    pub fn relations_from(&self, a: GeneratorId) -> impl Iterator<Item = &Relation> {
        self.relations.iter().filter(move |r| r.a == a)
    }

    /// The relation starting with the pair `(a, b)`
    pub fn relation(&self, a: GeneratorId, b: GeneratorId) -> Option<&Relation> {
        self.relations.iter().find(|r| r.a == a && r.b == b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_5_13() {
        let complex = SquareComplex::build(&[13, 5], &RelationParams::default()).unwrap();
        assert_eq!(complex.generators().primes(), &[5, 13]);
        assert_eq!(complex.relations().len(), 42);

        for g in complex.generators().primaries() {
            let other = complex.generators().primaries().filter(|h| h.prime != g.prime).count();
            assert_eq!(complex.relations_from(g.id).count(), other);
        }
    }

    #[test]
    fn test_relation_lookup() {
        let complex = SquareComplex::build(&[5, 13], &RelationParams::cross_prime()).unwrap();
        let r = complex.relations()[0];
        assert_eq!(complex.relation(r.a, r.b), Some(&r));
        assert!(complex.relation(r.a, r.a).is_none());
        assert!(complex.generator(r.b_prime).is_some());
    }

    #[test]
    fn test_invalid_prime() {
        assert!(SquareComplex::build(&[5, 21], &RelationParams::default()).is_err());
    }
}
