//! Canonical Generators
//!
//! For an odd prime p there are exactly 8(p+1) integral quaternions of norm p
//! (Jacobi's four-square theorem). Left multiplication by the eight units
//! ±1, ±i, ±j, ±k splits them into p + 1 orbits, and the P¹(F_p) label of
//! [`crate::modular`] tells the orbits apart. One canonical member is kept per
//! label:
//!
//! 1. `a > 0`, `a` odd and `d` even (exactly one member of each orbit passes)
//! 2. otherwise any member with `a > 0`
//! 3. otherwise the first member found
//!
//! The conjugate of a canonical generator is again canonical, with a
//! different label, so the p + 1 generators split into (p + 1) / 2 conjugate
//! pairs. The member with the smaller label is the primary one; the other is
//! marked as a conjugate.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use num_integer::Integer;
use num_traits::Signed;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::EngineResult;
use crate::modular::{P1Point, QuaternionSplitting};
use crate::primes::validate_odd_prime;
use crate::progress::{self, Progress, Stage};
use crate::quaternion::Quaternion;

/// Stable identifier of a generator inside one [`GeneratorSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeneratorId(pub u32);

impl GeneratorId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GeneratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// A canonical quaternion of prime norm together with its P¹ label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalGenerator {
    pub label: P1Point,
    pub quaternion: Quaternion,
}

/// A numbered generator inside a generator set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generator {
    pub id: GeneratorId,
    pub prime: u64,
    pub label: P1Point,
    pub quaternion: Quaternion,
    /// Always `conjugate(quaternion)`
    pub conjugate: Quaternion,
    /// The generator whose quaternion equals `conjugate`, when there is one
    pub pair: Option<GeneratorId>,
    /// Second member of its conjugate pair
    pub is_conjugate: bool,
}

/// All generators for a set of primes, numbered in prime-ascending order
///
/// This is the explicit context value handed to the relation finder and to
/// any downstream consumer; nothing about it is global.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSet {
    primes: Vec<u64>,
    generators: Vec<Generator>,
}

impl GeneratorSet {
    /// Number generators prime by prime and link conjugate pairs
    ///
    /// `per_prime` must already be in the desired prime order.
    pub fn from_canonical(per_prime: Vec<(u64, Vec<CanonicalGenerator>)>) -> Self {
        let mut primes = Vec::with_capacity(per_prime.len());
        let mut generators: Vec<Generator> = Vec::new();

        for (prime, canonical) in per_prime {
            primes.push(prime);
            let base = generators.len();
            let index: HashMap<Quaternion, usize> = canonical
                .iter()
                .enumerate()
                .map(|(k, g)| (g.quaternion.clone(), base + k))
                .collect();

            for g in canonical {
                generators.push(Generator {
                    id: GeneratorId(generators.len() as u32),
                    prime,
                    label: g.label,
                    conjugate: g.quaternion.conjugate(),
                    quaternion: g.quaternion,
                    pair: None,
                    is_conjugate: false,
                });
            }

            for k in base..generators.len() {
                if generators[k].pair.is_some() {
                    continue;
                }
                let Some(&m) = index.get(&generators[k].conjugate) else {
                    continue;
                };
                generators[k].pair = Some(GeneratorId(m as u32));
                generators[m].pair = Some(GeneratorId(k as u32));
                generators[m].is_conjugate = m != k;
            }
        }

        GeneratorSet { primes, generators }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Primes in id order
    #[inline]
    pub fn primes(&self) -> &[u64] {
        &self.primes
    }

    #[inline]
    pub fn get(&self, id: GeneratorId) -> Option<&Generator> {
        self.generators.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Generator> {
        self.generators.iter()
    }

    pub fn for_prime(&self, p: u64) -> impl Iterator<Item = &Generator> {
        self.generators.iter().filter(move |g| g.prime == p)
    }

    /// Generators not marked as conjugates
    pub fn primaries(&self) -> impl Iterator<Item = &Generator> {
        self.generators.iter().filter(|g| !g.is_conjugate)
    }

    /// The generator with exactly this quaternion
    pub fn find(&self, q: &Quaternion) -> Option<&Generator> {
        self.generators.iter().find(|g| &g.quaternion == q)
    }

    /// The generator of prime `p` carrying `label`
    pub fn by_label(&self, p: u64, label: P1Point) -> Option<&Generator> {
        self.for_prime(p).find(|g| g.label == label)
    }
}

impl<'a> IntoIterator for &'a GeneratorSet {
    type Item = &'a Generator;
    type IntoIter = std::slice::Iter<'a, Generator>;

    fn into_iter(self) -> Self::IntoIter {
        self.generators.iter()
    }
}

/// All integral quaternions of norm `p`
///
/// Exhaustive search with every coordinate bounded by ⌊√p⌋; O(p²) work.
pub fn find_all_quaternions(p: u64) -> Vec<Quaternion> {
    find_all_quaternions_with_progress(p, progress::silent)
}

/// [`find_all_quaternions`] with a checkpoint after every value of `a`
pub fn find_all_quaternions_with_progress<F>(p: u64, mut progress: F) -> Vec<Quaternion>
where
    F: FnMut(&Progress),
{
    let n = p as i64;
    let bound = num_integer::sqrt(p) as i64;
    let total = (2 * bound + 1) as usize;
    let mut found = Vec::new();

    for (step, a) in (-bound..=bound).enumerate() {
        let ra = n - a * a;
        let bound_b = num_integer::sqrt(ra as u64) as i64;
        for b in -bound_b..=bound_b {
            let rb = ra - b * b;
            let bound_c = num_integer::sqrt(rb as u64) as i64;
            for c in -bound_c..=bound_c {
                let rc = rb - c * c;
                let d = num_integer::sqrt(rc as u64) as i64;
                if d * d == rc {
                    found.push(Quaternion::new(a, b, c, d));
                    if d != 0 {
                        found.push(Quaternion::new(a, b, c, -d));
                    }
                }
            }
        }

        progress(&Progress {
            stage: Stage::Enumeration,
            prime: Some(p),
            completed: step + 1,
            total: Some(total),
        });
    }

    found
}

/// The unit-orbit filter: `a > 0`, `a` odd, `d` even
pub fn passes_orbit_filter(q: &Quaternion) -> bool {
    q.a.is_positive() && q.a.is_odd() && q.d.is_even()
}

fn select_representative(group: &[Quaternion]) -> &Quaternion {
    group
        .iter()
        .find(|q| passes_orbit_filter(q))
        .or_else(|| group.iter().find(|q| q.a.is_positive()))
        .unwrap_or(&group[0])
}

/// One canonical generator per point of P¹(F_p), ordered by label
pub fn generate_canonical_generators(p: u64) -> EngineResult<Vec<CanonicalGenerator>> {
    let splitting = QuaternionSplitting::new(p)?;

    let mut groups: BTreeMap<P1Point, Vec<Quaternion>> = BTreeMap::new();
    for q in find_all_quaternions(p) {
        let Some(label) = splitting.label(&q) else {
            unreachable!("{} has norm {} but vanishes modulo {}", q, p, p);
        };
        groups.entry(label).or_default().push(q);
    }

    let generators: Vec<CanonicalGenerator> = groups
        .into_iter()
        .map(|(label, group)| CanonicalGenerator {
            label,
            quaternion: select_representative(&group).clone(),
        })
        .collect();

    debug!(
        prime = p,
        x = splitting.x,
        y = splitting.y,
        count = generators.len(),
        "built canonical generators"
    );
    Ok(generators)
}

/// Generator set for several odd primes
///
/// Primes are sorted and de-duplicated; each prime's generators are built
/// on the rayon pool and merged in ascending prime order, so ids are
/// deterministic.
pub fn generate_generators(primes: &[u64]) -> EngineResult<GeneratorSet> {
    let mut primes = primes.to_vec();
    primes.sort_unstable();
    primes.dedup();
    for &p in &primes {
        validate_odd_prime(p)?;
    }

    let per_prime = primes
        .par_iter()
        .map(|&p| generate_canonical_generators(p).map(|g| (p, g)))
        .collect::<EngineResult<Vec<_>>>()?;

    let set = GeneratorSet::from_canonical(per_prime);
    info!(primes = ?set.primes(), generators = set.len(), "generator set ready");
    Ok(set)
}

/// Reduced representatives of norm `p`, used when factoring
///
/// The quaternions of norm p with first nonzero coordinate positive and
/// coordinate parities (1,0,0,0) for p ≡ 1 (mod 4) or (1,1,1,0) for
/// p ≡ 3 (mod 4). Each left and each right unit orbit contains exactly one of
/// them, and together they are the canonical generators for p. Empty for
/// p = 2, which has no such rule; `p` is otherwise assumed prime.
pub fn reduced_representatives(p: u64) -> Vec<Quaternion> {
    let pattern = match p % 4 {
        1 => [1, 0, 0, 0],
        3 => [1, 1, 1, 0],
        _ => return Vec::new(),
    };
    find_all_quaternions(p)
        .into_iter()
        .filter(|q| q.parity() == pattern && q.is_sign_normalized())
        .collect()
}
