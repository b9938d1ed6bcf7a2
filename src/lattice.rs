//! Factorization Lattice
//!
//! Left factorizations of an integral quaternion q across the primes of its
//! norm. A node sits at an exponent coordinate `c` (how many factors of each
//! prime have been consumed) and holds a left factor `x` of q with
//! `norm(x) = ∏ p_i^c_i`. A link `x → x·π` consumes one prime p_i through a
//! factor π of norm p_i.
//!
//! # Expansion
//!
//! Nodes are processed breadth-first from the root `(0, ..., 0) ↦ 1`. At node
//! x the remainder `r = conj(x)·q / norm(x)` is exact. For every prime whose
//! exponent is not used up:
//!
//! - if `norm(r) = p_i` this is the last step and `π = r`, so the terminal
//!   node holds q itself
//! - otherwise π ranges over the reduced representatives of norm p_i that
//!   divide r on the left
//!
//! New nodes are merged with existing ones at the same coordinate when they
//! are projectively equal. Node ids are assigned in BFS order, so every link
//! goes from a smaller id to a larger one and the id order is topological.

use std::collections::{HashMap, VecDeque};
use std::sync::OnceLock;

use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::generators::reduced_representatives;
use crate::params::LatticeParams;
use crate::primes::{factor_norm, is_prime};
use crate::progress::{self, Progress, Stage};
use crate::quaternion::projective::ProjectiveQuaternion;
use crate::quaternion::Quaternion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinkId(pub usize);

/// A left factor of the target at an exponent coordinate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticeNode {
    pub id: NodeId,
    /// Exponents consumed so far, indexed like the factorization
    pub coordinate: Vec<u32>,
    pub quaternion: Quaternion,
}

/// `target.quaternion = source.quaternion · factor` exactly
///
/// `factor` is a reduced representative, its negative when the link joins a
/// node first reached with the opposite sign, or the whole remainder on the
/// last step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticeLink {
    pub source: NodeId,
    pub target: NodeId,
    pub prime: u64,
    pub factor: Quaternion,
}

/// A root-to-node chain
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticePath {
    pub nodes: Vec<NodeId>,
    pub links: Vec<LinkId>,
}

impl LatticePath {
    /// Number of links
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// The DAG of partial left factorizations of one quaternion
#[derive(Debug, Clone)]
pub struct FactorizationLattice {
    target: Quaternion,
    factorization: Vec<(u64, u32)>,
    nodes: Vec<LatticeNode>,
    links: Vec<LatticeLink>,
    outgoing: Vec<Vec<LinkId>>,
    index: HashMap<(Vec<u32>, ProjectiveQuaternion), NodeId>,
    truncated: bool,
    path_counts: OnceLock<Vec<BigUint>>,
}

impl FactorizationLattice {
    /// Build the lattice of `q` from the factorization of its norm
    pub fn build(q: &Quaternion, factorization: &[(u64, u32)]) -> EngineResult<Self> {
        Self::build_with_params(q, factorization, &LatticeParams::default(), progress::silent)
    }

    /// Build with an explicit node cap and a progress callback
    ///
    /// `factorization` lists `(prime, exponent)` pairs; repeated primes are
    /// merged into their first occurrence, and that order is the "factor
    /// order" used by [`lowest_path`](Self::lowest_path). The callback fires
    /// once per processed node.
    pub fn build_with_params<F>(
        q: &Quaternion,
        factorization: &[(u64, u32)],
        params: &LatticeParams,
        mut progress: F,
    ) -> EngineResult<Self>
    where
        F: FnMut(&Progress),
    {
        if q.is_zero() {
            return Err(EngineError::ZeroQuaternion);
        }
        let factorization = merge_factorization(factorization)?;

        let norm = q.norm().magnitude().clone();
        let product = factorization
            .iter()
            .fold(BigUint::one(), |acc, &(p, e)| acc * BigUint::from(p).pow(e));
        if product != norm {
            return Err(EngineError::FactorizationMismatch { norm, product });
        }

        // Filled on first use: a prime reached only through the final-step
        // shortcut never enumerates its p+1 representatives
        let mut representatives: Vec<Option<Vec<Quaternion>>> = vec![None; factorization.len()];
        let prime_norms: Vec<BigInt> = factorization.iter().map(|&(p, _)| BigInt::from(p)).collect();

        let mut lattice = FactorizationLattice {
            target: q.clone(),
            factorization,
            nodes: Vec::new(),
            links: Vec::new(),
            outgoing: Vec::new(),
            index: HashMap::new(),
            truncated: false,
            path_counts: OnceLock::new(),
        };

        let root = lattice.insert_node(vec![0; lattice.factorization.len()], Quaternion::one());
        let factorization = lattice.factorization.clone();
        let mut queue = VecDeque::from([root]);
        let mut processed = 0usize;

        while let Some(id) = queue.pop_front() {
            let x = lattice.nodes[id.0].quaternion.clone();
            let coordinate = lattice.nodes[id.0].coordinate.clone();
            let Some(remainder) = q.left_divide(&x) else {
                unreachable!("lattice node {} does not divide {} on the left", x, q);
            };
            let remainder_norm = remainder.norm();

            for (i, &(p, e)) in factorization.iter().enumerate() {
                if coordinate[i] >= e {
                    continue;
                }

                let factors: Vec<Quaternion> = if remainder_norm == prime_norms[i] {
                    vec![remainder.clone()]
                } else {
                    representatives[i]
                        .get_or_insert_with(|| reduced_representatives(p))
                        .iter()
                        .filter(|pi| remainder.left_divide(pi).is_some())
                        .cloned()
                        .collect()
                };

                for mut factor in factors {
                    let y = &x * &factor;
                    let mut next = coordinate.clone();
                    next[i] += 1;

                    let key = (next, ProjectiveQuaternion::new(&y));
                    let existing = lattice.index.get(&key).copied();
                    let target = match existing {
                        Some(existing) => {
                            // Same class and norm: the stored quaternion is ±y
                            if lattice.nodes[existing.0].quaternion != y {
                                factor = -factor;
                            }
                            existing
                        }
                        None if lattice.nodes.len() >= params.max_nodes => {
                            lattice.truncated = true;
                            continue;
                        }
                        None => {
                            let created = lattice.insert_node(key.0, y);
                            queue.push_back(created);
                            created
                        }
                    };

                    let link = LinkId(lattice.links.len());
                    lattice.links.push(LatticeLink {
                        source: id,
                        target,
                        prime: p,
                        factor,
                    });
                    lattice.outgoing[id.0].push(link);
                }
            }

            processed += 1;
            progress(&Progress {
                stage: Stage::LatticeExpansion,
                prime: None,
                completed: processed,
                total: None,
            });
        }

        if lattice.truncated {
            warn!(
                max_nodes = params.max_nodes,
                quaternion = %q,
                "factorization lattice truncated at node cap"
            );
        }
        info!(
            quaternion = %q,
            nodes = lattice.nodes.len(),
            links = lattice.links.len(),
            reached = lattice.target_node().is_some(),
            "factorization lattice built"
        );
        Ok(lattice)
    }

    fn insert_node(&mut self, coordinate: Vec<u32>, quaternion: Quaternion) -> NodeId {
        let id = NodeId(self.nodes.len());
        debug!(node = id.0, ?coordinate, quaternion = %quaternion, "lattice node");
        self.index
            .insert((coordinate.clone(), ProjectiveQuaternion::new(&quaternion)), id);
        self.nodes.push(LatticeNode {
            id,
            coordinate,
            quaternion,
        });
        self.outgoing.push(Vec::new());
        id
    }

    /// The quaternion being factored
    #[inline]
    pub fn target(&self) -> &Quaternion {
        &self.target
    }

    /// `(prime, exponent)` pairs in factor order
    #[inline]
    pub fn factorization(&self) -> &[(u64, u32)] {
        &self.factorization
    }

    #[inline]
    pub fn nodes(&self) -> &[LatticeNode] {
        &self.nodes
    }

    #[inline]
    pub fn links(&self) -> &[LatticeLink] {
        &self.links
    }

    pub fn node(&self, id: NodeId) -> Option<&LatticeNode> {
        self.nodes.get(id.0)
    }

    pub fn link(&self, id: LinkId) -> Option<&LatticeLink> {
        self.links.get(id.0)
    }

    /// The identity node at the zero coordinate
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Whether the node cap stopped the expansion early
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// The node at the full coordinate holding q, if it was reached
    pub fn target_node(&self) -> Option<NodeId> {
        let full: Vec<u32> = self.factorization.iter().map(|&(_, e)| e).collect();
        self.find_node(&full, &self.target)
    }

    /// The node at `coordinate` projectively equal to `q`
    pub fn find_node(&self, coordinate: &[u32], q: &Quaternion) -> Option<NodeId> {
        self.index
            .get(&(coordinate.to_vec(), ProjectiveQuaternion::new(q)))
            .copied()
    }

    /// Every node at one exponent coordinate
    pub fn nodes_at<'a>(&'a self, coordinate: &'a [u32]) -> impl Iterator<Item = &'a LatticeNode> + 'a {
        self.nodes.iter().filter(move |n| n.coordinate == coordinate)
    }

    pub fn outgoing(&self, node: NodeId) -> impl Iterator<Item = &LatticeLink> {
        self.outgoing
            .get(node.0)
            .into_iter()
            .flatten()
            .map(|l| &self.links[l.0])
    }

    fn path_counts(&self) -> &[BigUint] {
        self.path_counts.get_or_init(|| {
            let mut counts = vec![BigUint::zero(); self.nodes.len()];
            if let Some(root) = counts.first_mut() {
                *root = BigUint::one();
            }
            // Links are stored in source order and sources precede targets
            for link in &self.links {
                let from = counts[link.source.0].clone();
                counts[link.target.0] += from;
            }
            counts
        })
    }

    /// Number of distinct root-to-`target` paths
    pub fn count_paths(&self, target: NodeId) -> BigUint {
        self.path_counts()
            .get(target.0)
            .cloned()
            .unwrap_or_default()
    }

    /// Nodes from which `target` can be reached
    fn reaching(&self, target: NodeId) -> Vec<bool> {
        let mut reach = vec![false; self.nodes.len()];
        if target.0 >= reach.len() {
            return reach;
        }
        reach[target.0] = true;
        for link in self.links.iter().rev() {
            if reach[link.target.0] {
                reach[link.source.0] = true;
            }
        }
        reach
    }

    fn prime_index(&self, prime: u64) -> usize {
        self.factorization
            .iter()
            .position(|&(p, _)| p == prime)
            .unwrap_or(usize::MAX)
    }

    /// The canonical greedy path to `target`
    ///
    /// At every node take the earliest prime in factor order that still leads
    /// to `target`, breaking ties by the smaller node id.
    pub fn lowest_path(&self, target: NodeId) -> Option<LatticePath> {
        let reach = self.reaching(target);
        if !reach.first().copied().unwrap_or(false) {
            return None;
        }

        let mut path = LatticePath {
            nodes: vec![self.root()],
            links: Vec::new(),
        };
        let mut current = self.root();
        while current != target {
            let next = self.outgoing[current.0]
                .iter()
                .copied()
                .filter(|l| reach[self.links[l.0].target.0])
                .min_by_key(|l| {
                    let link = &self.links[l.0];
                    (self.prime_index(link.prime), link.target)
                })?;
            current = self.links[next.0].target;
            path.links.push(next);
            path.nodes.push(current);
        }
        Some(path)
    }

    /// Up to `limit` root-to-`target` paths in lexicographic link order
    pub fn paths(&self, target: NodeId, limit: usize) -> Vec<LatticePath> {
        let reach = self.reaching(target);
        let mut found = Vec::new();
        if limit == 0 || !reach.first().copied().unwrap_or(false) {
            return found;
        }

        let mut current = LatticePath {
            nodes: vec![self.root()],
            links: Vec::new(),
        };
        self.collect_paths(target, &reach, limit, &mut current, &mut found);
        found
    }

    fn collect_paths(
        &self,
        target: NodeId,
        reach: &[bool],
        limit: usize,
        current: &mut LatticePath,
        found: &mut Vec<LatticePath>,
    ) {
        let Some(&node) = current.nodes.last() else {
            return;
        };
        if node == target {
            found.push(current.clone());
            return;
        }
        for &l in &self.outgoing[node.0] {
            if found.len() >= limit {
                return;
            }
            let next = self.links[l.0].target;
            if !reach[next.0] {
                continue;
            }
            current.links.push(l);
            current.nodes.push(next);
            self.collect_paths(target, reach, limit, current, found);
            current.links.pop();
            current.nodes.pop();
        }
    }

    /// `(prime, π)` for each link of a path; their ordered product is the
    /// quaternion of the path's last node
    pub fn path_factors(&self, path: &LatticePath) -> Vec<(u64, Quaternion)> {
        path.links
            .iter()
            .filter_map(|&l| self.link(l))
            .map(|link| (link.prime, link.factor.clone()))
            .collect()
    }
}

fn merge_factorization(factorization: &[(u64, u32)]) -> EngineResult<Vec<(u64, u32)>> {
    let mut merged: Vec<(u64, u32)> = Vec::with_capacity(factorization.len());
    for &(p, e) in factorization {
        if !is_prime(p) {
            return Err(EngineError::NotPrime(p));
        }
        match merged.iter_mut().find(|(q, _)| *q == p) {
            Some(entry) => entry.1 += e,
            None => merged.push((p, e)),
        }
    }
    Ok(merged)
}

/// Factor the norm of `q` by trial division and build its lattice
pub fn factorize(q: &Quaternion) -> EngineResult<FactorizationLattice> {
    if q.is_zero() {
        return Err(EngineError::ZeroQuaternion);
    }
    let factorization = factor_norm(q.norm().magnitude())?;
    FactorizationLattice::build(q, &factorization)
}
