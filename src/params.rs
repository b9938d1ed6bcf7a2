//! Search Parameters
//!
//! Named parameter sets for the relation finder, the word search and the
//! lattice builder.

use serde::{Deserialize, Serialize};

/// Which generator pairs the relation finder examines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationParams {
    /// Only pairs (a, b) with prime(a) ≠ prime(b), as needed for a square
    /// complex over two primes
    pub cross_prime_only: bool,
}

impl RelationParams {
    /// Every ordered pair of primary generators
    pub fn all_pairs() -> Self {
        RelationParams {
            cross_prime_only: false,
        }
    }

    /// Only pairs whose generators come from different primes
    pub fn cross_prime() -> Self {
        RelationParams {
            cross_prime_only: true,
        }
    }
}

impl Default for RelationParams {
    fn default() -> Self {
        Self::cross_prime()
    }
}

/// Limits for the factorization lattice BFS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticeParams {
    /// Stop expanding once this many nodes exist; the lattice is then
    /// marked truncated
    pub max_nodes: usize,
}

impl LatticeParams {
    /// Default cap, far above what primitive targets ever need
    pub const DEFAULT_MAX_NODES: usize = 200_000;

    pub fn new() -> Self {
        LatticeParams {
            max_nodes: Self::DEFAULT_MAX_NODES,
        }
    }

    pub fn with_max_nodes(max_nodes: usize) -> Self {
        LatticeParams { max_nodes }
    }

    pub fn unbounded() -> Self {
        LatticeParams {
            max_nodes: usize::MAX,
        }
    }
}

impl Default for LatticeParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Beam limits for the word relation search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSearchParams {
    /// Words kept per depth, nearest to the identity first
    pub beam_width: usize,
    /// Longest word expanded
    pub depth: usize,
    /// Never extend `u·v·u⁻¹` by `v⁻¹`
    pub filter_commutator: bool,
}

impl WordSearchParams {
    pub fn new(beam_width: usize, depth: usize) -> Self {
        WordSearchParams {
            beam_width,
            depth,
            filter_commutator: false,
        }
    }

    /// Skip words ending in a commutator, which commuting generators close
    /// trivially
    pub fn without_commutators(beam_width: usize, depth: usize) -> Self {
        WordSearchParams {
            beam_width,
            depth,
            filter_commutator: true,
        }
    }
}

impl Default for WordSearchParams {
    fn default() -> Self {
        Self::new(100, 6)
    }
}
