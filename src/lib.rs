//! Prime Quaternions
//!
//! Exact arithmetic on integral quaternions of prime norm: canonical
//! generators labelled by P¹(F_p), commuting-square relations between them,
//! factorization lattices and Bruhat–Tits tree addresses. Every coordinate,
//! norm and path count is an arbitrary-precision integer.
//!
//! # Overview
//!
//! ```text
//! quaternion ─▶ modular ─▶ generators ─┬─▶ relations ─▶ complex
//!                                      ├─▶ lattice
//!                                      └─▶ tree_path
//! quaternion ─▶ rotation_group
//! quaternion ─▶ word_search
//! ```
//!
//! Nothing is global: [`generate_generators`] returns a [`GeneratorSet`]
//! that is passed explicitly to [`compute_relations`] (or bundled into a
//! [`SquareComplex`]).
//!
//! # Modules
//!
//! - `quaternion`: integral and projective quaternions, text parsing
//! - `modular`: F_p splitting of the quaternion algebra, P¹ labels
//! - `primes`: Miller-Rabin, norm factorization
//! - `generators`: canonical generators per prime
//! - `relations`: square relations a·b ≃ b′·a′
//! - `complex`: generators plus relations as one context value
//! - `lattice`: factorization lattices
//! - `tree_path`: addresses in the p-adic tree
//! - `rotation_group`: the 24-element rotation group of the cube
//! - `word_search`: beam search for word relations among any quaternions
//!
//! # Example
//!
//! ```
//! use num_bigint::BigUint;
//! use prime_quaternions::prelude::*;
//!
//! let q: Quaternion = "8+i".parse().unwrap();
//! let lattice = factorize(&q).unwrap();
//! let top = lattice.target_node().unwrap();
//! assert_eq!(lattice.count_paths(top), BigUint::from(2u32));
//!
//! let path = tree_path(&q, 13).unwrap();
//! assert!(path.is_complete());
//! ```

pub mod complex;
pub mod error;
pub mod generators;
pub mod lattice;
pub mod modular;
pub mod params;
pub mod primes;
pub mod progress;
pub mod quaternion;
pub mod relations;
pub mod rotation_group;
pub mod tree_path;
pub mod word_search;

pub use complex::SquareComplex;
pub use error::{EngineError, EngineResult};
pub use generators::{generate_generators, Generator, GeneratorId, GeneratorSet};
pub use lattice::{factorize, FactorizationLattice};
pub use modular::P1Point;
pub use quaternion::parse::{format_quaternion, parse_quaternion};
pub use quaternion::projective::ProjectiveQuaternion;
pub use quaternion::Quaternion;
pub use relations::{compute_relations, Relation};
pub use rotation_group::generate_rotation_group;
pub use tree_path::{tree_path, TreePath};
pub use word_search::{search_word_relations, WordRelation};

/// Everything a typical caller needs
pub mod prelude {
    pub use crate::complex::SquareComplex;
    pub use crate::error::{EngineError, EngineResult};
    pub use crate::generators::{generate_generators, Generator, GeneratorId, GeneratorSet};
    pub use crate::lattice::{factorize, FactorizationLattice, LatticeLink, LatticeNode, NodeId};
    pub use crate::modular::P1Point;
    pub use crate::params::{LatticeParams, RelationParams, WordSearchParams};
    pub use crate::quaternion::parse::{format_quaternion, parse_quaternion};
    pub use crate::quaternion::projective::{normalize, ProjectiveQuaternion};
    pub use crate::quaternion::Quaternion;
    pub use crate::relations::{compute_relations, Relation};
    pub use crate::rotation_group::generate_rotation_group;
    pub use crate::tree_path::{tree_path, TreePath, TreePathStep};
    pub use crate::word_search::{search_word_relations, Letter, RelationValue, WordRelation};
}
