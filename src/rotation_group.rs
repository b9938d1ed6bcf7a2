//! Finite Rotation Group
//!
//! Orbit closure of `{i, j, 1+i, 1+j}` acting on the projective quaternions
//! by right multiplication. The closure is the rotation group of the cube
//! (the binary octahedral group modulo ±1), 24 elements:
//!
//! - norm 1: `1, i, j, k`
//! - norm 2: `1±i`, `1±j`, `1±k`, `i±j`, `i±k`, `j±k`
//! - norm 4: `1±i±j±k`

use std::cmp::Ordering;
use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::quaternion::projective::ProjectiveQuaternion;
use crate::quaternion::Quaternion;

/// Order of the rotation group of the cube
pub const ROTATION_GROUP_ORDER: usize = 24;

/// The generating set `{i, j, 1+i, 1+j}`
pub fn rotation_generators() -> [Quaternion; 4] {
    [
        Quaternion::i(),
        Quaternion::j(),
        Quaternion::new(1, 1, 0, 0),
        Quaternion::new(1, 0, 1, 0),
    ]
}

/// Enumerate the group, sorted by norm and then by descending coordinates
pub fn generate_rotation_group() -> Vec<Quaternion> {
    let generators: Vec<ProjectiveQuaternion> =
        rotation_generators().iter().map(ProjectiveQuaternion::new).collect();

    let mut seen: HashSet<ProjectiveQuaternion> = HashSet::new();
    let mut frontier = VecDeque::new();
    seen.insert(ProjectiveQuaternion::identity());
    frontier.push_back(ProjectiveQuaternion::identity());

    while let Some(element) = frontier.pop_front() {
        for g in &generators {
            let next = element.multiply(g);
            if seen.insert(next.clone()) {
                frontier.push_back(next);
            }
        }
    }

    let mut group: Vec<Quaternion> = seen.into_iter().map(ProjectiveQuaternion::into_inner).collect();
    group.sort_by(compare_elements);
    debug!(order = group.len(), "rotation group closed");
    group
}

fn compare_elements(x: &Quaternion, y: &Quaternion) -> Ordering {
    x.norm()
        .cmp(&y.norm())
        .then_with(|| y.coords().cmp(&x.coords()))
}
