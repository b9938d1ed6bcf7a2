//! Coarse-grained progress reporting for long enumerations.
//!
//! Purely advisory: callbacks see checkpoints but cannot change results or
//! their order.

/// Which long-running routine produced a checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Four-squares enumeration for one prime
    Enumeration,
    /// Breadth-first expansion of a factorization lattice
    LatticeExpansion,
    /// One depth of the word relation beam search
    WordSearch,
}

/// One checkpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub stage: Stage,
    /// Prime being enumerated, if the stage is tied to one
    pub prime: Option<u64>,
    pub completed: usize,
    /// Known upper bound on `completed`, when one exists
    pub total: Option<usize>,
}

impl Progress {
    /// Completed fraction in `[0, 1]`, when a total is known
    pub fn fraction(&self) -> Option<f64> {
        self.total
            .filter(|&t| t > 0)
            .map(|t| (self.completed as f64 / t as f64).min(1.0))
    }
}

/// Callback that ignores every checkpoint
pub fn silent(_: &Progress) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction() {
        let p = Progress {
            stage: Stage::Enumeration,
            prime: Some(13),
            completed: 3,
            total: Some(12),
        };
        assert_eq!(p.fraction(), Some(0.25));

        let open = Progress { total: None, ..p.clone() };
        assert_eq!(open.fraction(), None);
    }
}
