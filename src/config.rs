use rand::{SeedableRng, rngs::StdRng};

use crate::generators::Generator;
use crate::solvers::Solver;

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Everything needed to build and solve one maze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeConfig {
    /// Requested rows; rounded up to an odd number by the grid.
    pub rows: usize,
    /// Requested columns; rounded up to an odd number by the grid.
    pub cols: usize,
    pub generator: Generator,
    pub solver: Solver,
    /// Fixed seed for reproducible runs. `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            rows: 21,
            cols: 41,
            generator: Generator::RecurBacktrack,
            solver: Solver::BfsRace,
            seed: None,
        }
    }
}

impl MazeConfig {
    pub fn rng(&self) -> StdRng {
        get_rng(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_seeded_rng_repeats() {
        let config = MazeConfig {
            seed: Some(17),
            ..MazeConfig::default()
        };
        let a = config.rng().random::<u64>();
        let b = config.rng().random::<u64>();
        assert_eq!(a, b);
    }
}
