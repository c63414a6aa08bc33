//! Perfect-maze generation and solving over a bit-packed grid.
//!
//! Every cell mutation is recorded on a replayable [`history::Tape`]: one tape
//! for building, one for solving. Solvers can race several worker threads over
//! the same grid; the first worker to reach the finish records its path.

pub mod config;
pub mod error;
pub mod generators;
pub mod history;
pub mod maze;
pub mod queue;
pub mod solvers;

pub use config::MazeConfig;
pub use error::{MazeError, Result};
pub use generators::Generator;
pub use history::{Burst, Delta, Tape};
pub use maze::{Cell, Grid, Maze, Playback, Point};
pub use solvers::{SolveOutcome, Solver};
