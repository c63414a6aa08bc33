use thiserror::Error;

/// Failures raised by generation, solving and the history tapes.
///
/// Neither kind is retried anywhere: `AllocFail` is terminal and `LogicFail` is a defect.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MazeError {
    /// A storage growth operation could not obtain memory.
    /// Grid cells written before the failing record call are not rolled back.
    #[error("storage could not grow")]
    AllocFail,
    /// An internal invariant was violated.
    #[error("invariant violated: {0}")]
    LogicFail(&'static str),
}

/// A strategy name that no registry entry answers to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} `{name}`")]
pub struct UnknownStrategy {
    pub kind: &'static str,
    pub name: String,
}

pub type Result<T> = std::result::Result<T, MazeError>;

impl From<std::collections::TryReserveError> for MazeError {
    fn from(_: std::collections::TryReserveError) -> Self {
        MazeError::AllocFail
    }
}
