// ⚠️ Game Errors - one enum for every failure the library can report
//
// The console front-end wraps these in anyhow at the edges; inside the
// library every fallible operation returns GameResult<T>.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// Rejected constructor or setter argument (empty name, negative level, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A save-file line could not be turned back into a value
    #[error("Invalid data at line {line}: {reason}")]
    InvalidData { line: usize, reason: String },

    #[error("Item not found in inventory: {0}")]
    ItemNotFound(String),

    #[error("{0} is already equipped")]
    AlreadyEquipped(String),

    #[error("User not found: {0}")]
    UserNotFound(i64),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// The hero's health reached zero
    #[error("{0} has been defeated!")]
    Defeated(String),

    #[error("Queue is empty")]
    EmptyQueue,

    /// An arena worker thread panicked instead of returning
    #[error("Arena thread failed: {0}")]
    ThreadPanicked(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl GameError {
    pub fn invalid_data(line: usize, reason: impl Into<String>) -> Self {
        GameError::InvalidData {
            line,
            reason: reason.into(),
        }
    }

    /// Errors that end a campaign rather than a single action
    pub fn is_fatal(&self) -> bool {
        matches!(self, GameError::Defeated(_))
    }
}

pub type GameResult<T> = Result<T, GameError>;

/// Parse one numeric field of a save record, reporting the line on failure
pub(crate) fn parse_field<T: std::str::FromStr>(
    raw: &str,
    field: &str,
    line: usize,
) -> GameResult<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| GameError::invalid_data(line, format!("bad {}: {:?}", field, raw)))
}
