use std::io;

use crate::keys::KeyError;

/// Unified run error covering I/O, key material, and stage wiring.
/// - Ergonomic `From<T>` impls enable `?` across the pipeline.
/// - Per-item parse/decrypt failures never surface here; they go to the
///   diagnostic stream and the run continues.
#[derive(Debug)]
pub enum RunError {
    /// I/O error on the output stream.
    Io(io::Error),

    /// Fatal key-material failure (randomness exhaustion).
    Key(KeyError),

    /// A stage channel closed while its peer still needed it.
    Pipeline(&'static str),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Io(e) => write!(f, "I/O error: {}", e),
            RunError::Key(e) => write!(f, "key error: {}", e),
            RunError::Pipeline(msg) => write!(f, "pipeline error: {}", msg),
        }
    }
}

impl std::error::Error for RunError {}

impl From<io::Error> for RunError {
    fn from(e: io::Error) -> Self {
        RunError::Io(e)
    }
}

impl From<KeyError> for RunError {
    fn from(e: KeyError) -> Self {
        RunError::Key(e)
    }
}
