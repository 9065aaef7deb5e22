use std::{io, path::PathBuf};

use thiserror::Error;
use tokio::task::JoinError;

pub type Result<T, E = LedError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum LedError {
    /// Intensity outside `[0, 1]`. Raised before any I/O.
    #[error("led intensity must be between 0 and 1, got {0}")]
    OutOfRange(f64),

    /// Negative (or NaN) frequency. Raised before any state change.
    #[error("frequency must be greater or equal to 0, got {0}")]
    InvalidFrequency(f64),

    #[error("i/o failure on {}: {source}", path.display())]
    DeviceIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid max_brightness in {}: {value:?}", path.display())]
    InvalidMaxBrightness { path: PathBuf, value: String },

    /// An earlier open of this led failed; it is not retried.
    #[error("led {name} failed to open earlier: {reason}")]
    OpenFailed { name: String, reason: String },

    #[error("led {0} is closed")]
    Closed(String),

    /// A fan-out task panicked or was aborted before finishing its writes.
    #[error("update task failed: {0}")]
    Task(#[from] JoinError),
}

impl LedError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LedError::DeviceIo {
            path: path.into(),
            source,
        }
    }
}
