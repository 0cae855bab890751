//! Error types for preference operations.

use crate::preference::DecodeError;
use thiserror::Error;

/// Primary error type for preference reads and writes.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A stored value could not be decoded into the cell's type.
    ///
    /// Never recovered internally; the store performs no validation of
    /// stored values beyond round-trip decoding.
    #[error("invalid stored value for preference {key:?}")]
    InvalidValue {
        /// Key of the offending cell.
        key: String,
        /// Decode failure detail.
        #[source]
        source: DecodeError,
    },
    /// The underlying storage rejected a write.
    #[error("storage write failed for preference {key:?}")]
    Storage {
        /// Key of the cell being written.
        key: String,
        /// Backend failure detail.
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience alias for preference results.
pub type SettingsResult<T> = Result<T, SettingsError>;
