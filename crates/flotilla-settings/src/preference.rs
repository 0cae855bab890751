//! Typed preference cells over raw string storage.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::error::{SettingsError, SettingsResult};
use crate::storage::{KeyValueStorage, ValueStream};

/// Failure to turn a stored string back into a typed value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("expected {expected}, got {value:?}")]
pub struct DecodeError {
    /// The raw string that failed to decode.
    pub value: String,
    /// Description of the representation the decoder expected.
    pub expected: &'static str,
}

impl DecodeError {
    /// Build a decode failure for `value`, describing what was expected.
    #[must_use]
    pub fn new(value: impl Into<String>, expected: &'static str) -> Self {
        Self {
            value: value.into(),
            expected,
        }
    }
}

/// Types with a native string representation in the storage layer.
///
/// Cells holding such types need no custom codec; for anything else (e.g.
/// colors packed into hex digits) supply explicit encode/decode functions
/// through [`Preference::with_codec`].
pub trait PreferenceValue: Clone + Send + Sync + 'static {
    /// Render the value in its stored form.
    fn encode(&self) -> String;

    /// Parse a value from its stored form.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when `raw` is not a valid representation.
    fn decode(raw: &str) -> Result<Self, DecodeError>;
}

impl PreferenceValue for bool {
    fn encode(&self) -> String {
        self.to_string()
    }

    fn decode(raw: &str) -> Result<Self, DecodeError> {
        raw.parse()
            .map_err(|_| DecodeError::new(raw, "\"true\" or \"false\""))
    }
}

impl PreferenceValue for i32 {
    fn encode(&self) -> String {
        self.to_string()
    }

    fn decode(raw: &str) -> Result<Self, DecodeError> {
        raw.parse()
            .map_err(|_| DecodeError::new(raw, "a 32-bit signed integer"))
    }
}

impl PreferenceValue for u32 {
    fn encode(&self) -> String {
        self.to_string()
    }

    fn decode(raw: &str) -> Result<Self, DecodeError> {
        raw.parse()
            .map_err(|_| DecodeError::new(raw, "a 32-bit unsigned integer"))
    }
}

impl PreferenceValue for String {
    fn encode(&self) -> String {
        self.clone()
    }

    fn decode(raw: &str) -> Result<Self, DecodeError> {
        Ok(raw.to_owned())
    }
}

type EncodeFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
type DecodeFn<T> = Arc<dyn Fn(&str) -> Result<T, DecodeError> + Send + Sync>;

/// One named, typed setting backed by durable storage.
///
/// Cells are created once at store construction and never destroyed within
/// a process lifetime; handles are cheap to clone and all clones share the
/// same backing storage.
pub struct Preference<T> {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    default: T,
    encode: EncodeFn<T>,
    decode: DecodeFn<T>,
}

impl<T> Clone for Preference<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            key: self.key.clone(),
            default: self.default.clone(),
            encode: Arc::clone(&self.encode),
            decode: Arc::clone(&self.decode),
        }
    }
}

impl<T> Preference<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a cell with an explicit codec.
    ///
    /// `decode(encode(v))` must reproduce `v` for every valid value.
    pub fn with_codec(
        storage: &Arc<dyn KeyValueStorage>,
        key: impl Into<String>,
        default: T,
        encode: impl Fn(&T) -> String + Send + Sync + 'static,
        decode: impl Fn(&str) -> Result<T, DecodeError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            storage: Arc::clone(storage),
            key: key.into(),
            default,
            encode: Arc::new(encode),
            decode: Arc::new(decode),
        }
    }

    /// Key under which the cell is stored.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Default value used while the key is unset.
    #[must_use]
    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Read the current value, synchronously.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidValue`] when the stored string cannot
    /// be decoded; the malformed value is left in place.
    pub fn get(&self) -> SettingsResult<T> {
        match self.storage.read_string(&self.key) {
            None => Ok(self.default.clone()),
            Some(raw) => (self.decode)(&raw).map_err(|source| SettingsError::InvalidValue {
                key: self.key.clone(),
                source,
            }),
        }
    }

    /// Persist a new value and notify observers.
    ///
    /// The write is durable once this returns; already-subscribed watchers
    /// observe the new value on their next scheduling turn.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Storage`] when the backend rejects the
    /// write; observers are not notified in that case.
    pub fn set(&self, value: &T) -> SettingsResult<()> {
        let raw = (self.encode)(value);
        self.storage
            .write_string(&self.key, &raw)
            .map_err(|source| SettingsError::Storage {
                key: self.key.clone(),
                source,
            })?;
        debug!(key = %self.key, "preference updated");
        Ok(())
    }

    /// Observe the cell: the watcher yields the current value immediately,
    /// then every subsequent change, indefinitely. Each call starts an
    /// independent subscription.
    #[must_use]
    pub fn watch(&self) -> PreferenceWatcher<T> {
        PreferenceWatcher {
            key: self.key.clone(),
            default: self.default.clone(),
            decode: Arc::clone(&self.decode),
            stream: self.storage.observe(&self.key),
        }
    }
}

impl<T> Preference<T>
where
    T: PreferenceValue,
{
    /// Create a cell using the type's native stored representation.
    pub fn new(storage: &Arc<dyn KeyValueStorage>, key: impl Into<String>, default: T) -> Self {
        Self::with_codec(storage, key, default, T::encode, T::decode)
    }
}

/// Live subscription to one preference cell.
pub struct PreferenceWatcher<T> {
    key: String,
    default: T,
    decode: DecodeFn<T>,
    stream: ValueStream,
}

impl<T> PreferenceWatcher<T>
where
    T: Clone,
{
    /// Receive the next value.
    ///
    /// Yields `Some(Err(_))` when a stored value cannot be decoded, leaving
    /// the subscription intact; `None` only when the storage is gone.
    pub async fn next(&mut self) -> Option<SettingsResult<T>> {
        let raw = self.stream.next().await?;
        Some(match raw {
            None => Ok(self.default.clone()),
            Some(raw) => (self.decode)(&raw).map_err(|source| SettingsError::InvalidValue {
                key: self.key.clone(),
                source,
            }),
        })
    }
}
