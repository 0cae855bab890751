//! Durable key/value storage abstraction used by the preference store.
//!
//! Values are opaque strings; each [`crate::preference::Preference`] cell
//! defines the schema for its own key through its encode/decode functions.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::watch;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;

/// Host-supplied durable string storage.
///
/// Reads and writes are synchronous from the caller's perspective; change
/// notifications reach observers on their next scheduling turn.
pub trait KeyValueStorage: Send + Sync {
    /// Read the current raw value for `key`, if one has ever been written.
    fn read_string(&self, key: &str) -> Option<String>;

    /// Persist `value` under `key` and notify observers of the change.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend cannot durably record the write;
    /// in that case observers are not notified.
    fn write_string(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Observe `key`: the stream yields the current raw value immediately,
    /// then every subsequent change, indefinitely.
    fn observe(&self, key: &str) -> ValueStream;
}

/// Stream of raw values for a single key.
///
/// The first item is the value at subscription time (`None` when the key is
/// unset); later items are emitted once per change. The stream ends only
/// when the storage itself is dropped.
pub struct ValueStream {
    inner: WatchStream<Option<String>>,
}

impl ValueStream {
    /// Wrap a watch receiver whose value is the key's current raw string.
    ///
    /// The stream yields the receiver's value at construction time first,
    /// which is what gives `observe` its current-then-changes contract.
    #[must_use]
    pub fn new(receiver: watch::Receiver<Option<String>>) -> Self {
        Self {
            inner: WatchStream::new(receiver),
        }
    }

    /// Receive the next raw value.
    pub async fn next(&mut self) -> Option<Option<String>> {
        self.inner.next().await
    }
}

/// Per-key change channels shared by the storage backends in this crate.
///
/// Channels are created lazily on first subscription or write and live for
/// the rest of the process, matching the cells they back.
#[derive(Default)]
pub(crate) struct WatchRegistry {
    channels: Mutex<HashMap<String, watch::Sender<Option<String>>>>,
}

impl WatchRegistry {
    /// Publish a new value for `key`, waking observers only when the value
    /// actually changed.
    pub(crate) fn publish(&self, key: &str, value: Option<String>) {
        let mut channels = self.channels.lock().expect("watch registry poisoned");
        if let Some(sender) = channels.get(key) {
            sender.send_if_modified(|current| {
                if *current == value {
                    false
                } else {
                    *current = value;
                    true
                }
            });
        } else {
            channels.insert(key.to_owned(), watch::Sender::new(value));
        }
    }

    /// Subscribe to `key`, seeding the channel with `current` when no
    /// observer or writer has touched the key yet.
    pub(crate) fn subscribe(
        &self,
        key: &str,
        current: Option<String>,
    ) -> watch::Receiver<Option<String>> {
        let mut channels = self.channels.lock().expect("watch registry poisoned");
        channels
            .entry(key.to_owned())
            .or_insert_with(|| watch::Sender::new(current))
            .subscribe()
    }
}

/// Process-local storage backend for tests and ephemeral hosts.
///
/// Values do not survive the process; everything else behaves exactly like
/// a durable backend, including change notification semantics.
#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
    registry: WatchRegistry,
}

impl MemoryStorage {
    /// Create an empty in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn read_string(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .expect("memory storage poisoned")
            .get(key)
            .cloned()
    }

    fn write_string(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values
            .lock()
            .expect("memory storage poisoned")
            .insert(key.to_owned(), value.to_owned());
        self.registry.publish(key, Some(value.to_owned()));
        Ok(())
    }

    fn observe(&self, key: &str) -> ValueStream {
        ValueStream::new(self.registry.subscribe(key, self.read_string(key)))
    }
}
