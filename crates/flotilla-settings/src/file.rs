//! JSON file backend for the preference storage.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use tracing::debug;

use crate::storage::{KeyValueStorage, ValueStream, WatchRegistry};

/// Durable storage persisting all keys as one flat JSON document.
///
/// Writes go through a temporary file followed by a rename, so a crash
/// mid-write never leaves a truncated document behind. The full map is kept
/// in memory; reads never touch the filesystem.
pub struct JsonFileStorage {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
    registry: WatchRegistry,
}

impl JsonFileStorage {
    /// Open the storage at `path`, loading any previously persisted values.
    ///
    /// A missing file is treated as an empty store; it is created on the
    /// first write.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("malformed settings file {}", path.display()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read settings file {}", path.display()));
            }
        };
        debug!(path = %path.display(), entries = values.len(), "settings file loaded");

        Ok(Self {
            path,
            values: Mutex::new(values),
            registry: WatchRegistry::default(),
        })
    }

    /// Path of the backing JSON document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &HashMap<String, String>) -> anyhow::Result<()> {
        let payload = serde_json::to_string_pretty(values).context("serializing settings")?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, payload)
            .with_context(|| format!("writing settings to {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing settings file {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn read_string(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .expect("settings file cache poisoned")
            .get(key)
            .cloned()
    }

    fn write_string(&self, key: &str, value: &str) -> anyhow::Result<()> {
        {
            let mut values = self.values.lock().expect("settings file cache poisoned");
            values.insert(key.to_owned(), value.to_owned());
            self.persist(&values)?;
        }
        self.registry.publish(key, Some(value.to_owned()));
        Ok(())
    }

    fn observe(&self, key: &str) -> ValueStream {
        ValueStream::new(self.registry.subscribe(key, self.read_string(key)))
    }
}
