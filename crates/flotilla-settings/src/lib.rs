#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Typed, reactive user preferences backed by durable key/value storage.
//!
//! Layout: `storage.rs` (storage abstraction + in-memory backend), `file.rs`
//! (JSON file backend), `preference.rs` (typed cells and their watchers),
//! `model.rs` (setting value types), `store.rs` (the process-wide catalogue).

pub mod error;
pub mod file;
pub mod model;
pub mod preference;
pub mod storage;
pub mod store;

pub use error::{SettingsError, SettingsResult};
pub use file::JsonFileStorage;
pub use model::{AppColor, SearchSort, Theme, TorrentFilter, TorrentSort};
pub use preference::{DecodeError, Preference, PreferenceValue, PreferenceWatcher};
pub use storage::{KeyValueStorage, MemoryStorage, ValueStream};
pub use store::SettingsStore;
