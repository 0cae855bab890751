//! Reactive synchronization of remote resources for interactive screens.
//!
//! Each screen owns a [`RefreshController`] that keeps a snapshot of one
//! remote resource current: it issues a user-visible load on entry, polls in
//! the background while the screen is visible, serves manual pull-to-refresh
//! requests, and re-fetches after mutations. Transient outcomes (failures,
//! confirmations) travel through a deliver-once [`EventQueue`]; the snapshot
//! itself is durable state, re-readable at any time.

pub mod controller;
pub mod events;
pub mod peers;

pub use controller::{LoadState, RefreshController, ReloadAfter, ResourceClient};
pub use events::EventQueue;
pub use peers::{PeersController, PeersEvent};
