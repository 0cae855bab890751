//! Server-agnostic remote torrent interfaces and DTOs.
//!
//! The rest of the workspace talks to remote torrent servers exclusively
//! through the traits defined here; concrete HTTP transports live in the
//! host application and are injected at construction time.

pub mod error;
pub mod model;
pub mod repository;

pub use error::{RequestError, RequestResult};
pub use model::{PeerList, ServerId, TorrentPeer};
pub use repository::PeersRepository;
