//! Repository traits implemented by remote server transports.

use crate::error::RequestResult;
use crate::model::{PeerList, ServerId};
use async_trait::async_trait;

/// Peer inspection and management operations for one torrent.
///
/// Implementations are stateless collaborators over the server's HTTP API;
/// the synchronization layer guarantees at most one fetch in flight per
/// screen, so no additional locking is required here.
#[async_trait]
pub trait PeersRepository: Send + Sync {
    /// Retrieve the peers currently connected to a torrent.
    async fn fetch_peers(&self, server: ServerId, torrent_hash: &str) -> RequestResult<PeerList>;

    /// Ask the server to connect a torrent to additional peers.
    ///
    /// Peers are given as `ip:port` endpoint strings.
    async fn add_peers(
        &self,
        server: ServerId,
        torrent_hash: &str,
        peers: &[String],
    ) -> RequestResult<()>;

    /// Permanently ban peers across the whole server.
    ///
    /// Peers are given as `ip:port` endpoint strings.
    async fn ban_peers(&self, server: ServerId, peers: &[String]) -> RequestResult<()>;
}
