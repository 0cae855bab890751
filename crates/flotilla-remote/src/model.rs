//! Wire DTOs shared by remote repository implementations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a configured remote server within the host's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerId(pub i32);

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One peer connected to a torrent, as reported by the remote server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TorrentPeer {
    /// Peer IP address.
    pub ip: String,
    /// Peer port.
    pub port: u16,
    /// Client software advertised by the peer.
    #[serde(default)]
    pub client: String,
    /// Connection type (e.g. BT, uTP, Web).
    #[serde(default)]
    pub connection: String,
    /// ISO country code, when the server resolves it.
    #[serde(default)]
    pub country_code: Option<String>,
    /// Compact peer flags string.
    #[serde(default)]
    pub flags: String,
    /// Expanded description of the peer flags.
    #[serde(default)]
    pub flags_desc: String,
    /// Current download rate from this peer, bytes per second.
    #[serde(default)]
    pub dl_speed: u64,
    /// Current upload rate to this peer, bytes per second.
    #[serde(default)]
    pub up_speed: u64,
    /// Total bytes downloaded from this peer.
    #[serde(default)]
    pub downloaded: u64,
    /// Total bytes uploaded to this peer.
    #[serde(default)]
    pub uploaded: u64,
    /// Fraction of the torrent the peer reports having (0.0 - 1.0).
    #[serde(default)]
    pub progress: f64,
    /// Fraction of the pieces we still need that the peer has (0.0 - 1.0).
    #[serde(default)]
    pub relevance: f64,
}

impl TorrentPeer {
    /// Canonical `ip:port` endpoint string for the peer.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}

/// Snapshot of every peer connected to one torrent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PeerList {
    /// Connected peers, in server order.
    pub peers: Vec<TorrentPeer>,
}

impl PeerList {
    /// Number of connected peers in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    /// Whether the snapshot contains no peers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peer_decodes_from_server_json() {
        let payload = serde_json::json!({
            "ip": "203.0.113.7",
            "port": 51413,
            "client": "qBittorrent/5.0.1",
            "connection": "BT",
            "country_code": "de",
            "flags": "D X",
            "flags_desc": "interested(local) peer-exchange",
            "dl_speed": 1_048_576,
            "up_speed": 2048,
            "downloaded": 33_554_432,
            "uploaded": 65_536,
            "progress": 0.42,
            "relevance": 0.9
        });

        let peer: TorrentPeer = serde_json::from_value(payload).expect("peer should decode");
        assert_eq!(peer.endpoint(), "203.0.113.7:51413");
        assert_eq!(peer.country_code.as_deref(), Some("de"));
        assert_eq!(peer.dl_speed, 1_048_576);
    }

    #[test]
    fn peer_tolerates_sparse_payloads() {
        let payload = serde_json::json!({ "ip": "198.51.100.2", "port": 6881 });
        let peer: TorrentPeer = serde_json::from_value(payload).expect("peer should decode");
        assert!(peer.client.is_empty());
        assert_eq!(peer.country_code, None);
        assert_eq!(peer.progress, 0.0);
    }

    #[test]
    fn peer_list_reports_emptiness() {
        let list = PeerList::default();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
    }
}
