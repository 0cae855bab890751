//! Sample data builders shared across suites.

use flotilla_remote::{PeerList, TorrentPeer};

/// Build a peer at `ip:port` with plausible transfer statistics.
#[must_use]
pub fn peer(ip: &str, port: u16) -> TorrentPeer {
    TorrentPeer {
        ip: ip.to_owned(),
        port,
        client: "qBittorrent/5.0.1".to_owned(),
        connection: "BT".to_owned(),
        country_code: Some("nl".to_owned()),
        flags: "D X".to_owned(),
        flags_desc: "interested(local) peer-exchange".to_owned(),
        dl_speed: 256 * 1024,
        up_speed: 32 * 1024,
        downloaded: 10 * 1024 * 1024,
        uploaded: 1024 * 1024,
        progress: 0.5,
        relevance: 1.0,
    }
}

/// Build a snapshot of `count` distinct peers.
#[must_use]
pub fn sample_peers(count: usize) -> PeerList {
    let peers = (0..count)
        .map(|index| {
            let octet = u8::try_from(index % 250).expect("octet fits in u8");
            peer(&format!("10.0.0.{}", octet + 1), 6881 + u16::from(octet))
        })
        .collect();
    PeerList { peers }
}
