//! Controller for the peers tab of one torrent.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use flotilla_remote::{PeerList, PeersRepository, RequestError, RequestResult, ServerId};
use flotilla_settings::SettingsStore;
use tokio::sync::watch;
use tracing::warn;

use crate::controller::{LoadState, RefreshController, ReloadAfter, ResourceClient};
use crate::events::EventQueue;

/// Time given to the server to connect newly added peers before the list is
/// re-fetched.
const PEER_APPLY_DELAY: Duration = Duration::from_secs(1);

/// Transient outcomes of peer operations, consumed once by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeersEvent {
    /// A request failed for a reason the screen has no special handling
    /// for; carries the failure for display.
    Error(RequestError),
    /// The server no longer knows the torrent; the screen should leave.
    TorrentNotFound,
    /// The server rejected the submitted peer endpoints.
    PeersInvalid,
    /// The submitted peers were accepted.
    PeersAdded,
    /// The submitted peers were banned server-wide.
    PeersBanned,
}

struct PeersClient {
    repository: Arc<dyn PeersRepository>,
    server: ServerId,
    torrent_hash: String,
}

#[async_trait]
impl ResourceClient for PeersClient {
    type Snapshot = PeerList;
    type Event = PeersEvent;

    async fn fetch(&self) -> RequestResult<PeerList> {
        self.repository
            .fetch_peers(self.server, &self.torrent_hash)
            .await
    }

    fn failure_event(&self, error: RequestError) -> PeersEvent {
        match error {
            RequestError::Api { status: 404, .. } => PeersEvent::TorrentNotFound,
            error => PeersEvent::Error(error),
        }
    }
}

/// Mirrors the peer list of one torrent and applies peer mutations.
///
/// One instance per open peers tab; dropped together with the screen.
pub struct PeersController {
    controller: RefreshController<PeersClient>,
    repository: Arc<dyn PeersRepository>,
    server: ServerId,
    torrent_hash: String,
}

impl PeersController {
    /// Create the controller for `torrent_hash` on `server`.
    ///
    /// Triggers an immediate natural load and begins background polling at
    /// the configured auto-refresh interval whenever the screen is active.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn new(
        server: ServerId,
        torrent_hash: impl Into<String>,
        repository: Arc<dyn PeersRepository>,
        settings: &SettingsStore,
    ) -> (Self, EventQueue<PeersEvent>) {
        let torrent_hash = torrent_hash.into();
        let client = PeersClient {
            repository: Arc::clone(&repository),
            server,
            torrent_hash: torrent_hash.clone(),
        };
        let (controller, events) =
            RefreshController::new(client, settings.auto_refresh_interval.clone());

        (
            Self {
                controller,
                repository,
                server,
                torrent_hash,
            },
            events,
        )
    }

    /// Server hosting the torrent.
    #[must_use]
    pub const fn server(&self) -> ServerId {
        self.server
    }

    /// Info hash of the torrent whose peers are mirrored.
    #[must_use]
    pub fn torrent_hash(&self) -> &str {
        &self.torrent_hash
    }

    /// Current peer list; `None` until the first successful load.
    #[must_use]
    pub fn peers(&self) -> Option<PeerList> {
        self.controller.snapshot()
    }

    /// Live view of the peer list.
    #[must_use]
    pub fn watch_peers(&self) -> watch::Receiver<Option<PeerList>> {
        self.controller.watch_snapshot()
    }

    /// Current loading indicator.
    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.controller.load_state()
    }

    /// Live view of the loading indicator.
    #[must_use]
    pub fn watch_load_state(&self) -> watch::Receiver<LoadState> {
        self.controller.watch_load_state()
    }

    /// Whether a manual refresh is outstanding.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.controller.is_refreshing()
    }

    /// Live view of the manual-refresh flag.
    #[must_use]
    pub fn watch_refreshing(&self) -> watch::Receiver<bool> {
        self.controller.watch_refreshing()
    }

    /// Record a visibility transition of the peers tab.
    pub fn set_screen_active(&self, active: bool) {
        self.controller.set_screen_active(active);
    }

    /// Start a natural (user-visible) reload of the peer list.
    pub fn load(&self) {
        self.controller.load();
    }

    /// Start a manual pull-to-refresh of the peer list.
    pub fn refresh(&self) {
        self.controller.refresh();
    }

    /// Ask the server to connect the torrent to `peers` (`ip:port`
    /// endpoints).
    ///
    /// On success emits [`PeersEvent::PeersAdded`] and reloads the list
    /// after a short delay so the server has time to establish the
    /// connections. A 400 response emits [`PeersEvent::PeersInvalid`]; any
    /// other failure emits [`PeersEvent::Error`]. Failures never re-fetch.
    pub fn add_peers(&self, peers: Vec<String>) {
        let repository = Arc::clone(&self.repository);
        let controller = self.controller.clone();
        let server = self.server;
        let torrent_hash = self.torrent_hash.clone();

        tokio::spawn(async move {
            match repository.add_peers(server, &torrent_hash, &peers).await {
                Ok(()) => {
                    controller.emit(PeersEvent::PeersAdded);
                    controller.reload_after(ReloadAfter::Delayed(PEER_APPLY_DELAY));
                }
                Err(RequestError::Api { status: 400, .. }) => {
                    controller.emit(PeersEvent::PeersInvalid);
                }
                Err(error) => {
                    warn!(error = %error, "adding peers failed");
                    controller.emit(PeersEvent::Error(error));
                }
            }
        });
    }

    /// Ban `peers` (`ip:port` endpoints) across the whole server.
    ///
    /// On success emits [`PeersEvent::PeersBanned`] and reloads the list
    /// immediately; on failure emits [`PeersEvent::Error`] without
    /// re-fetching.
    pub fn ban_peers(&self, peers: Vec<String>) {
        let repository = Arc::clone(&self.repository);
        let controller = self.controller.clone();
        let server = self.server;

        tokio::spawn(async move {
            match repository.ban_peers(server, &peers).await {
                Ok(()) => {
                    controller.emit(PeersEvent::PeersBanned);
                    controller.reload_after(ReloadAfter::Immediate);
                }
                Err(error) => {
                    warn!(error = %error, "banning peers failed");
                    controller.emit(PeersEvent::Error(error));
                }
            }
        });
    }
}
