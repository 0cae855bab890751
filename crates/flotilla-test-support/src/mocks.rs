//! Scripted fakes for remote collaborators.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use flotilla_remote::{PeerList, PeersRepository, RequestResult, ServerId};
use tokio::sync::Notify;

/// Peers repository whose responses are scripted by the test.
///
/// Results queue up per operation and are consumed in FIFO order; an empty
/// queue answers fetches with an empty peer list and mutations with
/// success. Fetches can additionally be held open behind a gate so tests
/// can observe in-flight state.
#[derive(Default)]
pub struct ScriptedPeersRepository {
    fetch_results: Mutex<VecDeque<RequestResult<PeerList>>>,
    add_results: Mutex<VecDeque<RequestResult<()>>>,
    ban_results: Mutex<VecDeque<RequestResult<()>>>,
    fetch_calls: AtomicUsize,
    add_calls: AtomicUsize,
    ban_calls: AtomicUsize,
    gate: Mutex<Option<Arc<Notify>>>,
    added: Mutex<Vec<String>>,
    banned: Mutex<Vec<String>>,
}

impl ScriptedPeersRepository {
    /// Create a repository with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next unanswered fetch.
    pub fn queue_fetch(&self, result: RequestResult<PeerList>) {
        self.fetch_results
            .lock()
            .expect("fetch queue poisoned")
            .push_back(result);
    }

    /// Queue a successful fetch answering with `peers`.
    pub fn queue_peers(&self, peers: PeerList) {
        self.queue_fetch(Ok(peers));
    }

    /// Queue the outcome of the next add-peers call.
    pub fn queue_add(&self, result: RequestResult<()>) {
        self.add_results
            .lock()
            .expect("add queue poisoned")
            .push_back(result);
    }

    /// Queue the outcome of the next ban-peers call.
    pub fn queue_ban(&self, result: RequestResult<()>) {
        self.ban_results
            .lock()
            .expect("ban queue poisoned")
            .push_back(result);
    }

    /// Hold every subsequent fetch open until released.
    pub fn hold_fetches(&self) {
        *self.gate.lock().expect("gate poisoned") = Some(Arc::new(Notify::new()));
    }

    /// Let exactly one held fetch proceed.
    pub fn release_fetch(&self) {
        if let Some(gate) = self.gate.lock().expect("gate poisoned").as_ref() {
            gate.notify_one();
        }
    }

    /// Remove the gate, releasing every held fetch.
    pub fn open_fetches(&self) {
        if let Some(gate) = self.gate.lock().expect("gate poisoned").take() {
            gate.notify_waiters();
        }
    }

    /// Number of fetches issued so far (including held ones).
    #[must_use]
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Number of add-peers calls issued so far.
    #[must_use]
    pub fn add_calls(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }

    /// Number of ban-peers calls issued so far.
    #[must_use]
    pub fn ban_calls(&self) -> usize {
        self.ban_calls.load(Ordering::SeqCst)
    }

    /// Every endpoint passed to add-peers, in call order.
    #[must_use]
    pub fn added(&self) -> Vec<String> {
        self.added.lock().expect("added log poisoned").clone()
    }

    /// Every endpoint passed to ban-peers, in call order.
    #[must_use]
    pub fn banned(&self) -> Vec<String> {
        self.banned.lock().expect("banned log poisoned").clone()
    }

    fn current_gate(&self) -> Option<Arc<Notify>> {
        self.gate.lock().expect("gate poisoned").clone()
    }
}

#[async_trait]
impl PeersRepository for ScriptedPeersRepository {
    async fn fetch_peers(&self, _server: ServerId, _torrent_hash: &str) -> RequestResult<PeerList> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = self.current_gate() {
            gate.notified().await;
        }
        self.fetch_results
            .lock()
            .expect("fetch queue poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(PeerList::default()))
    }

    async fn add_peers(
        &self,
        _server: ServerId,
        _torrent_hash: &str,
        peers: &[String],
    ) -> RequestResult<()> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        self.added
            .lock()
            .expect("added log poisoned")
            .extend_from_slice(peers);
        self.add_results
            .lock()
            .expect("add queue poisoned")
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn ban_peers(&self, _server: ServerId, peers: &[String]) -> RequestResult<()> {
        self.ban_calls.fetch_add(1, Ordering::SeqCst);
        self.banned
            .lock()
            .expect("banned log poisoned")
            .extend_from_slice(peers);
        self.ban_results
            .lock()
            .expect("ban queue poisoned")
            .pop_front()
            .unwrap_or(Ok(()))
    }
}
