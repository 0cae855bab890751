//! Generic auto-refreshing controller for one remote resource.

use std::sync::{Arc, Weak};
use std::time::Duration;

use async_trait::async_trait;
use flotilla_remote::{RequestError, RequestResult};
use flotilla_settings::{Preference, PreferenceWatcher};
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::events::EventQueue;

/// Cosmetic delay before the pull-to-refresh indicator clears, so the
/// spinner does not flicker on very fast responses.
const REFRESH_SETTLE_DELAY: Duration = Duration::from_millis(25);

/// What kind of synchronization, if any, is currently in flight.
///
/// `Natural` is surfaced to the user (full-screen spinner on entry or after
/// an error); `Background` is an auto-refresh tick and must stay invisible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    /// No load in flight.
    #[default]
    Idle,
    /// A user-visible load is in flight.
    Natural,
    /// A silent auto-refresh is in flight.
    Background,
}

impl LoadState {
    /// Whether any load is in flight, visible or not.
    #[must_use]
    pub const fn is_loading(self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Whether the in-flight load should be shown to the user.
    #[must_use]
    pub const fn is_natural(self) -> bool {
        matches!(self, Self::Natural)
    }
}

/// When a successful mutation should re-fetch the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadAfter {
    /// Re-fetch right away; the server reflects the change immediately.
    Immediate,
    /// Give the server time to apply the change before re-fetching.
    Delayed(Duration),
}

/// Fetch access to one remote resource, plus the screen's classification of
/// fetch failures into events.
#[async_trait]
pub trait ResourceClient: Send + Sync + 'static {
    /// Snapshot type held as the controller's durable state.
    type Snapshot: Clone + Send + Sync + 'static;
    /// Transient notification type consumed by the UI.
    type Event: Send + 'static;

    /// Fetch the current remote snapshot.
    async fn fetch(&self) -> RequestResult<Self::Snapshot>;

    /// Translate a fetch failure into the event shown for it.
    ///
    /// Every failure maps to exactly one event; recognized status codes may
    /// map to screen-specific events, everything else to a generic error.
    fn failure_event(&self, error: RequestError) -> Self::Event;
}

/// Keeps one remote resource synchronized for one screen.
///
/// The controller owns the resource snapshot, the tri-state loading
/// indicator, the pull-to-refresh flag, and the screen-active input, and it
/// re-evaluates the background-poll decision whenever the configured
/// interval, the loading state, or the screen visibility changes. At most
/// one natural-or-background fetch is in flight at a time; manual refresh is
/// tracked independently and may overlap.
pub struct RefreshController<C: ResourceClient> {
    shared: Arc<Shared<C>>,
}

impl<C: ResourceClient> Clone for RefreshController<C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<C: ResourceClient> RefreshController<C> {
    /// Create the controller and its event queue.
    ///
    /// Creation starts from an empty snapshot, triggers an immediate natural
    /// load, and spawns the background-poll task driven by
    /// `auto_refresh_interval`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn new(client: C, auto_refresh_interval: Preference<u32>) -> (Self, EventQueue<C::Event>) {
        let (events, queue) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            client,
            snapshot: watch::Sender::new(None),
            load_state: watch::Sender::new(LoadState::Idle),
            refreshing: watch::Sender::new(false),
            screen_active: watch::Sender::new(false),
            events,
        });

        Shared::start_load(&shared, LoadState::Natural);

        tokio::spawn(background_poll(
            Arc::downgrade(&shared),
            auto_refresh_interval.watch(),
            shared.load_state.subscribe(),
            shared.screen_active.subscribe(),
        ));

        (Self { shared }, EventQueue::new(queue))
    }

    /// Current snapshot of the resource; `None` until the first successful
    /// load. Failures never clear it.
    #[must_use]
    pub fn snapshot(&self) -> Option<C::Snapshot> {
        self.shared.snapshot.borrow().clone()
    }

    /// Live view of the snapshot.
    #[must_use]
    pub fn watch_snapshot(&self) -> watch::Receiver<Option<C::Snapshot>> {
        self.shared.snapshot.subscribe()
    }

    /// Current loading indicator.
    #[must_use]
    pub fn load_state(&self) -> LoadState {
        *self.shared.load_state.borrow()
    }

    /// Live view of the loading indicator.
    #[must_use]
    pub fn watch_load_state(&self) -> watch::Receiver<LoadState> {
        self.shared.load_state.subscribe()
    }

    /// Whether a manual refresh is outstanding.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        *self.shared.refreshing.borrow()
    }

    /// Live view of the manual-refresh flag.
    #[must_use]
    pub fn watch_refreshing(&self) -> watch::Receiver<bool> {
        self.shared.refreshing.subscribe()
    }

    /// Record a visibility transition of the hosting screen.
    ///
    /// Re-evaluates the background-poll decision; has no other effect.
    /// Repeated transitions to the current state are ignored, so they do not
    /// restart a pending wait.
    pub fn set_screen_active(&self, active: bool) {
        self.shared.screen_active.send_if_modified(|current| {
            if *current == active {
                false
            } else {
                *current = active;
                true
            }
        });
    }

    /// Start a natural (user-visible) load.
    ///
    /// A no-op while any load is already in flight; calls are never queued.
    pub fn load(&self) {
        Shared::start_load(&self.shared, LoadState::Natural);
    }

    /// Start a manual pull-to-refresh.
    ///
    /// Runs independently of the natural/background load gate. A no-op
    /// while a refresh is already outstanding.
    pub fn refresh(&self) {
        Shared::start_refresh(&self.shared);
    }

    /// Push a transient notification onto the event queue.
    pub fn emit(&self, event: C::Event) {
        self.shared.emit(event);
    }

    /// Schedule the natural re-fetch that follows a successful mutation.
    pub fn reload_after(&self, policy: ReloadAfter) {
        match policy {
            ReloadAfter::Immediate => Shared::start_load(&self.shared, LoadState::Natural),
            ReloadAfter::Delayed(delay) => {
                let shared = Arc::clone(&self.shared);
                tokio::spawn(async move {
                    sleep(delay).await;
                    Shared::start_load(&shared, LoadState::Natural);
                });
            }
        }
    }
}

struct Shared<C: ResourceClient> {
    client: C,
    snapshot: watch::Sender<Option<C::Snapshot>>,
    load_state: watch::Sender<LoadState>,
    refreshing: watch::Sender<bool>,
    screen_active: watch::Sender<bool>,
    events: mpsc::UnboundedSender<C::Event>,
}

impl<C: ResourceClient> Shared<C> {
    /// Claim the load gate and run a fetch; a no-op when a load is already
    /// in flight. The gate is an atomic test-and-set on the load-state
    /// channel, so concurrent callers cannot both claim it.
    fn start_load(self: &Arc<Self>, kind: LoadState) {
        debug_assert!(kind.is_loading());
        let claimed = self.load_state.send_if_modified(|state| {
            if state.is_loading() {
                false
            } else {
                *state = kind;
                true
            }
        });
        if !claimed {
            debug!("load already in flight; ignoring");
            return;
        }

        let shared = Arc::clone(self);
        tokio::spawn(async move {
            shared.synchronize().await;
            shared.load_state.send_replace(LoadState::Idle);
        });
    }

    fn start_refresh(self: &Arc<Self>) {
        let claimed = self.refreshing.send_if_modified(|refreshing| {
            if *refreshing {
                false
            } else {
                *refreshing = true;
                true
            }
        });
        if !claimed {
            debug!("refresh already in flight; ignoring");
            return;
        }

        let shared = Arc::clone(self);
        tokio::spawn(async move {
            shared.synchronize().await;
            sleep(REFRESH_SETTLE_DELAY).await;
            shared.refreshing.send_replace(false);
        });
    }

    /// Fetch once and classify the outcome: success replaces the snapshot
    /// and emits nothing; failure leaves the snapshot untouched and emits
    /// exactly one event.
    async fn synchronize(&self) {
        match self.client.fetch().await {
            Ok(snapshot) => {
                self.snapshot.send_replace(Some(snapshot));
            }
            Err(error) => {
                warn!(error = %error, "resource fetch failed");
                self.emit(self.client.failure_event(error));
            }
        }
    }

    fn emit(&self, event: C::Event) {
        if self.events.send(event).is_err() {
            debug!("event dropped; queue consumer is gone");
        }
    }
}

/// Level-triggered background polling.
///
/// Holds the latest value of each input (configured interval, load state,
/// screen visibility). Whenever the screen is active, nothing is in flight,
/// and the interval is non-zero, it waits for exactly the interval and then
/// starts a background load. Any input change while waiting
/// discards the pending wait and restarts the decision from the new inputs;
/// elapsed time is never preserved. An interval of zero disables polling.
async fn background_poll<C: ResourceClient>(
    shared: Weak<Shared<C>>,
    mut interval: PreferenceWatcher<u32>,
    mut load_state: watch::Receiver<LoadState>,
    mut screen_active: watch::Receiver<bool>,
) {
    // The watcher yields the stored interval immediately; without a readable
    // value polling stays disabled until the preference changes.
    let mut interval_secs = match interval.next().await {
        Some(Ok(seconds)) => seconds,
        Some(Err(error)) => {
            warn!(error = %error, "auto-refresh interval unreadable; polling disabled");
            0
        }
        None => return,
    };

    loop {
        let idle = !load_state.borrow_and_update().is_loading();
        let active = *screen_active.borrow_and_update();
        let armed = active && idle && interval_secs > 0;

        tokio::select! {
            changed = interval.next() => match changed {
                Some(Ok(seconds)) => interval_secs = seconds,
                Some(Err(error)) => {
                    warn!(error = %error, "auto-refresh interval unreadable; keeping previous value");
                }
                None => break,
            },
            result = load_state.changed() => {
                if result.is_err() {
                    break;
                }
            }
            result = screen_active.changed() => {
                if result.is_err() {
                    break;
                }
            }
            () = sleep(Duration::from_secs(u64::from(interval_secs))), if armed => {
                let Some(shared) = shared.upgrade() else { break };
                debug!(interval_secs, "background refresh due");
                Shared::start_load(&shared, LoadState::Background);
            }
        }
    }
}
