//! Load gating, pull-to-refresh, and background polling behavior.

use std::sync::Arc;
use std::time::Duration;

use flotilla_remote::{PeersRepository, RequestError, RequestResult, ServerId};
use flotilla_settings::{MemoryStorage, SettingsStore};
use flotilla_sync::{
    EventQueue, LoadState, PeersController, PeersEvent, RefreshController, ResourceClient,
};
use flotilla_test_support::fixtures::sample_peers;
use flotilla_test_support::mocks::ScriptedPeersRepository;
use tokio::time::advance;

fn settings_with_interval(seconds: u32) -> SettingsStore {
    let settings = SettingsStore::new(Arc::new(MemoryStorage::new()));
    settings.auto_refresh_interval.set(&seconds).unwrap();
    settings
}

fn peers_controller(
    repository: &Arc<ScriptedPeersRepository>,
    interval: u32,
) -> (PeersController, EventQueue<PeersEvent>, SettingsStore) {
    let settings = settings_with_interval(interval);
    let repository: Arc<dyn PeersRepository> = repository.clone();
    let (controller, events) = PeersController::new(ServerId(1), "a1b2c3d4", repository, &settings);
    (controller, events, settings)
}

/// Run every ready task without letting the paused clock advance.
async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn construction_triggers_an_immediate_natural_load() {
    let repository = Arc::new(ScriptedPeersRepository::new());
    repository.queue_peers(sample_peers(2));
    let (controller, _events, _settings) = peers_controller(&repository, 0);

    // The load is claimed synchronously, before the fetch itself runs.
    assert_eq!(controller.load_state(), LoadState::Natural);
    assert_eq!(controller.peers(), None);

    settle().await;
    assert_eq!(repository.fetch_calls(), 1);
    assert_eq!(controller.load_state(), LoadState::Idle);
    assert_eq!(controller.peers(), Some(sample_peers(2)));
}

#[tokio::test(start_paused = true)]
async fn natural_loads_are_single_flight() {
    let repository = Arc::new(ScriptedPeersRepository::new());
    repository.hold_fetches();
    let (controller, _events, _settings) = peers_controller(&repository, 0);
    settle().await;
    assert_eq!(repository.fetch_calls(), 1);
    assert_eq!(controller.load_state(), LoadState::Natural);

    // Calls while a load is in flight are dropped, never queued.
    controller.load();
    controller.load();
    settle().await;
    assert_eq!(repository.fetch_calls(), 1);
    assert_eq!(controller.load_state(), LoadState::Natural);

    repository.release_fetch();
    settle().await;
    assert_eq!(controller.load_state(), LoadState::Idle);

    controller.load();
    settle().await;
    assert_eq!(repository.fetch_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn manual_refresh_clears_only_after_the_settle_delay() {
    let repository = Arc::new(ScriptedPeersRepository::new());
    let (controller, _events, _settings) = peers_controller(&repository, 0);
    settle().await;
    assert_eq!(repository.fetch_calls(), 1);
    assert!(!controller.is_refreshing());

    controller.refresh();
    settle().await;
    // The fetch has already completed, but the indicator holds through the
    // cosmetic delay so it does not flicker.
    assert_eq!(repository.fetch_calls(), 2);
    assert!(controller.is_refreshing());

    advance(Duration::from_millis(25)).await;
    settle().await;
    assert!(!controller.is_refreshing());
}

#[tokio::test(start_paused = true)]
async fn refresh_is_deduplicated_but_independent_of_the_load_gate() {
    let repository = Arc::new(ScriptedPeersRepository::new());
    repository.hold_fetches();
    let (controller, _events, _settings) = peers_controller(&repository, 0);
    settle().await;
    assert_eq!(repository.fetch_calls(), 1);
    assert_eq!(controller.load_state(), LoadState::Natural);

    // Pull-to-refresh proceeds even while the natural load is in flight.
    controller.refresh();
    settle().await;
    assert_eq!(repository.fetch_calls(), 2);
    assert!(controller.is_refreshing());

    // But a second refresh while one is outstanding is a no-op.
    controller.refresh();
    settle().await;
    assert_eq!(repository.fetch_calls(), 2);

    repository.open_fetches();
    settle().await;
    assert_eq!(controller.load_state(), LoadState::Idle);

    advance(Duration::from_millis(25)).await;
    settle().await;
    assert!(!controller.is_refreshing());
}

#[tokio::test(start_paused = true)]
async fn background_poll_fires_after_exactly_the_configured_interval() {
    let repository = Arc::new(ScriptedPeersRepository::new());
    let (controller, _events, _settings) = peers_controller(&repository, 3);
    controller.set_screen_active(true);
    settle().await;
    assert_eq!(repository.fetch_calls(), 1);

    advance(Duration::from_millis(2_900)).await;
    settle().await;
    assert_eq!(repository.fetch_calls(), 1);

    advance(Duration::from_millis(100)).await;
    settle().await;
    assert_eq!(repository.fetch_calls(), 2);

    // The cycle repeats once the background load settles back to idle.
    advance(Duration::from_secs(3)).await;
    settle().await;
    assert_eq!(repository.fetch_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn background_loads_never_surface_the_visible_indicator() {
    let repository = Arc::new(ScriptedPeersRepository::new());
    let (controller, _events, _settings) = peers_controller(&repository, 2);
    controller.set_screen_active(true);
    settle().await;
    assert_eq!(repository.fetch_calls(), 1);

    repository.hold_fetches();
    advance(Duration::from_secs(2)).await;
    settle().await;
    assert_eq!(repository.fetch_calls(), 2);
    assert_eq!(controller.load_state(), LoadState::Background);
    assert!(!controller.load_state().is_natural());

    repository.open_fetches();
    settle().await;
    assert_eq!(controller.load_state(), LoadState::Idle);
}

#[tokio::test(start_paused = true)]
async fn zero_interval_disables_background_polling() {
    let repository = Arc::new(ScriptedPeersRepository::new());
    let (controller, _events, _settings) = peers_controller(&repository, 0);
    controller.set_screen_active(true);
    settle().await;
    assert_eq!(repository.fetch_calls(), 1);

    advance(Duration::from_secs(600)).await;
    settle().await;
    assert_eq!(repository.fetch_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn polling_pauses_while_the_screen_is_inactive() {
    let repository = Arc::new(ScriptedPeersRepository::new());
    let (controller, _events, _settings) = peers_controller(&repository, 3);
    settle().await;
    assert_eq!(repository.fetch_calls(), 1);

    // Never active: no polling at all.
    advance(Duration::from_secs(30)).await;
    settle().await;
    assert_eq!(repository.fetch_calls(), 1);

    controller.set_screen_active(true);
    settle().await;
    advance(Duration::from_secs(2)).await;
    settle().await;

    // Going inactive mid-wait discards the pending tick entirely.
    controller.set_screen_active(false);
    settle().await;
    advance(Duration::from_secs(30)).await;
    settle().await;
    assert_eq!(repository.fetch_calls(), 1);

    // Reactivating restarts the wait from zero, not from where it left off.
    controller.set_screen_active(true);
    settle().await;
    advance(Duration::from_millis(2_900)).await;
    settle().await;
    assert_eq!(repository.fetch_calls(), 1);
    advance(Duration::from_millis(100)).await;
    settle().await;
    assert_eq!(repository.fetch_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn interval_changes_restart_the_wait_from_zero() {
    let repository = Arc::new(ScriptedPeersRepository::new());
    let (controller, _events, settings) = peers_controller(&repository, 10);
    controller.set_screen_active(true);
    settle().await;
    assert_eq!(repository.fetch_calls(), 1);

    // Nine seconds into a ten-second wait, shorten the interval to five.
    advance(Duration::from_secs(9)).await;
    settle().await;
    assert_eq!(repository.fetch_calls(), 1);

    settings.auto_refresh_interval.set(&5).unwrap();
    settle().await;

    // The previous wait is discarded; the new one runs its full length.
    advance(Duration::from_millis(4_900)).await;
    settle().await;
    assert_eq!(repository.fetch_calls(), 1);
    advance(Duration::from_millis(100)).await;
    settle().await;
    assert_eq!(repository.fetch_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn redundant_screen_active_updates_do_not_restart_the_wait() {
    let repository = Arc::new(ScriptedPeersRepository::new());
    let (controller, _events, _settings) = peers_controller(&repository, 3);
    controller.set_screen_active(true);
    settle().await;
    assert_eq!(repository.fetch_calls(), 1);

    advance(Duration::from_secs(2)).await;
    settle().await;
    controller.set_screen_active(true);
    settle().await;

    // Had the no-op update restarted the wait, nothing would fire here.
    advance(Duration::from_secs(1)).await;
    settle().await;
    assert_eq!(repository.fetch_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn event_queue_ends_when_the_controller_is_dropped() {
    let repository = Arc::new(ScriptedPeersRepository::new());
    let (controller, mut events, _settings) = peers_controller(&repository, 0);
    settle().await;

    drop(controller);
    settle().await;
    assert_eq!(events.next().await, None);
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SwarmSizeEvent {
    Unavailable(u16),
    Failed(String),
}

struct SwarmSizeClient {
    repository: Arc<ScriptedPeersRepository>,
}

#[async_trait::async_trait]
impl ResourceClient for SwarmSizeClient {
    type Snapshot = usize;
    type Event = SwarmSizeEvent;

    async fn fetch(&self) -> RequestResult<usize> {
        self.repository
            .fetch_peers(ServerId(9), "ffff")
            .await
            .map(|list| list.len())
    }

    fn failure_event(&self, error: RequestError) -> SwarmSizeEvent {
        match error.status() {
            Some(status) => SwarmSizeEvent::Unavailable(status),
            None => SwarmSizeEvent::Failed(error.to_string()),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn the_controller_is_generic_over_the_resource() {
    let repository = Arc::new(ScriptedPeersRepository::new());
    repository.queue_peers(sample_peers(5));
    repository.queue_fetch(Err(RequestError::api(503)));

    let settings = settings_with_interval(0);
    let client = SwarmSizeClient {
        repository: Arc::clone(&repository),
    };
    let (controller, mut events) =
        RefreshController::new(client, settings.auto_refresh_interval.clone());
    settle().await;
    assert_eq!(controller.snapshot(), Some(5));

    controller.load();
    settle().await;
    assert_eq!(events.try_next(), Some(SwarmSizeEvent::Unavailable(503)));
    // The failed fetch left the previous snapshot in place.
    assert_eq!(controller.snapshot(), Some(5));
}
