mod common;

use common::{arrival, bus_stop, key, paddington, FakeLocation, FakeTransit};
use nearboard::config::SecureString;
use nearboard::refresh::{RefreshCommand, RefreshOrchestrator, RefreshRunner};
use nearboard::shutdown::ShutdownHandle;
use nearboard::ui::dashboard::DashboardState;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

const INTERVAL: Duration = Duration::from_secs(30);

struct Running {
    location: FakeLocation,
    transit: FakeTransit,
    commands: mpsc::UnboundedSender<RefreshCommand>,
    state: watch::Receiver<DashboardState>,
    shutdown: ShutdownHandle,
    task: JoinHandle<()>,
}

fn two_stops() -> FakeTransit {
    let transit = FakeTransit::with_stops(vec![bus_stop("a", 40.0), bus_stop("b", 90.0)]);
    transit.set_arrivals("a", vec![arrival("94", 120)]);
    transit.set_arrivals("b", vec![arrival("148", 300)]);
    transit
}

fn spawn_runner(transit: FakeTransit, credential: SecureString) -> Running {
    let location = FakeLocation::at(paddington());
    let (state_tx, state_rx) = watch::channel(DashboardState::initial());
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let shutdown = ShutdownHandle::new();

    let orchestrator =
        RefreshOrchestrator::new(location.clone(), transit.clone(), state_tx, credential);
    let runner = RefreshRunner::new(orchestrator, command_rx, INTERVAL, shutdown.clone());
    let task = tokio::spawn(runner.run());

    Running {
        location,
        transit,
        commands: command_tx,
        state: state_rx,
        shutdown,
        task,
    }
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

#[tokio::test(start_paused = true)]
async fn starts_with_a_full_refresh() {
    let running = spawn_runner(two_stops(), key());
    settle().await;

    assert_eq!(running.location.calls(), 1);
    assert_eq!(running.transit.nearby_calls(), 1);
    let state = running.state.borrow().clone();
    assert_eq!(state.stops.len(), 2);
    assert!(!state.is_refreshing);
}

#[tokio::test(start_paused = true)]
async fn timer_refreshes_arrivals_only() {
    let running = spawn_runner(two_stops(), key());
    settle().await;
    assert_eq!(running.transit.arrival_calls(), 2);

    tokio::time::sleep(INTERVAL + Duration::from_secs(1)).await;

    assert_eq!(running.location.calls(), 1);
    assert_eq!(running.transit.nearby_calls(), 1);
    assert_eq!(running.transit.arrival_calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn no_tick_before_the_interval() {
    let running = spawn_runner(two_stops(), key());
    settle().await;

    tokio::time::sleep(INTERVAL - Duration::from_secs(1)).await;

    assert_eq!(running.transit.arrival_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn requests_during_a_cycle_coalesce_into_one() {
    let transit = two_stops();
    transit.set_delay(Duration::from_secs(2));
    let running = spawn_runner(transit, key());

    running.commands.send(RefreshCommand::ArrivalsOnly).unwrap();
    running.commands.send(RefreshCommand::Full).unwrap();
    running.commands.send(RefreshCommand::ArrivalsOnly).unwrap();

    tokio::time::sleep(Duration::from_secs(10)).await;

    // Initial cycle plus exactly one follow-up, which is a full refresh.
    assert_eq!(running.location.calls(), 2);
    assert_eq!(running.transit.nearby_calls(), 2);
    assert_eq!(running.transit.arrival_calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn arrivals_request_between_cycles_skips_location() {
    let running = spawn_runner(two_stops(), key());
    settle().await;

    running.commands.send(RefreshCommand::ArrivalsOnly).unwrap();
    settle().await;

    assert_eq!(running.location.calls(), 1);
    assert_eq!(running.transit.arrival_calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn full_request_between_cycles_relocates() {
    let running = spawn_runner(two_stops(), key());
    settle().await;

    running.commands.send(RefreshCommand::Full).unwrap();
    settle().await;

    assert_eq!(running.location.calls(), 2);
    assert_eq!(running.transit.nearby_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn new_credential_triggers_full_refresh() {
    let running = spawn_runner(two_stops(), SecureString::default());
    settle().await;
    assert_eq!(running.transit.nearby_calls(), 0);
    assert!(running.state.borrow().error.is_some());

    running
        .commands
        .send(RefreshCommand::SetCredential(key()))
        .unwrap();
    settle().await;

    assert_eq!(running.transit.nearby_calls(), 1);
    let state = running.state.borrow().clone();
    assert_eq!(state.stops.len(), 2);
    assert_eq!(state.error, None);
}

#[tokio::test(start_paused = true)]
async fn test_location_toggle_triggers_full_refresh() {
    let running = spawn_runner(two_stops(), key());
    settle().await;

    running
        .commands
        .send(RefreshCommand::SetTestLocation(true))
        .unwrap();
    settle().await;

    assert_eq!(running.location.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_the_runner() {
    let running = spawn_runner(two_stops(), key());
    settle().await;

    running.shutdown.signal();
    tokio::time::timeout(Duration::from_secs(1), running.task)
        .await
        .expect("runner should stop on shutdown")
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn shutdown_interrupts_a_cycle_in_flight() {
    let transit = two_stops();
    transit.set_delay(Duration::from_secs(60));
    let running = spawn_runner(transit, key());
    settle().await;

    running.shutdown.signal();
    tokio::time::timeout(Duration::from_secs(1), running.task)
        .await
        .expect("runner should not wait for the cycle")
        .unwrap();
}

#[tokio::test(start_paused = true)]
async fn dropping_all_senders_stops_the_runner() {
    let Running { commands, task, .. } = spawn_runner(two_stops(), key());
    settle().await;

    drop(commands);
    tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("runner should stop when the front-end is gone")
        .unwrap();
}
