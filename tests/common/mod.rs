//! Shared test utilities: fixtures, fake collaborators and the mock server.

#![allow(dead_code, unused_imports)]

pub mod mock_server;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use nearboard::config::{ApiConfig, CredentialStore, SecureString};
use nearboard::location::{LocationError, LocationProvider};
use nearboard::refresh::{RefreshCommand, StatePublisher};
use nearboard::transit::{Arrival, Coordinates, Stop, StopKind, TransitApi, TransitError};
use nearboard::ui::app::App;
use nearboard::ui::dashboard::DashboardState;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::{mpsc, watch};

pub fn key() -> SecureString {
    SecureString::new("test-app-key")
}

pub fn paddington() -> Coordinates {
    Coordinates::new(51.5154, -0.1755)
}

// -- Fixtures -----------------------------------------------------------------

pub fn bus_stop(id: &str, distance: f64) -> Stop {
    Stop {
        id: id.to_string(),
        name: format!("Stop {}", id),
        kind: StopKind::Bus,
        distance,
        towards: None,
        direction: None,
        stop_letter: None,
        disrupted: false,
        arrivals: Vec::new(),
    }
}

pub fn station(id: &str, distance: f64) -> Stop {
    Stop {
        kind: StopKind::MetroStation,
        ..bus_stop(id, distance)
    }
}

pub fn arrival(line: &str, seconds: u32) -> Arrival {
    Arrival {
        line_id: line.to_lowercase(),
        line_name: line.to_string(),
        platform: None,
        towards: None,
        destination: format!("{} terminus", line),
        time_to_station: seconds,
    }
}

pub fn platform_arrival(line: &str, platform: &str, towards: &str, seconds: u32) -> Arrival {
    Arrival {
        platform: Some(platform.to_string()),
        towards: Some(towards.to_string()),
        ..arrival(line, seconds)
    }
}

/// Temporary directory holding a config file with `content`.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

pub fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 5,
        connect_timeout_seconds: 2,
        ..ApiConfig::default()
    }
}

// -- Fake location ------------------------------------------------------------

/// Location provider whose answer can be changed between cycles.
#[derive(Clone)]
pub struct FakeLocation {
    result: Arc<Mutex<Result<Coordinates, LocationError>>>,
    calls: Arc<AtomicUsize>,
}

impl FakeLocation {
    pub fn at(coordinates: Coordinates) -> Self {
        Self {
            result: Arc::new(Mutex::new(Ok(coordinates))),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fail_with(&self, error: LocationError) {
        *self.result.lock() = Err(error);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationProvider for FakeLocation {
    async fn resolve(&self, _max_cached_age: Duration) -> Result<Coordinates, LocationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.lock().clone()
    }
}

// -- Fake transit API ---------------------------------------------------------

#[derive(Default)]
struct FakeTransitState {
    stops: Mutex<Option<Result<Vec<Stop>, TransitError>>>,
    arrivals: Mutex<HashMap<String, Result<Vec<Arrival>, TransitError>>>,
    delay: Mutex<Duration>,
    nearby_calls: AtomicUsize,
    arrival_calls: AtomicUsize,
    seen_credentials: Mutex<Vec<String>>,
}

/// In-memory transit API with per-stop scripted arrivals.
#[derive(Clone, Default)]
pub struct FakeTransit {
    inner: Arc<FakeTransitState>,
}

impl FakeTransit {
    pub fn with_stops(stops: Vec<Stop>) -> Self {
        let fake = Self::default();
        fake.set_stops(stops);
        fake
    }

    pub fn set_stops(&self, stops: Vec<Stop>) {
        *self.inner.stops.lock() = Some(Ok(stops));
    }

    pub fn fail_stops(&self, error: TransitError) {
        *self.inner.stops.lock() = Some(Err(error));
    }

    pub fn set_arrivals(&self, stop_id: &str, arrivals: Vec<Arrival>) {
        self.inner
            .arrivals
            .lock()
            .insert(stop_id.to_string(), Ok(arrivals));
    }

    pub fn fail_arrivals(&self, stop_id: &str, error: TransitError) {
        self.inner
            .arrivals
            .lock()
            .insert(stop_id.to_string(), Err(error));
    }

    /// Every call sleeps this long first (on the tokio clock).
    pub fn set_delay(&self, delay: Duration) {
        *self.inner.delay.lock() = delay;
    }

    pub fn nearby_calls(&self) -> usize {
        self.inner.nearby_calls.load(Ordering::SeqCst)
    }

    pub fn arrival_calls(&self) -> usize {
        self.inner.arrival_calls.load(Ordering::SeqCst)
    }

    pub fn seen_credentials(&self) -> Vec<String> {
        self.inner.seen_credentials.lock().clone()
    }

    async fn pause(&self) {
        let delay = *self.inner.delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl TransitApi for FakeTransit {
    async fn find_nearby_stops(
        &self,
        _at: Coordinates,
        credential: &SecureString,
    ) -> Result<Vec<Stop>, TransitError> {
        self.inner.nearby_calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .seen_credentials
            .lock()
            .push(credential.expose().to_string());
        self.pause().await;
        let scripted = self.inner.stops.lock().clone();
        scripted.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn fetch_arrivals(
        &self,
        stop_id: &str,
        _credential: &SecureString,
    ) -> Result<Vec<Arrival>, TransitError> {
        self.inner.arrival_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        let scripted = self.inner.arrivals.lock().get(stop_id).cloned();
        scripted.unwrap_or_else(|| Ok(Vec::new()))
    }
}

// -- Recording publisher ------------------------------------------------------

/// Keeps every published snapshot.
#[derive(Clone, Default)]
pub struct RecordingPublisher {
    published: Arc<Mutex<Vec<DashboardState>>>,
}

impl RecordingPublisher {
    pub fn snapshots(&self) -> Vec<DashboardState> {
        self.published.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.published.lock().len()
    }

    pub fn clear(&self) {
        self.published.lock().clear();
    }
}

impl StatePublisher for RecordingPublisher {
    fn publish(&mut self, state: &DashboardState) {
        self.published.lock().push(state.clone());
    }
}

// -- App helpers --------------------------------------------------------------

/// App wired to in-memory channels and a throwaway credential directory.
pub struct TestApp {
    pub app: App,
    pub commands: mpsc::UnboundedReceiver<RefreshCommand>,
    pub state: watch::Sender<DashboardState>,
    pub credentials: CredentialStore,
    _dir: TempDir,
}

impl TestApp {
    /// Commands sent so far, in order.
    pub fn sent(&mut self) -> Vec<RefreshCommand> {
        let mut sent = Vec::new();
        while let Ok(command) = self.commands.try_recv() {
            sent.push(command);
        }
        sent
    }
}

pub fn make_app() -> TestApp {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let credentials = CredentialStore::in_dir(dir.path());
    let (state_tx, state_rx) = watch::channel(DashboardState::initial());
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let app = App::new(state_rx, command_tx, credentials.clone(), false);
    TestApp {
        app,
        commands: command_rx,
        state: state_tx,
        credentials,
        _dir: dir,
    }
}

pub fn press_key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn ctrl_key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}
