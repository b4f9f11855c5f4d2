use std::time::{Duration, SystemTime};

use crate::config::SecureString;
use crate::location::LocationProvider;
use crate::refresh::publisher::StatePublisher;
use crate::refresh::settle::settle_all;
use crate::transit::error::CREDENTIAL_MISSING_MESSAGE;
use crate::transit::{Arrival, TransitApi, TransitError};
use crate::ui::dashboard::{DashboardIntent, DashboardReducer, DashboardState};
use crate::ui::mvi::Reducer;

pub const LOCATING_MESSAGE: &str = "Getting your location…";
pub const DISCOVERING_MESSAGE: &str = "Finding nearby stops…";
pub const FETCHING_MESSAGE: &str = "Fetching live arrivals…";

/// Why a cycle ended early.
#[derive(Debug)]
enum CycleError {
    CredentialMissing,
    Failed(String),
}

impl From<TransitError> for CycleError {
    fn from(err: TransitError) -> Self {
        match err {
            TransitError::CredentialMissing => CycleError::CredentialMissing,
            TransitError::Api { message } => CycleError::Failed(message),
        }
    }
}

/// Owns the dashboard state and drives refresh cycles against its
/// collaborators. Every state change goes through [`DashboardReducer`];
/// every render is a [`StatePublisher::publish`].
pub struct RefreshOrchestrator<L, T, P> {
    location: L,
    api: T,
    publisher: P,
    credential: SecureString,
    state: DashboardState,
}

impl<L, T, P> RefreshOrchestrator<L, T, P>
where
    L: LocationProvider,
    T: TransitApi,
    P: StatePublisher,
{
    pub fn new(location: L, api: T, publisher: P, credential: SecureString) -> Self {
        Self {
            location,
            api,
            publisher,
            credential,
            state: DashboardState::default(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn set_credential(&mut self, credential: SecureString) {
        self.credential = credential;
    }

    pub fn set_test_location(&mut self, enabled: bool) {
        self.location.set_test_location(enabled);
    }

    /// Fresh location, fresh discovery, arrivals for every discovered stop.
    pub async fn refresh_full(&mut self) {
        self.begin_cycle();
        let result = self.full_cycle().await;
        self.finish_cycle(result);
    }

    /// Arrivals for the stops already shown. Without known stops this is a
    /// full refresh, so the location is only looked up when needed.
    pub async fn refresh_arrivals_only(&mut self) {
        self.begin_cycle();
        let result = if self.state.has_stops() {
            self.arrivals_cycle().await
        } else {
            tracing::debug!("No known stops; running a full refresh instead");
            self.full_cycle().await
        };
        self.finish_cycle(result);
    }

    fn dispatch(&mut self, intent: DashboardIntent) {
        self.state = DashboardReducer::reduce(std::mem::take(&mut self.state), intent);
    }

    fn render(&mut self) {
        self.publisher.publish(&self.state);
    }

    fn begin_cycle(&mut self) {
        self.dispatch(DashboardIntent::CycleStarted);
        self.render();
    }

    /// Progress text is only shown on an empty dashboard; with stops on
    /// screen, re-rendering for it would just flicker.
    fn phase(&mut self, message: &str) {
        if self.state.has_stops() {
            return;
        }
        self.dispatch(DashboardIntent::PhaseChanged {
            message: message.to_string(),
        });
        self.render();
    }

    fn finish_cycle(&mut self, result: Result<(), CycleError>) {
        match result {
            Ok(()) => {}
            Err(CycleError::CredentialMissing) => {
                tracing::warn!("No API key configured; clearing results");
                self.dispatch(DashboardIntent::CredentialMissing {
                    message: CREDENTIAL_MISSING_MESSAGE.to_string(),
                });
            }
            Err(CycleError::Failed(message)) => {
                tracing::error!(%message, "Refresh failed; keeping previous stops");
                self.dispatch(DashboardIntent::CycleFailed { message });
            }
        }
        self.dispatch(DashboardIntent::CycleFinished);
        self.render();
    }

    fn require_credential(&self) -> Result<(), CycleError> {
        if self.credential.is_blank() {
            return Err(CycleError::CredentialMissing);
        }
        Ok(())
    }

    async fn full_cycle(&mut self) -> Result<(), CycleError> {
        self.require_credential()?;

        self.phase(LOCATING_MESSAGE);
        let location = self
            .location
            .resolve(Duration::ZERO)
            .await
            .map_err(|e| CycleError::Failed(e.to_string()))?;

        self.phase(DISCOVERING_MESSAGE);
        let mut stops = self
            .api
            .find_nearby_stops(location, &self.credential)
            .await?;

        if !stops.is_empty() {
            self.phase(FETCHING_MESSAGE);
        }
        let ids = stops.iter().map(|s| s.id.clone()).collect();
        let results = self.fetch_arrivals(ids).await;
        for (stop, (_, arrivals)) in stops.iter_mut().zip(results) {
            stop.arrivals = arrivals;
        }

        if stops.is_empty() && self.state.has_stops() {
            tracing::info!(location = %location, "No stops found; keeping the last known stops");
            self.dispatch(DashboardIntent::LocationResolved { location });
            return Ok(());
        }

        tracing::info!(stops = stops.len(), location = %location, "Full refresh complete");
        self.dispatch(DashboardIntent::StopsLoaded {
            stops,
            at: SystemTime::now(),
        });
        self.dispatch(DashboardIntent::LocationResolved { location });
        Ok(())
    }

    async fn arrivals_cycle(&mut self) -> Result<(), CycleError> {
        self.require_credential()?;

        let ids = self.state.stops.iter().map(|s| s.id.clone()).collect();
        let arrivals = self.fetch_arrivals(ids).await;

        tracing::info!(stops = arrivals.len(), "Arrivals refresh complete");
        self.dispatch(DashboardIntent::ArrivalsRefreshed {
            arrivals,
            at: SystemTime::now(),
        });
        Ok(())
    }

    /// Fan out one arrivals request per stop and join on all of them.
    async fn fetch_arrivals(&self, stop_ids: Vec<String>) -> Vec<(String, Vec<Arrival>)> {
        let api = &self.api;
        let credential = &self.credential;
        settle_all(stop_ids.into_iter().map(|id| {
            let key = id.clone();
            (key, async move { api.fetch_arrivals(&id, credential).await })
        }))
        .await
    }
}
