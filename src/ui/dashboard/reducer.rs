use crate::ui::dashboard::intent::DashboardIntent;
use crate::ui::dashboard::state::DashboardState;
use crate::ui::mvi::Reducer;

pub struct DashboardReducer;

impl Reducer for DashboardReducer {
    type State = DashboardState;
    type Intent = DashboardIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            DashboardIntent::CycleStarted => {
                state.is_refreshing = true;
                if state.has_stops() {
                    state.error = None;
                }
            }
            DashboardIntent::PhaseChanged { message } => {
                if !state.has_stops() {
                    state.loading_message = Some(message);
                }
            }
            DashboardIntent::LocationResolved { location } => {
                state.location = Some(location);
            }
            DashboardIntent::StopsLoaded { stops, at } => {
                state.stops = stops;
                state.error = None;
                state.last_updated = Some(at);
            }
            DashboardIntent::ArrivalsRefreshed { arrivals, at } => {
                for (stop_id, fresh) in arrivals {
                    if let Some(stop) = state.stops.iter_mut().find(|s| s.id == stop_id) {
                        stop.arrivals = fresh;
                    }
                }
                state.error = None;
                state.last_updated = Some(at);
            }
            DashboardIntent::CycleFailed { message } => {
                state.error = Some(message);
            }
            DashboardIntent::CredentialMissing { message } => {
                state.stops.clear();
                state.error = Some(message);
            }
            DashboardIntent::CycleFinished => {
                state.is_refreshing = false;
                state.loading_message = None;
            }
        }
        state
    }
}
