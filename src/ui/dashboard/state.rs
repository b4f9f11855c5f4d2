use std::time::SystemTime;

use crate::transit::{Coordinates, Stop};
use crate::ui::mvi::UiState;

/// Everything the dashboard view is rendered from.
///
/// `error` and `stops` coexist: a failed refresh keeps the last good stops
/// and shows the error above them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardState {
    /// Stops from the last successful cycle, in no particular order.
    pub stops: Vec<Stop>,
    pub is_refreshing: bool,
    /// Progress text, only maintained while `stops` is empty.
    pub loading_message: Option<String>,
    pub error: Option<String>,
    /// Position the current stops were discovered around.
    pub location: Option<Coordinates>,
    pub last_updated: Option<SystemTime>,
}

impl UiState for DashboardState {}

impl DashboardState {
    /// State shown before the first refresh cycle has published anything.
    pub fn initial() -> Self {
        Self {
            is_refreshing: true,
            loading_message: Some("Waiting for location…".to_string()),
            ..Self::default()
        }
    }

    pub fn has_stops(&self) -> bool {
        !self.stops.is_empty()
    }
}
