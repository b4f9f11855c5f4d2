use std::time::SystemTime;

use crate::transit::{Arrival, Coordinates, Stop};
use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum DashboardIntent {
    /// A refresh cycle began. Clears a stale error when stops are shown.
    CycleStarted,
    /// Progress text for the current phase. Ignored once stops exist.
    PhaseChanged { message: String },
    LocationResolved { location: Coordinates },
    /// Discovery and fan-out succeeded; replaces all stops.
    StopsLoaded { stops: Vec<Stop>, at: SystemTime },
    /// Arrivals-only refresh finished; replaces each listed stop's arrivals.
    ArrivalsRefreshed {
        arrivals: Vec<(String, Vec<Arrival>)>,
        at: SystemTime,
    },
    /// Location or discovery failed; stops are left untouched.
    CycleFailed { message: String },
    /// No API key: nothing can be shown, so stale stops are dropped.
    CredentialMissing { message: String },
    CycleFinished,
}

impl Intent for DashboardIntent {}
