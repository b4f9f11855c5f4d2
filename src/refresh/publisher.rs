use tokio::sync::watch;

use crate::ui::dashboard::DashboardState;

/// Receives a snapshot each time the orchestrator asks for a render.
pub trait StatePublisher: Send {
    fn publish(&mut self, state: &DashboardState);
}

/// The terminal front-end watches the latest snapshot; intermediate ones
/// it never drew are simply replaced.
impl StatePublisher for watch::Sender<DashboardState> {
    fn publish(&mut self, state: &DashboardState) {
        self.send_replace(state.clone());
    }
}
