use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::config::SecureString;
use crate::location::LocationProvider;
use crate::refresh::orchestrator::RefreshOrchestrator;
use crate::refresh::publisher::StatePublisher;
use crate::shutdown::ShutdownHandle;
use crate::transit::TransitApi;

/// Requests from the front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshCommand {
    /// "Use my location": resolve, discover, fetch.
    Full,
    /// "Refresh": arrivals for the known stops.
    ArrivalsOnly,
    /// A new API key was entered (already persisted).
    SetCredential(SecureString),
    SetTestLocation(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CycleKind {
    ArrivalsOnly,
    Full,
}

enum Wake {
    Shutdown,
    Command(Option<RefreshCommand>),
    Tick,
}

/// Owns the orchestrator and runs one cycle at a time.
///
/// Requests that arrive while a cycle is in flight are queued and coalesced
/// into a single follow-up cycle; a queued full refresh absorbs any queued
/// arrivals-only refresh.
pub struct RefreshRunner<L, T, P> {
    orchestrator: RefreshOrchestrator<L, T, P>,
    commands: mpsc::UnboundedReceiver<RefreshCommand>,
    interval: Duration,
    shutdown: ShutdownHandle,
}

impl<L, T, P> RefreshRunner<L, T, P>
where
    L: LocationProvider,
    T: TransitApi,
    P: StatePublisher,
{
    pub fn new(
        orchestrator: RefreshOrchestrator<L, T, P>,
        commands: mpsc::UnboundedReceiver<RefreshCommand>,
        interval: Duration,
        shutdown: ShutdownHandle,
    ) -> Self {
        Self {
            orchestrator,
            commands,
            interval,
            shutdown,
        }
    }

    /// Initial full refresh, then serve commands and the timer until
    /// shutdown or until every command sender is gone.
    pub async fn run(mut self) {
        let mut timer = interval_at(Instant::now() + self.interval, self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut pending = Some(CycleKind::Full);

        loop {
            if let Some(kind) = pending.take() {
                if !self.execute(kind).await {
                    break;
                }
                pending = self.drain_queued();
                timer.reset();
                continue;
            }

            let wake = tokio::select! {
                _ = self.shutdown.wait() => Wake::Shutdown,
                command = self.commands.recv() => Wake::Command(command),
                _ = timer.tick() => Wake::Tick,
            };

            match wake {
                Wake::Shutdown | Wake::Command(None) => break,
                Wake::Command(Some(command)) => pending = self.apply(command, None),
                Wake::Tick => {
                    tracing::debug!("Auto-refresh tick");
                    pending = Some(CycleKind::ArrivalsOnly);
                }
            }
        }

        tracing::info!("Refresh runner stopped");
    }

    /// Returns false when shutdown interrupted the cycle.
    async fn execute(&mut self, kind: CycleKind) -> bool {
        let orchestrator = &mut self.orchestrator;
        let cycle = async move {
            match kind {
                CycleKind::Full => orchestrator.refresh_full().await,
                CycleKind::ArrivalsOnly => orchestrator.refresh_arrivals_only().await,
            }
        };

        tokio::select! {
            _ = cycle => true,
            _ = self.shutdown.wait() => false,
        }
    }

    fn drain_queued(&mut self) -> Option<CycleKind> {
        let mut pending = None;
        while let Ok(command) = self.commands.try_recv() {
            pending = self.apply(command, pending);
        }
        if pending.is_some() {
            tracing::debug!(?pending, "Running coalesced refresh");
        }
        pending
    }

    fn apply(&mut self, command: RefreshCommand, pending: Option<CycleKind>) -> Option<CycleKind> {
        let requested = match command {
            RefreshCommand::Full => CycleKind::Full,
            RefreshCommand::ArrivalsOnly => CycleKind::ArrivalsOnly,
            RefreshCommand::SetCredential(credential) => {
                self.orchestrator.set_credential(credential);
                CycleKind::Full
            }
            RefreshCommand::SetTestLocation(enabled) => {
                tracing::info!(enabled, "Test location toggled");
                self.orchestrator.set_test_location(enabled);
                CycleKind::Full
            }
        };
        pending.max(Some(requested))
    }
}
