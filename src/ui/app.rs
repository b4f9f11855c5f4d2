use tokio::sync::{mpsc, watch};

use crate::config::{CredentialStore, SecureString};
use crate::refresh::RefreshCommand;
use crate::ui::credential::{CredentialDialogState, CredentialIntent, CredentialReducer};
use crate::ui::dashboard::DashboardState;
use crate::ui::mvi::Reducer;
use crate::ui::view::{render, View};

pub type RefreshCommandSender = mpsc::UnboundedSender<RefreshCommand>;

/// Generic MVI dispatch: takes current state, runs reducer, stores result.
macro_rules! dispatch_mvi {
    ($self:expr, $field:ident, $reducer:ty, $intent:expr) => {
        $self.$field = <$reducer>::reduce(std::mem::take(&mut $self.$field), $intent);
    };
}

/// Front-end state: the latest dashboard snapshot plus local UI concerns.
pub struct App {
    should_quit: bool,
    dashboard: watch::Receiver<DashboardState>,
    commands: RefreshCommandSender,
    credentials: CredentialStore,
    credential_dialog: CredentialDialogState,
    test_location: bool,
    /// One-line message for local failures (e.g. saving the key).
    notice: Option<String>,
    scroll: u16,
}

impl App {
    pub fn new(
        dashboard: watch::Receiver<DashboardState>,
        commands: RefreshCommandSender,
        credentials: CredentialStore,
        test_location: bool,
    ) -> Self {
        Self {
            should_quit: false,
            dashboard,
            commands,
            credentials,
            credential_dialog: CredentialDialogState::default(),
            test_location,
            notice: None,
            scroll: 0,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    /// Latest published dashboard state.
    pub fn dashboard(&self) -> DashboardState {
        self.dashboard.borrow().clone()
    }

    pub fn view(&self) -> View {
        render(&self.dashboard.borrow())
    }

    pub fn test_location(&self) -> bool {
        self.test_location
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let next = i32::from(self.scroll).saturating_add(delta).clamp(0, i32::from(u16::MAX));
        self.scroll = next as u16;
    }

    pub fn credential_dialog(&self) -> &CredentialDialogState {
        &self.credential_dialog
    }

    pub fn dispatch_credential(&mut self, intent: CredentialIntent) {
        dispatch_mvi!(self, credential_dialog, CredentialReducer, intent);
    }

    pub fn request_full_refresh(&mut self) {
        self.scroll = 0;
        self.send(RefreshCommand::Full);
    }

    pub fn request_arrivals_refresh(&mut self) {
        self.send(RefreshCommand::ArrivalsOnly);
    }

    pub fn toggle_test_location(&mut self) {
        self.test_location = !self.test_location;
        self.scroll = 0;
        self.send(RefreshCommand::SetTestLocation(self.test_location));
    }

    /// Persist the typed key and hand it to the refresh runner.
    ///
    /// The runner gets the key even if saving fails, so the session still
    /// works; the failure is shown as a notice.
    pub fn submit_credential(&mut self) {
        let Some(input) = self.credential_dialog.input() else {
            return;
        };
        let credential = SecureString::new(input.trim());
        self.dispatch_credential(CredentialIntent::Close);

        self.notice = match self.credentials.save(&credential) {
            Ok(()) => None,
            Err(err) => {
                tracing::error!(error = %err, "Failed to save API key");
                Some(format!("Could not save API key: {}", err))
            }
        };
        self.send(RefreshCommand::SetCredential(credential));
    }

    fn send(&mut self, command: RefreshCommand) {
        if self.commands.send(command).is_err() {
            tracing::warn!("Refresh runner is gone; quitting");
            self.should_quit = true;
        }
    }
}
