//! API key entry dialog.

mod intent;
mod reducer;
mod state;

pub use intent::CredentialIntent;
pub use reducer::CredentialReducer;
pub use state::CredentialDialogState;
