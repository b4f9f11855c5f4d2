use crate::ui::mvi::UiState;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CredentialDialogState {
    #[default]
    Hidden,
    Editing {
        input: String,
    },
}

impl UiState for CredentialDialogState {}

impl CredentialDialogState {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Text typed so far, if the dialog is open.
    pub fn input(&self) -> Option<&str> {
        match self {
            Self::Hidden => None,
            Self::Editing { input } => Some(input),
        }
    }
}
