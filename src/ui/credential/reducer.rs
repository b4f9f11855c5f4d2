use crate::ui::credential::intent::CredentialIntent;
use crate::ui::credential::state::CredentialDialogState;
use crate::ui::mvi::Reducer;

pub struct CredentialReducer;

impl Reducer for CredentialReducer {
    type State = CredentialDialogState;
    type Intent = CredentialIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            // Always starts empty; the stored key is never echoed back.
            CredentialIntent::Open => CredentialDialogState::Editing {
                input: String::new(),
            },
            CredentialIntent::Close => CredentialDialogState::Hidden,
            CredentialIntent::Insert(c) => match state {
                CredentialDialogState::Editing { mut input } if !c.is_control() => {
                    input.push(c);
                    CredentialDialogState::Editing { input }
                }
                other => other,
            },
            CredentialIntent::Paste(text) => match state {
                CredentialDialogState::Editing { mut input } => {
                    input.extend(text.chars().filter(|c| !c.is_control()));
                    CredentialDialogState::Editing { input }
                }
                other => other,
            },
            CredentialIntent::Backspace => match state {
                CredentialDialogState::Editing { mut input } => {
                    input.pop();
                    CredentialDialogState::Editing { input }
                }
                other => other,
            },
        }
    }
}
