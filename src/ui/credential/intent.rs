use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum CredentialIntent {
    Open,
    Insert(char),
    Paste(String),
    Backspace,
    Close,
}

impl Intent for CredentialIntent {}
