use crate::ui::app::App;
use crate::ui::credential::CredentialIntent;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

const PAGE: i32 = 10;

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if is_ctrl_char(key, 'c') || is_ctrl_char(key, 'q') {
        app.request_quit();
        return;
    }

    if app.credential_dialog().is_visible() {
        handle_dialog_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.request_quit(),
        KeyCode::Char('r') => app.request_arrivals_refresh(),
        KeyCode::Char('l') => app.request_full_refresh(),
        KeyCode::Char('t') => app.toggle_test_location(),
        KeyCode::Char('k') => app.dispatch_credential(CredentialIntent::Open),
        KeyCode::Up => app.scroll_by(-1),
        KeyCode::Down => app.scroll_by(1),
        KeyCode::PageUp => app.scroll_by(-PAGE),
        KeyCode::PageDown => app.scroll_by(PAGE),
        _ => {}
    }
}

pub fn handle_paste(app: &mut App, text: String) {
    if app.credential_dialog().is_visible() {
        app.dispatch_credential(CredentialIntent::Paste(text));
    }
}

fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.dispatch_credential(CredentialIntent::Close),
        KeyCode::Enter => app.submit_credential(),
        KeyCode::Backspace => app.dispatch_credential(CredentialIntent::Backspace),
        KeyCode::Char(c) => app.dispatch_credential(CredentialIntent::Insert(c)),
        _ => {}
    }
}

fn is_ctrl_char(key: KeyEvent, ch: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char(c) if c.eq_ignore_ascii_case(&ch))
}
