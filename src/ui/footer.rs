use crate::ui::theme::{ACCENT, GLOBAL_BORDER, HEADER_TEXT, MUTED_TEXT};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const SEPARATOR: &str = " │ ";

const DASHBOARD_KEYS: &[(&str, &str)] = &[
    ("r", "Refresh"),
    ("l", "Locate"),
    ("t", "Test location"),
    ("k", "API key"),
    ("↑↓", "Scroll"),
    ("q", "Quit"),
];

const DIALOG_KEYS: &[(&str, &str)] = &[("Enter", "Save key"), ("Esc", "Cancel")];

/// Key hints on the left, version on the right. Hints that don't fit are
/// dropped from the end.
pub struct Footer;

impl Default for Footer {
    fn default() -> Self {
        Self::new()
    }
}

impl Footer {
    pub fn new() -> Self {
        Self
    }

    pub fn widget(&self, area: Rect, dialog_open: bool) -> Paragraph<'static> {
        let keys = if dialog_open { DIALOG_KEYS } else { DASHBOARD_KEYS };
        let version = format!("v{} ", VERSION);
        let inner_width = area.width.saturating_sub(2) as usize;
        let budget = inner_width.saturating_sub(version.chars().count() + 1);

        let key_style = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
        let label_style = Style::default().fg(HEADER_TEXT);
        let dim = Style::default().fg(MUTED_TEXT);

        let mut spans = vec![Span::raw(" ")];
        let mut used = 1;
        for (i, (key, label)) in keys.iter().enumerate() {
            let separator = if i == 0 { "" } else { SEPARATOR };
            let width =
                separator.chars().count() + key.chars().count() + 2 + label.chars().count();
            if used + width > budget {
                break;
            }
            used += width;
            spans.push(Span::styled(separator, dim));
            spans.push(Span::styled(*key, key_style));
            spans.push(Span::styled(format!(": {}", label), label_style));
        }

        let padding = inner_width.saturating_sub(used + version.chars().count());
        spans.push(Span::raw(" ".repeat(padding)));
        spans.push(Span::styled(version, dim));

        Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(GLOBAL_BORDER)),
        )
    }
}
