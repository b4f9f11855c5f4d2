use std::time::SystemTime;

use crate::ui::dashboard::DashboardState;
use crate::ui::theme::{
    ACCENT_TEXT, GLOBAL_BORDER, HEADER_SEPARATOR, HEADER_TEXT, STATUS_ERROR, STATUS_OK,
    STATUS_WARN,
};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

pub struct Header;

impl Header {
    pub fn new() -> Self {
        Self
    }

    pub fn widget(&self, state: &DashboardState, test_location: bool) -> Paragraph<'static> {
        let text_style = Style::default().fg(HEADER_TEXT);
        let separator_style = Style::default().fg(HEADER_SEPARATOR);

        let (status, status_color) = if state.is_refreshing {
            ("Refreshing…".to_string(), STATUS_WARN)
        } else if state.error.is_some() {
            ("Error".to_string(), STATUS_ERROR)
        } else {
            (updated_label(state.last_updated), STATUS_OK)
        };

        let mut spans = vec![
            Span::styled("  ", text_style),
            Span::styled(
                "nearboard",
                Style::default().fg(ACCENT_TEXT).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  │  ", separator_style),
            Span::styled("●", Style::default().fg(status_color)),
            Span::styled(format!(" {}", status), text_style),
        ];

        if let Some(location) = state.location {
            spans.push(Span::styled("  │  ", separator_style));
            spans.push(Span::styled(format!("📍 {}", location), text_style));
        }
        if test_location {
            spans.push(Span::styled("  │  ", separator_style));
            spans.push(Span::styled("test location", Style::default().fg(STATUS_WARN)));
        }

        Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::TOP | Borders::BOTTOM)
                .border_style(Style::default().fg(GLOBAL_BORDER)),
        )
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

fn updated_label(last_updated: Option<SystemTime>) -> String {
    let Some(at) = last_updated else {
        return "Idle".to_string();
    };
    match at.elapsed().map(|age| age.as_secs()) {
        Ok(secs) if secs < 60 => format!("Updated {}s ago", secs),
        Ok(secs) => format!("Updated {}m ago", secs / 60),
        Err(_) => "Updated just now".to_string(),
    }
}
