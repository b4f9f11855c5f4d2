use crate::ui::app::App;
use crate::ui::footer::Footer;
use crate::ui::header::Header;
use crate::ui::layout::{centered_rect_by_size, layout_regions};
use crate::ui::theme::{
    line_color, ACCENT, BUS_RED, HEADER_TEXT, MUTED_TEXT, POPUP_BORDER, STATUS_ERROR, STATUS_OK,
    STATUS_WARN,
};
use crate::ui::view::{ArrivalRow, Departures, Eta, StopCard, View};
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();
    let (header, body, footer) = layout_regions(area);

    let dashboard = app.dashboard();
    frame.render_widget(Header::new().widget(&dashboard, app.test_location()), header);

    frame.render_widget(Clear, body);
    let view = app.view();
    let centered = !matches!(view, View::Stops { .. });
    let mut lines = Vec::new();
    if let Some(notice) = app.notice() {
        lines.push(Line::styled(notice.to_string(), Style::default().fg(STATUS_WARN)));
        lines.push(Line::from(""));
    }
    lines.extend(view_lines(&view));

    let mut paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll(), 0));
    if centered {
        paragraph = paragraph.alignment(Alignment::Center);
    }
    frame.render_widget(paragraph, body);

    frame.render_widget(
        Footer::new().widget(footer, app.credential_dialog().is_visible()),
        footer,
    );

    if let Some(input) = app.credential_dialog().input() {
        draw_credential_dialog(frame, body, input);
    }
}

fn draw_credential_dialog(frame: &mut Frame<'_>, body: ratatui::layout::Rect, input: &str) {
    let masked: String = "•".repeat(input.chars().count());
    let lines = vec![
        Line::from("Enter your TfL API key (app_key)."),
        Line::styled(
            "It is saved to your config directory.",
            Style::default().fg(MUTED_TEXT),
        ),
        Line::from(""),
        Line::from(vec![
            Span::raw("> "),
            Span::styled(masked, Style::default().fg(HEADER_TEXT)),
            Span::styled("▏", Style::default().fg(STATUS_OK)),
        ]),
    ];

    let width = lines
        .iter()
        .map(Line::width)
        .max()
        .unwrap_or(0)
        .max(40) as u16;
    let area = centered_rect_by_size(body, width.saturating_add(4), lines.len() as u16 + 2);

    frame.render_widget(Clear, area);
    let popup = Block::default()
        .title(Span::styled("API key", Style::default().fg(STATUS_OK)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(POPUP_BORDER));
    frame.render_widget(Paragraph::new(lines).block(popup), area);
}

/// Turn the rendered view into styled terminal lines.
pub fn view_lines(view: &View) -> Vec<Line<'static>> {
    match view {
        View::Loading { message } => vec![
            Line::from(""),
            Line::styled(format!("⏳ {}", message), Style::default().fg(HEADER_TEXT)),
        ],
        View::Error { message } => error_lines(message),
        View::Empty { message } => vec![
            Line::from(""),
            Line::styled(*message, Style::default().fg(MUTED_TEXT)),
        ],
        View::Stops { banner, cards } => {
            let mut lines = Vec::new();
            if let Some(message) = banner {
                lines.extend(error_lines(message));
                lines.push(Line::from(""));
            }
            for card in cards {
                lines.extend(card_lines(card));
                lines.push(Line::from(""));
            }
            lines
        }
    }
}

fn error_lines(message: &str) -> Vec<Line<'static>> {
    vec![
        Line::styled(
            "An Error Occurred",
            Style::default().fg(STATUS_ERROR).add_modifier(Modifier::BOLD),
        ),
        Line::styled(message.to_string(), Style::default().fg(HEADER_TEXT)),
    ]
}

fn badge(text: &str, bg: Color) -> Span<'static> {
    Span::styled(
        format!(" {} ", text),
        Style::default().fg(Color::White).bg(bg).add_modifier(Modifier::BOLD),
    )
}

fn card_lines(card: &StopCard) -> Vec<Line<'static>> {
    let mut title = vec![Span::styled(
        card.name.clone(),
        Style::default().fg(HEADER_TEXT).add_modifier(Modifier::BOLD),
    )];
    if let Some(letter) = &card.stop_letter {
        title.push(Span::raw(" "));
        title.push(badge(letter, BUS_RED));
    }
    if let Some(direction) = &card.direction {
        title.push(Span::raw(" "));
        title.push(badge(direction, ACCENT));
    }
    if card.disrupted {
        title.push(Span::styled(" ⚠", Style::default().fg(STATUS_WARN)));
    }
    title.push(Span::styled(
        format!("  {}m away", card.distance_m),
        Style::default().fg(MUTED_TEXT),
    ));

    let mut lines = vec![Line::from(title)];
    if let Some(towards) = &card.towards {
        lines.push(Line::styled(
            format!("  Towards {}", towards),
            Style::default().fg(MUTED_TEXT),
        ));
    }

    match &card.departures {
        Departures::Platforms(platforms) => {
            for group in platforms {
                lines.push(Line::styled(
                    format!("  {}", group.platform),
                    Style::default().fg(HEADER_TEXT).add_modifier(Modifier::UNDERLINED),
                ));
                lines.extend(group.arrivals.iter().map(|row| arrival_line(row, "    ")));
            }
        }
        Departures::Arrivals(rows) => {
            lines.extend(rows.iter().map(|row| arrival_line(row, "  ")));
        }
        Departures::Nothing(message) => {
            lines.push(Line::styled(
                format!("  {}", message),
                Style::default().fg(MUTED_TEXT),
            ));
        }
    }
    lines
}

fn arrival_line(row: &ArrivalRow, indent: &'static str) -> Line<'static> {
    let eta_style = match row.eta {
        Eta::Due => Style::default().fg(STATUS_OK).add_modifier(Modifier::BOLD),
        Eta::Minutes(_) => Style::default().fg(HEADER_TEXT),
    };
    Line::from(vec![
        Span::raw(indent),
        badge(&row.line_name, line_color(&row.line_id)),
        Span::styled(format!(" {:<32}", row.destination), Style::default().fg(HEADER_TEXT)),
        Span::styled(format!("{:>7}", row.eta.to_string()), eta_style),
    ])
}
