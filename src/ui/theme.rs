use ratatui::style::Color;

pub const ACCENT: Color = Color::Rgb(0x00, 0x19, 0xa8);
pub const ACCENT_TEXT: Color = Color::Rgb(0x5b, 0x8d, 0xef);
pub const GLOBAL_BORDER: Color = Color::Rgb(0x40, 0x40, 0x40);
pub const HEADER_TEXT: Color = Color::Rgb(0xe5, 0xe5, 0xe5);
pub const HEADER_SEPARATOR: Color = Color::Rgb(0x6b, 0x72, 0x80);
pub const MUTED_TEXT: Color = Color::Rgb(0x9c, 0xa3, 0xaf);
pub const POPUP_BORDER: Color = Color::Rgb(0xe5, 0xe5, 0xe5);
pub const STATUS_OK: Color = Color::Rgb(0x22, 0xc5, 0x5e);
pub const STATUS_WARN: Color = Color::Rgb(0xf5, 0x9e, 0x0b);
pub const STATUS_ERROR: Color = Color::Rgb(0xef, 0x44, 0x44);
pub const BUS_RED: Color = Color::Rgb(0xdc, 0x24, 0x1f);

/// Lowercase slug of a line id: runs of anything but `[a-z0-9]` become `-`.
pub fn line_slug(line_id: &str) -> String {
    let mut slug = String::with_capacity(line_id.len());
    let mut pending_dash = false;
    for c in line_id.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash {
                slug.push('-');
                pending_dash = false;
            }
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    if pending_dash {
        slug.push('-');
    }
    slug
}

/// Brand colour for a rail line; buses and unknown lines use bus red.
pub fn line_color(line_id: &str) -> Color {
    match line_slug(line_id).as_str() {
        "bakerloo" => Color::Rgb(0xb3, 0x63, 0x05),
        "central" => Color::Rgb(0xe3, 0x20, 0x17),
        "circle" => Color::Rgb(0xff, 0xd3, 0x00),
        "district" => Color::Rgb(0x00, 0x78, 0x2a),
        "hammersmith-city" => Color::Rgb(0xf3, 0xa9, 0xbb),
        "jubilee" => Color::Rgb(0xa0, 0xa5, 0xa9),
        "metropolitan" => Color::Rgb(0x9b, 0x00, 0x56),
        "northern" => Color::Rgb(0x00, 0x00, 0x00),
        "piccadilly" => Color::Rgb(0x00, 0x36, 0x88),
        "victoria" => Color::Rgb(0x00, 0x98, 0xd4),
        "waterloo-city" => Color::Rgb(0x95, 0xcd, 0xba),
        "elizabeth" => Color::Rgb(0x69, 0x50, 0xa1),
        "dlr" => Color::Rgb(0x00, 0xa4, 0xa7),
        "london-overground" => Color::Rgb(0xee, 0x7c, 0x0e),
        _ => BUS_RED,
    }
}
