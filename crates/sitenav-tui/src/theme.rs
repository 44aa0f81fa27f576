//! Palette and semantic styles for the TUI.

use ratatui::style::{Color, Modifier, Style};

use sitenav_core::StatusTone;

// ── Palette ───────────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

const PAGE_BG: (u8, u8, u8) = (30, 31, 41);
/// Fully opaque header background.
const HEADER_BG: (u8, u8, u8) = (54, 57, 77);

// ── Semantic styles ───────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn card_text() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn card_selected() -> Style {
    Style::default().bg(BG_HIGHLIGHT)
}

pub fn link() -> Style {
    Style::default()
        .fg(NEON_CYAN)
        .add_modifier(Modifier::UNDERLINED)
}

pub fn tab_active() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn field_error() -> Style {
    Style::default().fg(ERROR_RED)
}

/// Style for a status badge; `None` tone stays unstyled.
pub fn status_tone(tone: Option<StatusTone>) -> Style {
    match tone {
        Some(StatusTone::Warning) => Style::default()
            .fg(ELECTRIC_YELLOW)
            .add_modifier(Modifier::BOLD),
        Some(StatusTone::Success) => Style::default()
            .fg(SUCCESS_GREEN)
            .add_modifier(Modifier::BOLD),
        Some(StatusTone::Danger) => Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD),
        None => Style::default(),
    }
}

/// Header background at `alpha` over the dark page background.
///
/// Zero alpha means no background at all, letting the terminal show through.
pub fn header_background(alpha: f64) -> Option<Color> {
    if alpha <= 0.0 {
        return None;
    }
    let (r0, g0, b0) = PAGE_BG;
    let (r1, g1, b1) = HEADER_BG;
    Some(Color::Rgb(
        mix(r0, r1, alpha),
        mix(g0, g1, alpha),
        mix(b0, b1, alpha),
    ))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn mix(from: u8, to: u8, t: f64) -> u8 {
    let t = t.clamp(0.0, 1.0);
    (f64::from(from) + (f64::from(to) - f64::from(from)) * t).round() as u8
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn transparent_header_has_no_background() {
        assert_eq!(header_background(0.0), None);
    }

    #[test]
    fn header_background_interpolates() {
        assert_eq!(header_background(1.0), Some(Color::Rgb(54, 57, 77)));
        assert_eq!(header_background(0.5), Some(Color::Rgb(42, 44, 59)));
    }

    #[test]
    fn unstyled_badge() {
        assert_eq!(status_tone(None), Style::default());
    }
}
