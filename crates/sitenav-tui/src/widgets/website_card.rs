//! One listing entry drawn as a fixed-height card.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use sitenav_core::{ModerationStatus, WebsiteCard};

use crate::theme;

/// Rows per card, including the spacer below it.
pub const CARD_HEIGHT: u16 = 5;

pub fn card_lines(card: &WebsiteCard, category: &str, liked: bool) -> Vec<Line<'static>> {
    let website = card.website();
    let badge = card.badge();

    let mut heading = vec![Span::styled(
        website.title.clone(),
        Style::default()
            .fg(theme::DIM_WHITE)
            .add_modifier(Modifier::BOLD),
    )];
    if !badge.label.is_empty() {
        heading.push(Span::raw("  "));
        heading.push(Span::styled(badge.label, theme::status_tone(badge.tone)));
    }

    let heart = if liked { "\u{2665}" } else { "\u{2661}" };
    let mut stats = vec![
        Span::styled(format!("[{category}]"), Style::default().fg(theme::CORAL)),
        Span::styled(format!("  {} visits", card.visits()), theme::card_text()),
        Span::styled(format!("  {heart} {}", card.likes()), theme::card_text()),
    ];
    for target in card.available_transitions() {
        let (key, verb) = match target {
            ModerationStatus::Approved => ("a", "approve"),
            ModerationStatus::Rejected => ("r", "reject"),
            ModerationStatus::Pending => continue,
        };
        stats.push(Span::styled(format!("  {key} "), theme::key_hint_key()));
        stats.push(Span::styled(verb, theme::key_hint()));
    }

    vec![
        Line::from(heading),
        Line::from(Span::styled(website.url.clone(), theme::link())),
        Line::from(Span::styled(website.description.clone(), theme::card_text())),
        Line::from(stats),
    ]
}

pub fn render_card(
    frame: &mut Frame,
    area: Rect,
    card: &WebsiteCard,
    category: &str,
    liked: bool,
    selected: bool,
) {
    let area = Rect {
        height: area.height.min(CARD_HEIGHT - 1),
        ..area
    };
    let (border, background) = if selected {
        (theme::border_focused(), theme::card_selected())
    } else {
        (theme::border_default(), Style::default())
    };
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(border)
        .style(background);
    frame.render_widget(
        Paragraph::new(card_lines(card, category, liked)).block(block),
        area,
    );
}
