//! Scroll-reactive header hosting the search box and category tabs.
//!
//! The list publishes its scroll offset through a [`ScrollSignal`]. A
//! mounted [`PersistentHeader`] holds one subscription to it, reads the
//! offset once per scroll event and derives a single opacity value from
//! which the rest of its presentation follows. Unmounting drops the
//! subscription, after which scroll events no longer reach the header.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tokio::sync::watch;

use crate::theme;
use crate::widgets::sub_tabs::render_sub_tabs;

/// Rows the header occupies, bottom border included.
pub const HEADER_HEIGHT: u16 = 3;

const MAX_BACKGROUND_ALPHA: f64 = 0.8;
const MAX_BLUR_RADIUS: f64 = 8.0;

/// Opacity for a scroll `offset`: `min(offset / fade_distance, 1)`.
///
/// A zero fade distance snaps to fully opaque on the first scroll.
pub fn opacity_for(offset: u32, fade_distance: u32) -> f64 {
    if fade_distance == 0 {
        return if offset == 0 { 0.0 } else { 1.0 };
    }
    (f64::from(offset) / f64::from(fade_distance)).min(1.0)
}

/// Presentation derived from the header opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderStyle {
    pub background_alpha: f64,
    /// Backdrop blur in the browser sense. Terminals cannot blur, so this
    /// only dims the hint text beneath the title.
    pub blur_radius: f64,
    pub bottom_border: bool,
}

impl HeaderStyle {
    pub fn from_opacity(opacity: f64) -> Self {
        Self {
            background_alpha: opacity * MAX_BACKGROUND_ALPHA,
            blur_radius: opacity * MAX_BLUR_RADIUS,
            bottom_border: opacity > 0.0,
        }
    }
}

// ── Scroll signal ────────────────────────────────────────────────────

/// Scroll position of a list, in scroll units.
#[derive(Debug)]
pub struct ScrollSignal {
    tx: watch::Sender<u32>,
}

impl ScrollSignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self { tx }
    }

    /// Publish a new offset. Listeners are only woken when it changes.
    pub fn set(&self, offset: u32) {
        self.tx.send_if_modified(|current| {
            if *current == offset {
                false
            } else {
                *current = offset;
                true
            }
        });
    }

    pub fn offset(&self) -> u32 {
        *self.tx.borrow()
    }

    /// Live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }

    fn subscribe(&self) -> watch::Receiver<u32> {
        self.tx.subscribe()
    }
}

impl Default for ScrollSignal {
    fn default() -> Self {
        Self::new()
    }
}

// ── Header ───────────────────────────────────────────────────────────

/// What the header shows. Passed straight through to the child controls.
pub struct HeaderView<'a> {
    pub title: &'a str,
    pub search: &'a str,
    pub search_active: bool,
    pub categories: &'a [String],
    pub active_category: usize,
}

#[derive(Debug)]
pub struct PersistentHeader {
    fade_distance: u32,
    listener: Option<watch::Receiver<u32>>,
    opacity: f64,
}

impl PersistentHeader {
    pub fn new(fade_distance: u32) -> Self {
        Self {
            fade_distance,
            listener: None,
            opacity: 0.0,
        }
    }

    /// Subscribe to `signal` and compute the opacity right away.
    pub fn mount(&mut self, signal: &ScrollSignal) {
        if self.listener.is_some() {
            return;
        }
        let mut listener = signal.subscribe();
        let offset = *listener.borrow_and_update();
        self.opacity = opacity_for(offset, self.fade_distance);
        self.listener = Some(listener);
    }

    /// Release the subscription. Later scroll events are ignored.
    pub fn unmount(&mut self) {
        self.listener = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.listener.is_some()
    }

    /// Handle one scroll event: read the offset once and recompute.
    ///
    /// Returns whether the opacity changed. Does nothing when unmounted.
    pub fn on_scroll(&mut self) -> bool {
        let Some(listener) = self.listener.as_mut() else {
            return false;
        };
        let offset = *listener.borrow_and_update();
        let opacity = opacity_for(offset, self.fade_distance);
        let changed = (opacity - self.opacity).abs() > f64::EPSILON;
        self.opacity = opacity;
        changed
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn style(&self) -> HeaderStyle {
        HeaderStyle::from_opacity(self.opacity)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, view: &HeaderView<'_>) {
        let style = self.style();

        let mut block_style = Style::default();
        if let Some(bg) = theme::header_background(style.background_alpha) {
            block_style = block_style.bg(bg);
        }
        let block = Block::default()
            .borders(if style.bottom_border {
                Borders::BOTTOM
            } else {
                Borders::NONE
            })
            .border_style(theme::border_default())
            .style(block_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(inner);

        let hint_style = if style.blur_radius >= MAX_BLUR_RADIUS / 2.0 {
            theme::key_hint().add_modifier(ratatui::style::Modifier::DIM)
        } else {
            theme::key_hint()
        };

        let mut search = vec![
            Span::styled(format!(" {} ", view.title), theme::title_style()),
            Span::styled("  / ", hint_style),
        ];
        if view.search.is_empty() && !view.search_active {
            search.push(Span::styled("search", hint_style));
        } else {
            search.push(Span::styled(
                view.search.to_owned(),
                Style::default().fg(theme::NEON_CYAN),
            ));
        }
        if view.search_active {
            search.push(Span::styled("\u{2588}", Style::default().fg(theme::NEON_CYAN)));
        }
        frame.render_widget(Paragraph::new(Line::from(search)), rows[0]);

        let mut tabs = render_sub_tabs(view.categories, view.active_category);
        tabs.spans.insert(0, Span::raw(" "));
        frame.render_widget(Paragraph::new(tabs), rows[1]);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;

    #[test]
    fn opacity_ramps_then_saturates() {
        assert_eq!(opacity_for(0, 200), 0.0);
        assert_eq!(opacity_for(100, 200), 0.5);
        assert_eq!(opacity_for(200, 200), 1.0);
        assert_eq!(opacity_for(1_000, 200), 1.0);
    }

    #[test]
    fn zero_fade_distance_does_not_divide() {
        assert_eq!(opacity_for(0, 0), 0.0);
        assert_eq!(opacity_for(1, 0), 1.0);
    }

    #[test]
    fn style_follows_opacity() {
        assert_eq!(
            HeaderStyle::from_opacity(0.0),
            HeaderStyle {
                background_alpha: 0.0,
                blur_radius: 0.0,
                bottom_border: false,
            }
        );
        assert_eq!(
            HeaderStyle::from_opacity(0.5),
            HeaderStyle {
                background_alpha: 0.4,
                blur_radius: 4.0,
                bottom_border: true,
            }
        );
        let full = HeaderStyle::from_opacity(1.0);
        assert_eq!(full.background_alpha, 0.8);
        assert_eq!(full.blur_radius, 8.0);
    }

    #[test]
    fn mount_computes_eagerly() {
        let signal = ScrollSignal::new();
        signal.set(100);

        let mut header = PersistentHeader::new(200);
        assert_eq!(header.opacity(), 0.0);
        header.mount(&signal);
        assert_eq!(header.opacity(), 0.5);
    }

    #[test]
    fn scroll_events_update_while_mounted() {
        let signal = ScrollSignal::new();
        let mut header = PersistentHeader::new(200);
        header.mount(&signal);

        signal.set(300);
        assert!(header.on_scroll());
        assert_eq!(header.opacity(), 1.0);

        signal.set(400);
        assert!(!header.on_scroll(), "already saturated");
    }

    #[test]
    fn unmount_releases_subscription_and_stops_updates() {
        let signal = ScrollSignal::new();
        let before = signal.listener_count();

        let mut header = PersistentHeader::new(200);
        header.mount(&signal);
        header.mount(&signal);
        assert_eq!(signal.listener_count(), before + 1);

        header.unmount();
        assert_eq!(signal.listener_count(), before);

        signal.set(200);
        assert!(!header.on_scroll());
        assert_eq!(header.opacity(), 0.0);
    }

    fn rendered(header: &PersistentHeader) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(40, HEADER_HEIGHT)).unwrap();
        let categories = vec!["All".to_owned(), "Tools".to_owned()];
        terminal
            .draw(|frame| {
                header.render(
                    frame,
                    frame.area(),
                    &HeaderView {
                        title: "Home",
                        search: "rust",
                        search_active: false,
                        categories: &categories,
                        active_category: 1,
                    },
                );
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect()
    }

    #[test]
    fn border_appears_once_scrolled() {
        let signal = ScrollSignal::new();
        let mut header = PersistentHeader::new(200);
        header.mount(&signal);

        let top = rendered(&header);
        assert!(top[0].contains("rust"));
        assert!(top[1].contains("[Tools]"));
        assert!(!top[2].contains('\u{2500}'));

        signal.set(20);
        header.on_scroll();
        let scrolled = rendered(&header);
        assert!(scrolled[2].contains('\u{2500}'));
    }
}
