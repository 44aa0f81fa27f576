//! Listing screens: Home (approved entries) and Moderation (admin queue).
//!
//! Both host the scroll-reactive header above a card list. The header is
//! mounted while the screen has focus and unmounted when it loses it.

use std::cell::Cell;
use std::collections::HashMap;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use sitenav_core::{
    CardDelegate, Category, CategoryId, Directory, LikeOutcome, ModerationStatus, StatusFilter,
    Website, WebsiteCard, WebsiteId, WebsiteQuery,
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::persistent_header::{
    HEADER_HEIGHT, HeaderView, PersistentHeader, ScrollSignal,
};
use crate::widgets::sub_tabs::{cycle, render_sub_tabs};
use crate::widgets::website_card::{CARD_HEIGHT, render_card};

/// Moderation sub-tabs, in display order.
const STATUS_TABS: [StatusFilter; 4] = [
    StatusFilter::Pending,
    StatusFilter::Approved,
    StatusFilter::Rejected,
    StatusFilter::All,
];

fn status_tab_label(filter: StatusFilter) -> &'static str {
    match filter {
        StatusFilter::All => "All",
        StatusFilter::Pending => "Pending",
        StatusFilter::Approved => "Approved",
        StatusFilter::Rejected => "Rejected",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseMode {
    Home,
    Moderation,
}

/// Forwards card requests to the app loop.
struct ActionDelegate<'a> {
    tx: &'a UnboundedSender<Action>,
}

impl CardDelegate for ActionDelegate<'_> {
    fn on_visit(&self, website: &Website) {
        let _ = self.tx.send(Action::Visit {
            id: website.id,
            url: website.url.clone(),
        });
    }

    fn on_status_update(&self, id: WebsiteId, status: ModerationStatus) {
        let _ = self.tx.send(Action::UpdateStatus(id, status));
    }
}

pub struct BrowseScreen {
    mode: BrowseMode,
    directory: Directory,
    action_tx: Option<UnboundedSender<Action>>,
    focused: bool,
    cards: Vec<WebsiteCard>,
    categories: Arc<Vec<Arc<Category>>>,
    /// 0 is "All", then one tab per category.
    category_index: usize,
    status_index: usize,
    search: String,
    search_active: bool,
    selected: usize,
    /// First visible card.
    scroll: usize,
    scroll_step: u32,
    signal: ScrollSignal,
    header: PersistentHeader,
    /// Cards that fit in the last rendered list area.
    viewport: Cell<usize>,
}

impl BrowseScreen {
    pub fn new(
        mode: BrowseMode,
        directory: Directory,
        header_fade_distance: u32,
        scroll_step: u32,
    ) -> Self {
        Self {
            mode,
            directory,
            action_tx: None,
            focused: false,
            cards: Vec::new(),
            categories: Arc::new(Vec::new()),
            category_index: 0,
            status_index: 0,
            search: String::new(),
            search_active: false,
            selected: 0,
            scroll: 0,
            scroll_step,
            signal: ScrollSignal::new(),
            header: PersistentHeader::new(header_fade_distance),
            viewport: Cell::new(1),
        }
    }

    fn title(&self) -> &'static str {
        match self.mode {
            BrowseMode::Home => "Home",
            BrowseMode::Moderation => "Moderation",
        }
    }

    fn status_filter(&self) -> StatusFilter {
        match self.mode {
            BrowseMode::Home => StatusFilter::Approved,
            BrowseMode::Moderation => STATUS_TABS
                .get(self.status_index)
                .copied()
                .unwrap_or_default(),
        }
    }

    fn category_filter(&self) -> Option<CategoryId> {
        let idx = self.category_index.checked_sub(1)?;
        self.categories.get(idx).map(|c| c.id)
    }

    pub fn query(&self) -> WebsiteQuery {
        let search = self.search.trim();
        WebsiteQuery {
            status: self.status_filter(),
            category: self.category_filter(),
            search: (!search.is_empty()).then(|| search.to_owned()),
        }
    }

    fn request_listing(&self) {
        if let Some(tx) = &self.action_tx {
            let _ = tx.send(Action::LoadListing(self.query()));
        }
    }

    fn category_labels(&self) -> Vec<String> {
        std::iter::once("All".to_owned())
            .chain(self.categories.iter().map(|c| c.name.clone()))
            .collect()
    }

    // ── Listing ──────────────────────────────────────────────────────

    /// Rebuild cards from a store snapshot, keeping local like counts.
    fn apply_listing(&mut self, websites: &[Arc<Website>]) {
        let role = self.directory.role();
        let filter = self.status_filter();
        let mut previous: HashMap<WebsiteId, WebsiteCard> =
            self.cards.drain(..).map(|c| (c.id(), c)).collect();

        self.cards = websites
            .iter()
            .filter(|w| filter.matches(w.status))
            .map(|w| match previous.remove(&w.id) {
                Some(mut card) => {
                    card.refresh(Arc::clone(w));
                    card
                }
                None => WebsiteCard::new(Arc::clone(w), role),
            })
            .collect();

        if self.selected >= self.cards.len() {
            self.selected = self.cards.len().saturating_sub(1);
        }
        self.follow_selection();
    }

    fn apply_categories(&mut self, categories: Arc<Vec<Arc<Category>>>) {
        let current = self.category_filter();
        self.categories = categories;
        self.category_index = current
            .and_then(|id| self.categories.iter().position(|c| c.id == id))
            .map_or(0, |i| i + 1);
    }

    // ── Scrolling ────────────────────────────────────────────────────

    fn move_selection(&mut self, delta: isize) {
        if self.cards.is_empty() {
            return;
        }
        let max = self.cards.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(max);
        self.follow_selection();
    }

    /// Keep the selection in view and publish the resulting offset.
    fn follow_selection(&mut self) {
        let viewport = self.viewport.get().max(1);
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + viewport {
            self.scroll = self.selected + 1 - viewport;
        }
        let rows = u32::try_from(self.scroll).unwrap_or(u32::MAX);
        self.signal.set(rows.saturating_mul(self.scroll_step));
        self.header.on_scroll();
    }

    fn page(&self) -> isize {
        isize::try_from(self.viewport.get().max(1)).unwrap_or(1)
    }

    // ── Card actions ─────────────────────────────────────────────────

    fn like_selected(&mut self) -> Option<Action> {
        let card = self.cards.get_mut(self.selected)?;
        match self.directory.like(card) {
            LikeOutcome::AlreadyLiked { toast } => Some(Action::Notify(toast)),
            LikeOutcome::Liked { likes, .. } => {
                debug!(id = %card.id(), likes, "liked");
                None
            }
        }
    }

    fn visit_selected(&self) {
        if let (Some(card), Some(tx)) = (self.cards.get(self.selected), &self.action_tx) {
            card.visit(&ActionDelegate { tx });
        }
    }

    fn moderate_selected(&self, target: ModerationStatus) {
        if let (Some(card), Some(tx)) = (self.cards.get(self.selected), &self.action_tx) {
            card.request_status(target, &ActionDelegate { tx });
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let per_page = usize::from((area.height / CARD_HEIGHT).max(1));
        self.viewport.set(per_page);

        if self.cards.is_empty() {
            let message = if self.directory.is_loading_categories() {
                "Loading\u{2026}"
            } else {
                "No websites to show"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  {message}"), theme::key_hint())),
                area,
            );
            return;
        }

        let categories = self.categories.as_slice();
        let slots = Layout::vertical(vec![Constraint::Length(CARD_HEIGHT); per_page]).split(area);
        for (slot, (idx, card)) in slots
            .iter()
            .zip(self.cards.iter().enumerate().skip(self.scroll))
        {
            render_card(
                frame,
                *slot,
                card,
                &card.category_label(categories),
                self.directory.is_liked(card.id()),
                idx == self.selected,
            );
        }
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(" j/k ", theme::key_hint_key()),
            Span::styled("scroll  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("visit  ", theme::key_hint()),
            Span::styled("l ", theme::key_hint_key()),
            Span::styled("like  ", theme::key_hint()),
            Span::styled("[ ] ", theme::key_hint_key()),
            Span::styled("category  ", theme::key_hint()),
        ];
        if self.mode == BrowseMode::Moderation {
            spans.push(Span::styled("\u{2190}/\u{2192} ", theme::key_hint_key()));
            spans.push(Span::styled("status  ", theme::key_hint()));
        }
        spans.push(Span::styled("R ", theme::key_hint_key()));
        spans.push(Span::styled("refresh", theme::key_hint()));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Component for BrowseScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match (key.modifiers, key.code) {
            (_, KeyCode::Char('j') | KeyCode::Down) => {
                self.move_selection(1);
                None
            }
            (_, KeyCode::Char('k') | KeyCode::Up) => {
                self.move_selection(-1);
                None
            }
            (KeyModifiers::CONTROL, KeyCode::Char('d')) | (_, KeyCode::PageDown) => {
                self.move_selection(self.page());
                None
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) | (_, KeyCode::PageUp) => {
                self.move_selection(-self.page());
                None
            }
            (_, KeyCode::Char('g') | KeyCode::Home) => {
                self.selected = 0;
                self.follow_selection();
                None
            }
            (_, KeyCode::Char('G') | KeyCode::End) => {
                self.selected = self.cards.len().saturating_sub(1);
                self.follow_selection();
                None
            }
            (_, KeyCode::Enter) => {
                self.visit_selected();
                None
            }
            (_, KeyCode::Char('l')) => self.like_selected(),
            (_, KeyCode::Char('a')) => {
                self.moderate_selected(ModerationStatus::Approved);
                None
            }
            (_, KeyCode::Char('r')) => {
                self.moderate_selected(ModerationStatus::Rejected);
                None
            }
            (_, KeyCode::Char(c @ ('[' | ']'))) => {
                self.category_index = cycle(self.category_index, self.categories.len() + 1, c == ']');
                Some(Action::LoadListing(self.query()))
            }
            (_, KeyCode::Left | KeyCode::Right) if self.mode == BrowseMode::Moderation => {
                self.status_index = cycle(
                    self.status_index,
                    STATUS_TABS.len(),
                    key.code == KeyCode::Right,
                );
                Some(Action::LoadListing(self.query()))
            }
            (_, KeyCode::Char('R')) => {
                if self.categories.is_empty() {
                    if let Some(tx) = &self.action_tx {
                        let _ = tx.send(Action::ReloadCategories);
                    }
                }
                Some(Action::LoadListing(self.query()))
            }
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        match mouse.kind {
            MouseEventKind::ScrollDown => self.move_selection(1),
            MouseEventKind::ScrollUp => self.move_selection(-1),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::WebsitesUpdated(websites) => self.apply_listing(websites),
            Action::CategoriesUpdated(categories) => self.apply_categories(Arc::clone(categories)),
            Action::OpenSearch => self.search_active = true,
            Action::SearchInput(text) => self.search.clone_from(text),
            Action::SearchSubmit => {
                self.search_active = false;
                return Ok(Some(Action::LoadListing(self.query())));
            }
            Action::CloseSearch => {
                self.search_active = false;
                if !self.search.is_empty() {
                    self.search.clear();
                    return Ok(Some(Action::LoadListing(self.query())));
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" {} ", self.title()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let status_rows = u16::from(self.mode == BrowseMode::Moderation);
        let layout = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(status_rows),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

        let labels = self.category_labels();
        self.header.render(
            frame,
            layout[0],
            &HeaderView {
                title: self.title(),
                search: &self.search,
                search_active: self.search_active,
                categories: &labels,
                active_category: self.category_index,
            },
        );

        if self.mode == BrowseMode::Moderation {
            let labels = STATUS_TABS.map(status_tab_label);
            let mut line = render_sub_tabs(&labels, self.status_index);
            line.spans
                .insert(0, Span::styled(" Status: ", Style::default().fg(theme::BORDER_GRAY)));
            frame.render_widget(Paragraph::new(line), layout[1]);
        }

        self.render_list(frame, layout[2]);
        self.render_hints(frame, layout[3]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if focused {
            self.header.mount(&self.signal);
            self.request_listing();
        } else {
            self.header.unmount();
            self.search_active = false;
        }
    }
}
