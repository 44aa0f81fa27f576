//! Application core: event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tui_input::{Input, InputRequest};

use sitenav_config::UiSettings;
use sitenav_core::{Directory, ModerationStatus, Toast, WebsiteId, WebsiteQuery};

use crate::action::Action;
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::text_input::input_request;

const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Below this width the tab bar uses short labels.
const NARROW_WIDTH: u16 = 60;

/// Top-level application state and event loop.
pub struct App {
    directory: Directory,
    active_screen: ScreenId,
    previous_screen: Option<ScreenId>,
    /// Tabs the current role can reach, in display order.
    tabs: Vec<ScreenId>,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    search_active: bool,
    search: Input,
    terminal_size: (u16, u16),
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Cancels the data bridge task on exit.
    data_cancel: CancellationToken,
    notification: Option<(Toast, Instant)>,
}

impl App {
    pub fn new(directory: Directory, ui: UiSettings) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens = create_screens(&directory, ui).into_iter().collect();
        let tabs = ScreenId::for_role(directory.role());

        Self {
            directory,
            active_screen: ScreenId::Home,
            previous_screen: None,
            tabs,
            screens,
            running: true,
            help_visible: false,
            search_active: false,
            search: Input::default(),
            terminal_size: (0, 0),
            action_tx,
            action_rx,
            data_cancel: CancellationToken::new(),
            notification: None,
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.terminal_size = tui.size().unwrap_or((80, 24));
        self.init_screens()?;

        let directory = self.directory.clone();
        let cancel = self.data_cancel.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            crate::data_bridge::spawn_data_bridge(directory, tx, cancel).await;
        });

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(role = %self.directory.role(), "TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(action) = self.handle_mouse_event(mouse)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Paste(text) => {
                    if let Some(action) = self.handle_paste(&text)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    fn active(&mut self) -> Option<&mut Box<dyn Component>> {
        self.screens.get_mut(&self.active_screen)
    }

    /// Map a key event to an action. Global keys are handled here;
    /// everything else goes to the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.search_active {
            return Ok(match key.code {
                KeyCode::Esc => Some(Action::CloseSearch),
                KeyCode::Enter => Some(Action::SearchSubmit),
                _ => input_request(key)
                    .and_then(|req| self.search.handle(req))
                    .map(|_| Action::SearchInput(self.search.value().to_owned())),
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        if self.active().is_some_and(|s| s.captures_input()) {
            return match self.active() {
                Some(screen) => screen.handle_key_event(key),
                None => Ok(None),
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::NONE, KeyCode::Char('/')) => return Ok(Some(Action::OpenSearch)),

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let target = c
                    .to_digit(10)
                    .and_then(|n| u8::try_from(n).ok())
                    .and_then(ScreenId::from_number)
                    .filter(|s| self.tabs.contains(s));
                return Ok(target.map(Action::SwitchScreen));
            }

            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(
                    self.active_screen.next_in(&self.tabs),
                )));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(
                    self.active_screen.prev_in(&self.tabs),
                )));
            }

            (KeyModifiers::NONE, KeyCode::Esc) => {
                return Ok(Some(if self.notification.is_some() {
                    Action::DismissNotification
                } else {
                    Action::GoBack
                }));
            }

            _ => {}
        }

        match self.active() {
            Some(screen) => screen.handle_key_event(key),
            None => Ok(None),
        }
    }

    /// Pastes go to the search line or an input-capturing screen.
    fn handle_paste(&mut self, text: &str) -> Result<Option<Action>> {
        if self.search_active {
            for c in text.chars().filter(|c| !c.is_control()) {
                self.search.handle(InputRequest::InsertChar(c));
            }
            return Ok(Some(Action::SearchInput(self.search.value().to_owned())));
        }
        match self.active() {
            Some(screen) if screen.captures_input() => screen.handle_paste(text),
            _ => Ok(None),
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        match self.active() {
            Some(screen) => screen.handle_mouse_event(mouse),
            None => Ok(None),
        }
    }

    /// Forward an action to one screen and queue its follow-up.
    fn forward_to(&mut self, id: ScreenId, action: &Action) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&id) {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Resize(w, h) => self.terminal_size = (*w, *h),

            Action::Render => {}

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
                self.forward_to(self.active_screen, action)?;
            }

            Action::SwitchScreen(target) => self.switch_screen(*target),

            Action::GoBack => {
                let target = self.previous_screen.take().unwrap_or(ScreenId::Home);
                self.switch_screen(target);
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            // ── Search ───────────────────────────────────────────────
            Action::OpenSearch => {
                self.search_active = true;
                self.search.reset();
                self.forward_to(self.active_screen, action)?;
            }
            Action::CloseSearch => {
                self.search_active = false;
                self.search.reset();
                self.forward_to(self.active_screen, action)?;
            }
            Action::SearchSubmit => {
                self.search_active = false;
                self.forward_to(self.active_screen, action)?;
            }

            // ── Store updates go to every screen ─────────────────────
            Action::WebsitesUpdated(_)
            | Action::CategoriesUpdated(_)
            | Action::SettingsUpdated(_) => {
                let ids: Vec<ScreenId> = self.screens.keys().copied().collect();
                for id in ids {
                    self.forward_to(id, action)?;
                }
            }

            // ── Directory requests ───────────────────────────────────
            Action::LoadListing(query) => self.load_listing(query.clone()),
            Action::ReloadCategories => self.reload_categories(),
            Action::Visit { id, url } => self.record_visit(*id, url),
            Action::UpdateStatus(id, status) => self.update_status(*id, *status),

            // ── Submission results belong to the form ────────────────
            Action::AutofillFinished(_) | Action::SubmitFinished(_) | Action::SubmitRejected(_) => {
                self.forward_to(ScreenId::Submit, action)?;
            }

            Action::Notify(toast) => {
                self.notification = Some((toast.clone(), Instant::now()));
            }
            Action::DismissNotification => self.notification = None,

            other => self.forward_to(self.active_screen, other)?,
        }
        Ok(())
    }

    fn switch_screen(&mut self, target: ScreenId) {
        if target == self.active_screen || !self.tabs.contains(&target) {
            return;
        }
        debug!("switching screen: {} \u{2192} {}", self.active_screen, target);
        if let Some(screen) = self.active() {
            screen.set_focused(false);
        }
        self.search_active = false;
        self.search.reset();
        self.previous_screen = Some(self.active_screen);
        self.active_screen = target;
        if let Some(screen) = self.active() {
            screen.set_focused(true);
        }
    }

    // ── Background requests ──────────────────────────────────────────

    fn load_listing(&self, query: WebsiteQuery) {
        let directory = self.directory.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match directory.refresh_websites(&query).await {
                Ok(count) => debug!(count, ?query, "listing refreshed"),
                Err(e) => {
                    warn!(error = %e, "listing refresh failed");
                    let _ = tx.send(Action::Notify(e.toast()));
                }
            }
        });
    }

    fn reload_categories(&self) {
        let directory = self.directory.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = directory.load_categories().await {
                warn!(error = %e, "category reload failed");
                let _ = tx.send(Action::Notify(e.toast()));
            }
        });
    }

    fn record_visit(&self, id: WebsiteId, url: &str) {
        let directory = self.directory.clone();
        tokio::spawn(async move {
            if let Err(e) = directory.record_visit(id).await {
                warn!(%id, error = %e, "visit not recorded");
            }
        });
        let _ = self
            .action_tx
            .send(Action::Notify(Toast::info("Opening", url.to_owned())));
    }

    fn update_status(&self, id: WebsiteId, status: ModerationStatus) {
        let directory = self.directory.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let toast = match directory.set_status(id, status).await {
                Ok(()) => Toast::info(
                    "Status updated",
                    format!("Website marked as {}", status.as_str()),
                ),
                Err(e) => {
                    warn!(%id, error = %e, "status update failed");
                    e.toast()
                }
            };
            let _ = tx.send(Action::Notify(toast));
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let [content, tab_bar, status_bar] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, content);
        }
        self.render_tab_bar(frame, tab_bar);
        self.render_status_bar(frame, status_bar);

        if let Some((toast, _)) = &self.notification {
            render_notification(frame, area, toast);
        }
        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let narrow = self.terminal_size.0 > 0 && self.terminal_size.0 < NARROW_WIDTH;
        let titles: Vec<Line> = self
            .tabs
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                let label = if narrow { id.label_short() } else { id.label() };
                Line::from(Span::styled(format!(" {} {label} ", id.number()), style))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                self.tabs
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if self.search_active {
            let line = Line::from(vec![
                Span::styled(" / ", Style::default().fg(theme::ELECTRIC_PURPLE)),
                Span::styled(self.search.value(), Style::default().fg(theme::NEON_CYAN)),
                Span::styled("\u{2588}", Style::default().fg(theme::NEON_CYAN)),
                Span::styled("  Esc cancel  Enter search", theme::key_hint()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        let role = self.directory.role();
        let role_style = if role.is_admin() {
            Style::default().fg(theme::CORAL)
        } else {
            Style::default().fg(theme::SUCCESS_GREEN)
        };
        let host = self
            .directory
            .backend()
            .base_url()
            .host_str()
            .unwrap_or("directory")
            .to_owned();

        let line = Line::from(vec![
            Span::raw(" "),
            Span::styled(format!("\u{25CF} {role}"), role_style),
            Span::styled(format!(" @ {host}"), theme::card_text()),
            Span::styled(" \u{2502} ? help  / search  q quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Toast in the bottom-right corner, above the status bar.
fn render_notification(frame: &mut Frame, area: Rect, toast: &Toast) {
    let text_len = toast
        .title
        .chars()
        .count()
        .max(toast.description.chars().count());
    let width = u16::try_from(text_len + 6).unwrap_or(u16::MAX).clamp(24, 60);
    let height = 4u16;

    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2);
    let toast_area = Rect::new(area.x + x, area.y + y, width.min(area.width), height.min(area.height));

    let (color, icon) = if toast.is_destructive() {
        (theme::ERROR_RED, "\u{2717}")
    } else {
        (theme::NEON_CYAN, "\u{00B7}")
    };

    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        toast_area,
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color));
    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let lines = vec![
        Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(color)),
            Span::styled(toast.title.as_str(), theme::title_style()),
        ]),
        Line::from(Span::styled(
            format!("   {}", toast.description),
            Style::default().fg(theme::DIM_WHITE),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn help_row(keys: &'static str, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {keys:<10}"), theme::key_hint_key()),
        Span::styled(what, theme::key_hint()),
    ])
}

fn help_section(title: &'static str) -> [Line<'static>; 2] {
    [
        Line::from(Span::styled(
            format!("  {title}"),
            Style::default().fg(theme::NEON_CYAN),
        )),
        Line::from(Span::styled(
            format!("  {}", "\u{2500}".repeat(title.len())),
            theme::key_hint(),
        )),
    ]
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = 56u16.min(area.width.saturating_sub(4));
    let height = 24u16.min(area.height.saturating_sub(4));
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    let help_area = Rect::new(area.x + x, area.y + y, width, height);

    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        help_area,
    );
    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let mut lines = vec![Line::from("")];
    lines.extend(help_section("Listing"));
    lines.extend([
        help_row("j/k \u{2191}/\u{2193}", "Move between cards"),
        help_row("g/G", "Top / bottom"),
        help_row("Enter", "Visit website"),
        help_row("l", "Like"),
        help_row("[ ]", "Previous / next category"),
        help_row("a / r", "Approve / reject (admin)"),
        help_row("\u{2190}/\u{2192}", "Status tabs (moderation)"),
        help_row("R", "Refresh"),
        Line::from(""),
    ]);
    lines.extend(help_section("Submit"));
    lines.extend([
        help_row("Tab", "Next field"),
        help_row("Ctrl+F", "Auto-fill from URL"),
        help_row("Enter", "Submit"),
        Line::from(""),
    ]);
    lines.extend(help_section("Global"));
    lines.extend([
        help_row("1-3 Tab", "Switch screen"),
        help_row("/", "Search"),
        help_row("Esc", "Back / dismiss"),
        help_row("q", "Quit"),
    ]);

    frame.render_widget(Paragraph::new(lines), inner);
}
