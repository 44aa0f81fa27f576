//! Submission form: URL, title, description, category and thumbnail.
//!
//! Auto-fill and submit run as background tasks through the directory's
//! submission flow; their results come back as actions. The form never
//! touches the listing itself.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;
use tui_input::{Input, InputRequest};

use sitenav_core::{
    AutofillOutcome, Category, CoreError, Directory, FeatureSettings, FieldError, FormField, Route,
    Toast, WebsiteDraft,
};

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;
use crate::widgets::sub_tabs::cycle;
use crate::widgets::text_input::{input_request, render_input};

pub struct SubmitScreen {
    directory: Directory,
    action_tx: Option<UnboundedSender<Action>>,
    focused: bool,
    active: FormField,
    url: Input,
    title: Input,
    description: Input,
    thumbnail: Input,
    categories: Arc<Vec<Arc<Category>>>,
    /// Index into `categories`; `None` until the user picks one.
    category: Option<usize>,
    settings: FeatureSettings,
    errors: Vec<FieldError>,
    throbber: ThrobberState,
}

impl SubmitScreen {
    pub fn new(directory: Directory) -> Self {
        Self {
            directory,
            action_tx: None,
            focused: false,
            active: FormField::Url,
            url: Input::default(),
            title: Input::default(),
            description: Input::default(),
            thumbnail: Input::default(),
            categories: Arc::new(Vec::new()),
            category: None,
            settings: FeatureSettings::default(),
            errors: Vec::new(),
            throbber: ThrobberState::default(),
        }
    }

    pub fn draft(&self) -> WebsiteDraft {
        WebsiteDraft {
            url: self.url.value().to_owned(),
            title: self.title.value().to_owned(),
            description: self.description.value().to_owned(),
            category_id: self
                .category
                .and_then(|i| self.categories.get(i))
                .map(|c| c.id),
            thumbnail: self.thumbnail.value().to_owned(),
        }
    }

    fn input_mut(&mut self, field: FormField) -> Option<&mut Input> {
        match field {
            FormField::Url => Some(&mut self.url),
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::Thumbnail => Some(&mut self.thumbnail),
            FormField::Category => None,
        }
    }

    fn input(&self, field: FormField) -> Option<&Input> {
        match field {
            FormField::Url => Some(&self.url),
            FormField::Title => Some(&self.title),
            FormField::Description => Some(&self.description),
            FormField::Thumbnail => Some(&self.thumbnail),
            FormField::Category => None,
        }
    }

    fn reset(&mut self) {
        self.url.reset();
        self.title.reset();
        self.description.reset();
        self.thumbnail.reset();
        self.category = None;
        self.errors.clear();
        self.active = FormField::Url;
    }

    fn busy(&self) -> bool {
        let flow = self.directory.submission();
        flow.is_submitting() || flow.is_fetching()
    }

    fn submissions_blocked(&self) -> bool {
        !self.settings.allow_submissions && !self.directory.role().is_admin()
    }

    fn notify(&self, toast: Toast) {
        if let Some(tx) = &self.action_tx {
            let _ = tx.send(Action::Notify(toast));
        }
    }

    // ── Operations ───────────────────────────────────────────────────

    fn start_autofill(&self) -> Option<Action> {
        let draft = self.draft();
        if !draft.can_autofill() {
            return Some(Action::Notify(Toast::info(
                "Auto-fill unavailable",
                "Enter a URL starting with http:// or https://",
            )));
        }
        if !self.directory.submission().autofill_available(&draft) {
            debug!("auto-fill busy, ignoring");
            return None;
        }
        let tx = self.action_tx.clone()?;
        let directory = self.directory.clone();
        tokio::spawn(async move {
            match directory.autofill(&draft).await {
                Ok(Some(outcome)) => {
                    let _ = tx.send(Action::AutofillFinished(outcome));
                }
                Ok(None) => {}
                Err(e) => {
                    let _ = tx.send(Action::Notify(e.toast()));
                }
            }
        });
        None
    }

    fn start_submit(&self) -> Option<Action> {
        let draft = self.draft();
        let tx = self.action_tx.clone()?;
        let directory = self.directory.clone();
        tokio::spawn(async move {
            match directory.submit(&draft).await {
                Ok(Some(outcome)) => {
                    let _ = tx.send(Action::SubmitFinished(outcome));
                }
                Ok(None) => debug!("submit already in flight"),
                Err(e) => {
                    if let CoreError::Invalid { errors } = &e {
                        let _ = tx.send(Action::SubmitRejected(errors.clone()));
                    }
                    let _ = tx.send(Action::Notify(e.toast()));
                }
            }
        });
        None
    }

    fn apply_autofill(&mut self, outcome: &AutofillOutcome) {
        let mut draft = self.draft();
        for field in draft.apply_metadata(&outcome.metadata) {
            let value = match field {
                FormField::Title => std::mem::take(&mut draft.title),
                FormField::Description => std::mem::take(&mut draft.description),
                FormField::Thumbnail => std::mem::take(&mut draft.thumbnail),
                FormField::Url | FormField::Category => continue,
            };
            if let Some(input) = self.input_mut(field) {
                *input = Input::new(value);
            }
        }
    }

    fn select_category(&mut self, forward: bool) {
        if self.categories.is_empty() {
            return;
        }
        self.category = Some(match self.category {
            None if forward => 0,
            None => self.categories.len() - 1,
            Some(i) => cycle(i, self.categories.len(), forward),
        });
    }

    fn keep_category_selection(&mut self, categories: Arc<Vec<Arc<Category>>>) {
        let selected = self
            .category
            .and_then(|i| self.categories.get(i))
            .map(|c| c.id);
        self.categories = categories;
        self.category = selected.and_then(|id| self.categories.iter().position(|c| c.id == id));
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn field_error(&self, field: FormField) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    fn label(field: FormField) -> String {
        if field.is_required() {
            format!("{field} *")
        } else {
            format!("{field} (optional)")
        }
    }

    fn render_category(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focused && self.active == FormField::Category;
        let block = Block::default()
            .title(format!(" {} ", Self::label(FormField::Category)))
            .title_style(if focused {
                theme::title_style()
            } else {
                theme::key_hint()
            })
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let line = if self.categories.is_empty() {
            let text = if self.directory.is_loading_categories() {
                "Loading categories\u{2026}"
            } else {
                "No categories loaded (Ctrl+R to retry)"
            };
            Line::from(Span::styled(text, theme::key_hint()))
        } else {
            match self.category.and_then(|i| self.categories.get(i)) {
                Some(category) => Line::from(vec![
                    Span::styled("\u{25C2} ", theme::key_hint()),
                    Span::styled(category.name.clone(), Style::default().fg(theme::CORAL)),
                    Span::styled(" \u{25B8}", theme::key_hint()),
                ]),
                None => Line::from(Span::styled(
                    "\u{25C2} Select a category \u{25B8}",
                    theme::key_hint(),
                )),
            }
        };
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let flow = self.directory.submission();
        let label = if flow.is_submitting() {
            Some("  Submitting\u{2026}")
        } else if flow.is_fetching() {
            Some("  Fetching page details\u{2026}")
        } else {
            None
        };

        if let Some(label) = label {
            let throbber = Throbber::default()
                .label(label)
                .style(Style::default().fg(theme::NEON_CYAN))
                .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
            frame.render_stateful_widget(throbber, area, &mut self.throbber.clone());
        } else if self.submissions_blocked() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  Website submissions are temporarily disabled",
                    Style::default().fg(theme::ELECTRIC_YELLOW),
                )),
                area,
            );
        }
    }
}

impl Component for SubmitScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let action = match key.code {
            KeyCode::Esc => Some(Action::GoBack),
            KeyCode::Tab => {
                self.active = self.active.next();
                None
            }
            KeyCode::BackTab => {
                self.active = self.active.prev();
                None
            }
            KeyCode::Char('f') if ctrl => self.start_autofill(),
            KeyCode::Char('s') if ctrl => self.start_submit(),
            KeyCode::Char('r') if ctrl => Some(Action::ReloadCategories),
            KeyCode::Enter => self.start_submit(),
            KeyCode::Left | KeyCode::Right if self.active == FormField::Category => {
                self.select_category(key.code == KeyCode::Right);
                None
            }
            _ => {
                let field = self.active;
                if let (Some(req), Some(input)) = (input_request(key), self.input_mut(field)) {
                    input.handle(req);
                }
                None
            }
        };
        Ok(action)
    }

    fn handle_paste(&mut self, text: &str) -> Result<Option<Action>> {
        let field = self.active;
        if let Some(input) = self.input_mut(field) {
            for c in text.trim().chars().filter(|c| !c.is_control()) {
                input.handle(InputRequest::InsertChar(c));
            }
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::CategoriesUpdated(categories) => {
                self.keep_category_selection(Arc::clone(categories));
            }
            Action::SettingsUpdated(settings) => self.settings = *settings,
            Action::Tick => {
                if self.busy() {
                    self.throbber.calc_next();
                }
            }
            Action::AutofillFinished(outcome) => {
                self.apply_autofill(outcome);
                return Ok(Some(Action::Notify(outcome.toast.clone())));
            }
            Action::SubmitRejected(errors) => self.errors.clone_from(errors),
            Action::SubmitFinished(outcome) => {
                self.reset();
                self.notify(outcome.toast.clone());
                let target = match outcome.route {
                    Route::Home => ScreenId::Home,
                    Route::ModerationQueue => ScreenId::Moderation,
                };
                return Ok(Some(Action::SwitchScreen(target)));
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Submit a website ")
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

        // Each field: 3-row box plus 1 row for its error.
        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

        self.render_status(frame, layout[0]);

        for (field, slot) in [
            FormField::Url,
            FormField::Title,
            FormField::Description,
            FormField::Category,
            FormField::Thumbnail,
        ]
        .into_iter()
        .zip(layout.iter().skip(1))
        {
            let [boxed, error] = Layout::vertical([Constraint::Length(3), Constraint::Length(1)])
                .areas(*slot);

            match self.input(field) {
                Some(input) => render_input(
                    frame,
                    boxed,
                    &Self::label(field),
                    input,
                    self.focused && self.active == field,
                    if field == FormField::Url {
                        "https://example.com"
                    } else {
                        ""
                    },
                ),
                None => self.render_category(frame, boxed),
            }

            if let Some(err) = self.field_error(field) {
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        format!("  {} {}", err.field, err.message),
                        theme::field_error(),
                    )),
                    error,
                );
            }
        }

        let hints = Line::from(vec![
            Span::styled(" Tab ", theme::key_hint_key()),
            Span::styled("next field  ", theme::key_hint()),
            Span::styled("Ctrl+F ", theme::key_hint_key()),
            Span::styled("auto-fill  ", theme::key_hint()),
            Span::styled("\u{2190}/\u{2192} ", theme::key_hint_key()),
            Span::styled("category  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("submit  ", theme::key_hint()),
            Span::styled("Esc ", theme::key_hint_key()),
            Span::styled("back", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[7]);
    }

    fn captures_input(&self) -> bool {
        true
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    use sitenav_core::{
        CategoryId, DirectoryConfig, MemoryLikeStore, ModerationStatus,
        PageMetadata, Role, SubmitOutcome, Website, WebsiteId,
    };

    use super::*;

    fn screen(role: Role) -> (SubmitScreen, mpsc::UnboundedReceiver<Action>) {
        let mut config =
            DirectoryConfig::new(sitenav_config::parse_server("http://127.0.0.1:9").unwrap());
        config.role = role;
        let directory =
            Directory::from_config(&config, Arc::new(MemoryLikeStore::new())).unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        let mut screen = SubmitScreen::new(directory);
        screen.init(tx).unwrap();
        (screen, rx)
    }

    fn type_text(screen: &mut SubmitScreen, text: &str) {
        for c in text.chars() {
            screen
                .handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
                .unwrap();
        }
    }

    fn press(screen: &mut SubmitScreen, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, modifiers))
            .unwrap()
    }

    fn categories() -> Arc<Vec<Arc<Category>>> {
        Arc::new(vec![
            Arc::new(Category {
                id: CategoryId(1),
                name: "Tools".into(),
            }),
            Arc::new(Category {
                id: CategoryId(2),
                name: "News".into(),
            }),
        ])
    }

    #[tokio::test]
    async fn typing_fills_the_focused_field() {
        let (mut screen, _rx) = screen(Role::User);
        type_text(&mut screen, "https://crates.io");
        press(&mut screen, KeyCode::Tab, KeyModifiers::NONE);
        type_text(&mut screen, "crates.io");

        let draft = screen.draft();
        assert_eq!(draft.url, "https://crates.io");
        assert_eq!(draft.title, "crates.io");
        assert_eq!(draft.category_id, None);
    }

    #[tokio::test]
    async fn pasted_url_lands_in_focused_field() {
        let (mut screen, _rx) = screen(Role::User);
        screen.handle_paste("  https://docs.rs\n").unwrap();
        assert_eq!(screen.draft().url, "https://docs.rs");
        assert!(screen.draft().can_autofill());
    }

    #[tokio::test]
    async fn category_picker_cycles_loaded_categories() {
        let (mut screen, _rx) = screen(Role::User);
        screen.update(&Action::CategoriesUpdated(categories())).unwrap();
        screen.active = FormField::Category;

        press(&mut screen, KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(screen.draft().category_id, Some(CategoryId(1)));
        press(&mut screen, KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(screen.draft().category_id, Some(CategoryId(2)));

        // Reloaded categories keep the selection by id.
        let reordered = Arc::new(categories().iter().rev().cloned().collect::<Vec<_>>());
        screen.update(&Action::CategoriesUpdated(reordered)).unwrap();
        assert_eq!(screen.draft().category_id, Some(CategoryId(2)));
    }

    #[tokio::test]
    async fn autofill_needs_a_web_url() {
        let (mut screen, _rx) = screen(Role::User);
        type_text(&mut screen, "crates.io");
        let Some(Action::Notify(toast)) = press(&mut screen, KeyCode::Char('f'), KeyModifiers::CONTROL)
        else {
            panic!("expected a hint toast");
        };
        assert!(!toast.is_destructive());
    }

    #[tokio::test]
    async fn autofill_overwrites_only_returned_fields() {
        let (mut screen, _rx) = screen(Role::User);
        screen.description = Input::new("keep me".into());
        screen.thumbnail = Input::new("https://img.example/a.png".into());

        let follow_up = screen
            .update(&Action::AutofillFinished(AutofillOutcome {
                metadata: PageMetadata {
                    title: Some("A".into()),
                    ..PageMetadata::default()
                },
                toast: Toast::info("Fetched", "Website details filled in automatically"),
            }))
            .unwrap();

        assert!(matches!(follow_up, Some(Action::Notify(_))));
        let draft = screen.draft();
        assert_eq!(draft.title, "A");
        assert_eq!(draft.description, "keep me");
        assert_eq!(draft.thumbnail, "https://img.example/a.png");
    }

    #[tokio::test]
    async fn rejected_fields_are_shown_until_reset() {
        let (mut screen, _rx) = screen(Role::User);
        screen
            .update(&Action::SubmitRejected(vec![FieldError {
                field: FormField::Title,
                message: "is required".into(),
            }]))
            .unwrap();
        assert!(screen.field_error(FormField::Title).is_some());
        assert!(screen.field_error(FormField::Url).is_none());
    }

    #[tokio::test]
    async fn admin_submit_routes_to_moderation_and_resets() {
        let (mut screen, mut rx) = screen(Role::Admin);
        type_text(&mut screen, "https://crates.io");

        let outcome = SubmitOutcome {
            website: Some(Website {
                id: WebsiteId(9),
                title: "crates.io".into(),
                url: "https://crates.io".into(),
                description: "Registry".into(),
                category_id: Some(CategoryId(1)),
                thumbnail: None,
                status: ModerationStatus::Approved,
                visits: 0,
                likes: 0,
                created_at: None,
            }),
            status: ModerationStatus::Approved,
            route: Route::ModerationQueue,
            toast: Toast::info("Submitted!", "The website was added to the approved list."),
        };

        let follow_up = screen.update(&Action::SubmitFinished(outcome)).unwrap();
        assert!(matches!(
            follow_up,
            Some(Action::SwitchScreen(ScreenId::Moderation))
        ));
        assert!(matches!(rx.try_recv(), Ok(Action::Notify(_))));
        assert_eq!(screen.draft(), WebsiteDraft::new());
    }

    #[tokio::test]
    async fn accepted_submit_without_echo_goes_home() {
        let (mut screen, mut rx) = screen(Role::User);
        type_text(&mut screen, "https://crates.io");

        let outcome = SubmitOutcome {
            website: None,
            status: ModerationStatus::Pending,
            route: Route::Home,
            toast: Toast::info("Submitted!", "Your website has been submitted for review."),
        };

        let follow_up = screen.update(&Action::SubmitFinished(outcome)).unwrap();
        assert!(matches!(follow_up, Some(Action::SwitchScreen(ScreenId::Home))));
        assert!(matches!(rx.try_recv(), Ok(Action::Notify(_))));
        assert_eq!(screen.draft(), WebsiteDraft::new());
    }

    #[tokio::test]
    async fn submit_without_category_reports_locally() {
        let (mut screen, mut rx) = screen(Role::User);
        type_text(&mut screen, "https://crates.io");
        press(&mut screen, KeyCode::Enter, KeyModifiers::NONE);

        let Some(Action::Notify(toast)) = rx.recv().await else {
            panic!("expected an error toast");
        };
        assert_eq!(toast.title, "Please select a category");
        assert!(toast.is_destructive());
    }
}
