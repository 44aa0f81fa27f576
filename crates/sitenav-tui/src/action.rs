//! Action enum: the only way state changes in the TUI.
//!
//! Key events, background tasks and the data bridge all produce actions;
//! the app loop drains them and routes each one to itself or the screens.

use std::sync::Arc;

use sitenav_core::{
    AutofillOutcome, Category, FeatureSettings, FieldError, ModerationStatus, SubmitOutcome,
    Toast, Website, WebsiteId, WebsiteQuery,
};

use crate::screen::ScreenId;

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ────────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ───────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,
    ToggleHelp,

    // ── Search (owned by the app, shown in the header) ───────────────
    OpenSearch,
    CloseSearch,
    SearchInput(String),
    SearchSubmit,

    // ── Store updates from the data bridge ───────────────────────────
    WebsitesUpdated(Arc<Vec<Arc<Website>>>),
    CategoriesUpdated(Arc<Vec<Arc<Category>>>),
    SettingsUpdated(FeatureSettings),

    // ── Requests to the app ──────────────────────────────────────────
    LoadListing(WebsiteQuery),
    ReloadCategories,
    Visit { id: WebsiteId, url: String },
    UpdateStatus(WebsiteId, ModerationStatus),

    // ── Submission results ───────────────────────────────────────────
    AutofillFinished(AutofillOutcome),
    SubmitFinished(SubmitOutcome),
    SubmitRejected(Vec<FieldError>),

    // ── Notifications ────────────────────────────────────────────────
    Notify(Toast),
    DismissNotification,
}
