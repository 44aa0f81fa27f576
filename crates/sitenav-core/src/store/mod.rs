// ── Application store ──
//
// Shared client state: categories, the current website listing, feature
// settings and the actor role. Each field has exactly one writer inside
// this crate (category loader, listing refresh, settings loader); the
// role is fixed at construction. Readers get snapshots or subscriptions.

mod collection;

use collection::EntityCollection;

use std::sync::Arc;

use tokio::sync::watch;

use crate::model::{Category, CategoryId, FeatureSettings, Role, Website, WebsiteId};
use crate::stream::Snapshots;


pub struct AppStore {
    pub(crate) categories: EntityCollection<CategoryId, Category>,
    pub(crate) websites: EntityCollection<WebsiteId, Website>,
    pub(crate) settings: watch::Sender<FeatureSettings>,
    role: Role,
}

impl AppStore {
    pub fn new(role: Role) -> Self {
        let (settings, _) = watch::channel(FeatureSettings::default());
        Self {
            categories: EntityCollection::new(),
            websites: EntityCollection::new(),
            settings,
            role,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    // ── Categories ───────────────────────────────────────────────────

    pub fn categories_snapshot(&self) -> Arc<Vec<Arc<Category>>> {
        self.categories.snapshot()
    }

    pub fn subscribe_categories(&self) -> Snapshots<Category> {
        Snapshots::new(self.categories.subscribe())
    }

    pub fn has_categories(&self) -> bool {
        !self.categories.is_empty()
    }

    pub fn category(&self, id: CategoryId) -> Option<Arc<Category>> {
        self.categories.get(&id)
    }

    /// Category display name, `Uncategorized` when unknown.
    pub fn category_name(&self, id: Option<CategoryId>) -> String {
        let snapshot = self.categories.snapshot();
        Category::name_for(snapshot.iter().map(|c| &**c), id)
    }

    pub(crate) fn set_categories(&self, categories: Vec<Category>) {
        self.categories
            .replace_all(categories.into_iter().map(|c| (c.id, c)));
    }

    // ── Websites ─────────────────────────────────────────────────────

    pub fn websites_snapshot(&self) -> Arc<Vec<Arc<Website>>> {
        self.websites.snapshot()
    }

    pub fn subscribe_websites(&self) -> Snapshots<Website> {
        Snapshots::new(self.websites.subscribe())
    }

    pub fn website(&self, id: WebsiteId) -> Option<Arc<Website>> {
        self.websites.get(&id)
    }

    pub fn website_count(&self) -> usize {
        self.websites.len()
    }

    /// Monotonic counter bumped on every listing change.
    pub fn websites_version(&self) -> u64 {
        self.websites.version()
    }

    pub(crate) fn set_websites(&self, websites: Vec<Website>) {
        self.websites
            .replace_all(websites.into_iter().map(|w| (w.id, w)));
    }

    pub(crate) fn upsert_website(&self, website: Website) {
        self.websites.upsert(website.id, website);
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub fn settings(&self) -> FeatureSettings {
        *self.settings.borrow()
    }

    pub fn subscribe_settings(&self) -> watch::Receiver<FeatureSettings> {
        self.settings.subscribe()
    }

    pub(crate) fn set_settings(&self, settings: FeatureSettings) {
        self.settings.send_replace(settings);
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new(Role::User)
    }
}
