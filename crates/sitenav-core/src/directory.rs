// ── Directory facade ──
//
// The page-level container both front-ends drive. Bundles the backend,
// the application store, the like store and the submission/category
// flows behind one cheaply cloneable handle.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use sitenav_api::DirectoryClient;

use crate::backend::DirectoryBackend;
use crate::card::{LikeOutcome, WebsiteCard};
use crate::categories::{CategoryLoader, LoadState};
use crate::config::DirectoryConfig;
use crate::error::CoreError;
use crate::form::WebsiteDraft;
use crate::like_store::LikeStore;
use crate::model::{
    FeatureSettings, ModerationStatus, Role, StatusFilter, Website, WebsiteId, WebsiteQuery,
};
use crate::store::AppStore;
use crate::submit::{AutofillOutcome, SubmissionFlow, SubmitOutcome};

/// Handle to a directory backend plus all client-side state.
///
/// Clones share everything via `Arc`.
pub struct Directory<B: DirectoryBackend = DirectoryClient> {
    inner: Arc<DirectoryInner<B>>,
}

impl<B: DirectoryBackend> Clone for Directory<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct DirectoryInner<B> {
    backend: Arc<B>,
    store: Arc<AppStore>,
    likes: Arc<dyn LikeStore>,
    submission: SubmissionFlow,
    categories: CategoryLoader,
    /// Profile override for the submissions switch.
    allow_submissions: Option<bool>,
    /// Query used by the last listing refresh.
    last_query: Mutex<WebsiteQuery>,
}

impl Directory<DirectoryClient> {
    /// Build a handle from connection config. Performs no network I/O.
    pub fn from_config(
        config: &DirectoryConfig,
        likes: Arc<dyn LikeStore>,
    ) -> Result<Self, CoreError> {
        let client = DirectoryClient::new(
            config.url.as_str(),
            config.token.as_ref(),
            &config.transport(),
        )?;
        debug!(base = %client.base_url(), role = %config.role, "directory client ready");
        Ok(Self::new(
            client,
            likes,
            config.role,
            config.allow_submissions,
        ))
    }

    /// Build a handle and resolve feature settings.
    pub async fn connect(
        config: &DirectoryConfig,
        likes: Arc<dyn LikeStore>,
    ) -> Result<Self, CoreError> {
        let directory = Self::from_config(config, likes)?;
        directory.load_settings().await;
        info!(url = %config.url, "connected to directory");
        Ok(directory)
    }
}

impl<B: DirectoryBackend> Directory<B> {
    pub fn new(
        backend: B,
        likes: Arc<dyn LikeStore>,
        role: Role,
        allow_submissions: Option<bool>,
    ) -> Self {
        Self {
            inner: Arc::new(DirectoryInner {
                backend: Arc::new(backend),
                store: Arc::new(AppStore::new(role)),
                likes,
                submission: SubmissionFlow::new(),
                categories: CategoryLoader::new(),
                allow_submissions,
                last_query: Mutex::new(WebsiteQuery::default()),
            }),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn backend(&self) -> &Arc<B> {
        &self.inner.backend
    }

    pub fn store(&self) -> &Arc<AppStore> {
        &self.inner.store
    }

    pub fn role(&self) -> Role {
        self.inner.store.role()
    }

    pub fn submission(&self) -> &SubmissionFlow {
        &self.inner.submission
    }

    pub fn is_loading_categories(&self) -> bool {
        self.inner.categories.is_loading()
    }

    pub fn is_liked(&self, id: WebsiteId) -> bool {
        self.inner.likes.is_liked(id)
    }

    // ── Shared state loaders ─────────────────────────────────────────

    /// Load categories once per session.
    pub async fn load_categories(&self) -> Result<LoadState, CoreError> {
        self.inner
            .categories
            .ensure_loaded(self.inner.backend.as_ref(), &self.inner.store)
            .await
    }

    /// Resolve the submissions switch: profile override, then backend
    /// settings, then allowed.
    pub async fn load_settings(&self) -> FeatureSettings {
        let settings = if let Some(allow) = self.inner.allow_submissions {
            FeatureSettings {
                allow_submissions: allow,
            }
        } else {
            match self.inner.backend.fetch_settings().await {
                Ok(settings) => settings,
                Err(e) => {
                    warn!(error = %e, "settings unavailable, allowing submissions");
                    FeatureSettings::default()
                }
            }
        };
        debug!(?settings, "feature settings resolved");
        self.inner.store.set_settings(settings);
        settings
    }

    /// Reload the listing.
    ///
    /// Non-admins only ever see approved entries, whatever `query` asks.
    pub async fn refresh_websites(&self, query: &WebsiteQuery) -> Result<usize, CoreError> {
        let mut query = query.clone();
        if !self.role().is_admin() {
            query.status = StatusFilter::Approved;
        }

        let websites = self.inner.backend.list_websites(&query).await?;
        let count = websites.len();
        self.inner.store.set_websites(websites);
        if let Ok(mut last) = self.inner.last_query.lock() {
            *last = query;
        }
        debug!(count, "listing refreshed");
        Ok(count)
    }

    /// Re-run the last listing query.
    pub async fn reload_websites(&self) -> Result<usize, CoreError> {
        let query = self
            .inner
            .last_query
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default();
        self.refresh_websites(&query).await
    }

    /// Fetch one entry and fold it into the listing.
    pub async fn website(&self, id: WebsiteId) -> Result<Website, CoreError> {
        let website = self.inner.backend.get_website(id).await?;
        self.inner.store.upsert_website(website.clone());
        Ok(website)
    }

    // ── Submission ───────────────────────────────────────────────────

    pub async fn autofill(
        &self,
        draft: &WebsiteDraft,
    ) -> Result<Option<AutofillOutcome>, CoreError> {
        self.inner
            .submission
            .autofill(self.inner.backend.as_ref(), draft)
            .await
    }

    pub async fn submit(&self, draft: &WebsiteDraft) -> Result<Option<SubmitOutcome>, CoreError> {
        self.inner
            .submission
            .submit(self.inner.backend.as_ref(), &self.inner.store, draft)
            .await
    }

    // ── Card actions ─────────────────────────────────────────────────

    /// Cards for the current listing snapshot.
    pub fn cards(&self) -> Vec<WebsiteCard> {
        let role = self.role();
        self.inner
            .store
            .websites_snapshot()
            .iter()
            .map(|w| WebsiteCard::new(Arc::clone(w), role))
            .collect()
    }

    pub fn card(&self, id: WebsiteId) -> Option<WebsiteCard> {
        self.inner
            .store
            .website(id)
            .map(|w| WebsiteCard::new(w, self.role()))
    }

    /// Like through the shared like store and backend.
    pub fn like(&self, card: &mut WebsiteCard) -> LikeOutcome {
        card.like(self.inner.likes.as_ref(), Arc::clone(&self.inner.backend))
    }

    /// Record a visit server-side.
    pub async fn record_visit(&self, id: WebsiteId) -> Result<(), CoreError> {
        self.inner.backend.record_visit(id).await
    }

    /// Apply an admin status change, then reload the listing.
    ///
    /// The listing is only touched by the reload; a failed update leaves
    /// it as it was.
    pub async fn set_status(&self, id: WebsiteId, status: ModerationStatus) -> Result<(), CoreError> {
        if !self.role().is_admin() {
            return Err(CoreError::AuthenticationFailed {
                message: "moderation requires an admin profile".into(),
            });
        }
        self.inner.backend.update_status(id, status).await?;
        info!(%id, %status, "website status updated");
        if let Err(e) = self.reload_websites().await {
            warn!(error = %e, "listing reload after status update failed");
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::like_store::MemoryLikeStore;
    use crate::model::{Category, CategoryId, NewWebsite, PageMetadata};

    // ── Counting fake backend ────────────────────────────────────────

    #[derive(Default)]
    struct FakeBackend {
        fail_categories: bool,
        settings: Option<FeatureSettings>,
        category_calls: AtomicUsize,
        create_calls: AtomicUsize,
        like_calls: AtomicUsize,
        status_calls: AtomicUsize,
        list_calls: AtomicUsize,
        listed_status: Mutex<Vec<StatusFilter>>,
    }

    fn website(id: i64, status: ModerationStatus) -> Website {
        Website {
            id: WebsiteId(id),
            title: format!("Site {id}"),
            url: format!("https://site{id}.example"),
            description: "desc".into(),
            category_id: Some(CategoryId(1)),
            thumbnail: None,
            status,
            visits: 0,
            likes: 5,
            created_at: None,
        }
    }

    impl DirectoryBackend for FakeBackend {
        async fn list_categories(&self) -> Result<Vec<Category>, CoreError> {
            self.category_calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.fail_categories {
                return Err(CoreError::Api {
                    message: "boom".into(),
                    status: Some(500),
                });
            }
            Ok(vec![Category {
                id: CategoryId(1),
                name: "Tools".into(),
            }])
        }

        async fn list_websites(&self, query: &WebsiteQuery) -> Result<Vec<Website>, CoreError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.listed_status.lock().unwrap().push(query.status);
            Ok(vec![website(1, ModerationStatus::Approved)])
        }

        async fn get_website(&self, id: WebsiteId) -> Result<Website, CoreError> {
            Ok(website(id.get(), ModerationStatus::Pending))
        }

        async fn create_website(&self, new: &NewWebsite) -> Result<Option<Website>, CoreError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            let mut site = website(42, ModerationStatus::Pending);
            site.title.clone_from(&new.title);
            Ok(Some(site))
        }

        async fn like_website(&self, _id: WebsiteId) -> Result<(), CoreError> {
            self.like_calls.fetch_add(1, Ordering::SeqCst);
            Err(CoreError::Internal("like endpoint down".into()))
        }

        async fn record_visit(&self, _id: WebsiteId) -> Result<(), CoreError> {
            Ok(())
        }

        async fn update_status(
            &self,
            _id: WebsiteId,
            _status: ModerationStatus,
        ) -> Result<(), CoreError> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn fetch_metadata(&self, _url: &str) -> Result<PageMetadata, CoreError> {
            Ok(PageMetadata {
                title: Some("A".into()),
                ..PageMetadata::default()
            })
        }

        async fn fetch_settings(&self) -> Result<FeatureSettings, CoreError> {
            self.settings.ok_or(CoreError::Internal("no settings".into()))
        }
    }

    fn directory(backend: FakeBackend, role: Role) -> Directory<FakeBackend> {
        Directory::new(backend, Arc::new(MemoryLikeStore::new()), role, None)
    }

    fn draft() -> WebsiteDraft {
        WebsiteDraft {
            url: "https://example.com".into(),
            title: "Example".into(),
            description: "An example".into(),
            category_id: Some(CategoryId(1)),
            thumbnail: String::new(),
        }
    }

    // ── Tests ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn like_twice_issues_one_request() {
        let dir = directory(FakeBackend::default(), Role::User);
        dir.refresh_websites(&WebsiteQuery::default()).await.unwrap();
        let mut card = dir.card(WebsiteId(1)).unwrap();

        let LikeOutcome::Liked { likes, request } = dir.like(&mut card) else {
            panic!("first like should go through");
        };
        request.await.unwrap();
        assert_eq!(likes, 6);
        assert_eq!(dir.backend().like_calls.load(Ordering::SeqCst), 1);
        assert!(dir.is_liked(WebsiteId(1)));

        let second = dir.like(&mut card);
        assert!(matches!(second, LikeOutcome::AlreadyLiked { .. }));
        assert_eq!(card.likes(), 6);
        assert_eq!(dir.backend().like_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn submit_without_category_makes_no_call() {
        let dir = directory(FakeBackend::default(), Role::User);
        let draft = WebsiteDraft {
            category_id: None,
            ..draft()
        };

        let err = dir.submit(&draft).await.unwrap_err();
        assert!(matches!(err, CoreError::CategoryRequired));
        assert_eq!(dir.backend().create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn disabled_submissions_block_users_only() {
        let backend = FakeBackend {
            settings: Some(FeatureSettings {
                allow_submissions: false,
            }),
            ..FakeBackend::default()
        };
        let dir = directory(backend, Role::User);
        dir.load_settings().await;
        dir.load_categories().await.unwrap();

        let err = dir.submit(&draft()).await.unwrap_err();
        assert!(matches!(err, CoreError::SubmissionsDisabled));
        assert_eq!(dir.backend().create_calls.load(Ordering::SeqCst), 0);

        let admin = Directory::new(
            FakeBackend::default(),
            Arc::new(MemoryLikeStore::new()),
            Role::Admin,
            Some(false),
        );
        admin.load_settings().await;
        admin.load_categories().await.unwrap();
        let outcome = admin.submit(&draft()).await.unwrap().unwrap();
        assert_eq!(outcome.status, ModerationStatus::Approved);
        assert_eq!(outcome.route, crate::submit::Route::ModerationQueue);
    }

    #[tokio::test]
    async fn user_submit_routes_home_as_pending() {
        let dir = directory(FakeBackend::default(), Role::User);
        dir.load_categories().await.unwrap();

        let outcome = dir.submit(&draft()).await.unwrap().unwrap();
        assert_eq!(outcome.status, ModerationStatus::Pending);
        assert_eq!(outcome.route, crate::submit::Route::Home);
        assert_eq!(outcome.website.unwrap().title, "Example");
        assert_eq!(dir.backend().create_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_submits_make_one_call() {
        let dir = directory(FakeBackend::default(), Role::User);
        dir.load_categories().await.unwrap();
        let d = draft();

        let (a, b) = tokio::join!(dir.submit(&d), dir.submit(&d));
        let started = [a.unwrap(), b.unwrap()]
            .iter()
            .filter(|o| o.is_some())
            .count();
        assert_eq!(started, 1);
        assert_eq!(dir.backend().create_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn category_failure_is_retryable_and_not_duplicated() {
        let backend = FakeBackend {
            fail_categories: true,
            ..FakeBackend::default()
        };
        let dir = directory(backend, Role::User);

        let (a, b) = tokio::join!(dir.load_categories(), dir.load_categories());
        let results = [a, b];
        assert_eq!(dir.backend().category_calls.load(Ordering::SeqCst), 1);
        assert!(
            results
                .iter()
                .any(|r| matches!(r, Err(CoreError::CategoriesUnavailable { .. })))
        );
        assert!(results.iter().any(|r| matches!(r, Ok(LoadState::InFlight))));
        assert!(!dir.store().has_categories());

        let retry = dir.load_categories().await;
        assert!(retry.is_err());
        assert_eq!(dir.backend().category_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn categories_load_once() {
        let dir = directory(FakeBackend::default(), Role::User);
        assert_eq!(dir.load_categories().await.unwrap(), LoadState::Loaded(1));
        assert_eq!(dir.load_categories().await.unwrap(), LoadState::Cached);
        assert_eq!(dir.backend().category_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn users_only_list_approved() {
        let dir = directory(FakeBackend::default(), Role::User);
        dir.refresh_websites(&WebsiteQuery::with_status(StatusFilter::Pending))
            .await
            .unwrap();
        assert_eq!(
            *dir.backend().listed_status.lock().unwrap(),
            vec![StatusFilter::Approved]
        );
    }

    #[tokio::test]
    async fn status_update_reloads_listing() {
        let dir = directory(FakeBackend::default(), Role::Admin);
        dir.refresh_websites(&WebsiteQuery::with_status(StatusFilter::Pending))
            .await
            .unwrap();

        dir.set_status(WebsiteId(1), ModerationStatus::Approved)
            .await
            .unwrap();
        assert_eq!(dir.backend().status_calls.load(Ordering::SeqCst), 1);
        assert_eq!(dir.backend().list_calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            *dir.backend().listed_status.lock().unwrap(),
            vec![StatusFilter::Pending, StatusFilter::Pending]
        );
    }

    #[tokio::test]
    async fn users_cannot_moderate() {
        let dir = directory(FakeBackend::default(), Role::User);
        let err = dir
            .set_status(WebsiteId(1), ModerationStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
        assert_eq!(dir.backend().status_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn settings_fall_back_to_allowed() {
        let dir = directory(FakeBackend::default(), Role::User);
        assert!(dir.load_settings().await.allow_submissions);
    }

    #[tokio::test]
    async fn autofill_skips_non_web_urls() {
        let dir = directory(FakeBackend::default(), Role::User);
        let bare = WebsiteDraft {
            url: "example.com".into(),
            ..draft()
        };
        assert!(dir.autofill(&bare).await.unwrap().is_none());

        let outcome = dir.autofill(&draft()).await.unwrap().unwrap();
        assert_eq!(outcome.metadata.title.as_deref(), Some("A"));
    }
}
