// ── Backend seam ──
//
// Every network call the front-ends make goes through `DirectoryBackend`.
// `DirectoryClient` is the production implementation; tests substitute
// counting fakes.

use std::future::Future;

use sitenav_api::DirectoryClient;

use crate::error::CoreError;
use crate::model::{
    Category, FeatureSettings, ModerationStatus, NewWebsite, PageMetadata, Website, WebsiteId,
    WebsiteQuery,
};

/// Request/response interface to the directory service.
pub trait DirectoryBackend: Send + Sync + 'static {
    fn list_categories(&self) -> impl Future<Output = Result<Vec<Category>, CoreError>> + Send;

    fn list_websites(
        &self,
        query: &WebsiteQuery,
    ) -> impl Future<Output = Result<Vec<Website>, CoreError>> + Send;

    fn get_website(&self, id: WebsiteId)
    -> impl Future<Output = Result<Website, CoreError>> + Send;

    /// `Ok(None)` when the backend accepted the entry without echoing it.
    fn create_website(
        &self,
        website: &NewWebsite,
    ) -> impl Future<Output = Result<Option<Website>, CoreError>> + Send;

    /// Increment the like counter. Callers fire this and do not inspect it.
    fn like_website(&self, id: WebsiteId) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn record_visit(&self, id: WebsiteId) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn update_status(
        &self,
        id: WebsiteId,
        status: ModerationStatus,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn fetch_metadata(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<PageMetadata, CoreError>> + Send;

    fn fetch_settings(&self) -> impl Future<Output = Result<FeatureSettings, CoreError>> + Send;
}

impl DirectoryBackend for DirectoryClient {
    async fn list_categories(&self) -> Result<Vec<Category>, CoreError> {
        let raw = DirectoryClient::list_categories(self).await?;
        Ok(raw.into_iter().map(Category::from).collect())
    }

    async fn list_websites(&self, query: &WebsiteQuery) -> Result<Vec<Website>, CoreError> {
        let raw = DirectoryClient::list_websites(self, &query.into()).await?;
        Ok(raw.into_iter().map(Website::from).collect())
    }

    async fn get_website(&self, id: WebsiteId) -> Result<Website, CoreError> {
        Ok(DirectoryClient::get_website(self, id.get()).await?.into())
    }

    async fn create_website(&self, website: &NewWebsite) -> Result<Option<Website>, CoreError> {
        Ok(DirectoryClient::create_website(self, &website.into())
            .await?
            .map(Website::from))
    }

    async fn like_website(&self, id: WebsiteId) -> Result<(), CoreError> {
        Ok(DirectoryClient::like_website(self, id.get()).await?)
    }

    async fn record_visit(&self, id: WebsiteId) -> Result<(), CoreError> {
        Ok(DirectoryClient::record_visit(self, id.get()).await?)
    }

    async fn update_status(&self, id: WebsiteId, status: ModerationStatus) -> Result<(), CoreError> {
        Ok(DirectoryClient::update_status(self, id.get(), status.as_str()).await?)
    }

    async fn fetch_metadata(&self, url: &str) -> Result<PageMetadata, CoreError> {
        Ok(DirectoryClient::fetch_metadata(self, url).await?.into())
    }

    async fn fetch_settings(&self) -> Result<FeatureSettings, CoreError> {
        Ok(DirectoryClient::get_settings(self).await?.into())
    }
}
