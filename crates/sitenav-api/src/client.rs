// Hand-crafted async HTTP client for the sitenav directory backend.
//
// Base path: <server>/api/
// Auth: optional `Authorization: Bearer <token>` header

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::transport::TransportConfig;
use crate::types::{
    CategoryResponse, Envelope, MetadataResponse, SettingsResponse, StatusUpdate, WebsiteCreate,
    WebsiteQuery, WebsiteResponse,
};
use crate::Error;

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the directory backend.
///
/// Talks JSON to the REST endpoints under `/api/`. Cheap to clone; the
/// underlying `reqwest::Client` shares its connection pool.
#[derive(Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl DirectoryClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a server URL, optional bearer token and transport config.
    pub fn new(
        base_url: &str,
        token: Option<&SecretString>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| Error::Authentication {
                    message: format!("invalid token header value: {e}"),
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self {
            http,
            base_url,
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout_secs: 0,
        })
    }

    /// Ensure the base URL ends with `/api/`.
    ///
    /// `https://dir.example.com` and `https://dir.example.com/api` both
    /// become `https://dir.example.com/api/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }

        Ok(url)
    }

    /// The normalized `/api/` base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"websites/3/like"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.send(self.http.get(url)).await?;
        Self::handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.send(self.http.get(url).query(params)).await?;
        Self::handle_response(resp).await
    }

    /// POST whose success body is optional. Any 2xx is a success; an
    /// empty or unrecognised body yields `None`.
    async fn post_optional<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.send(self.http.post(url).json(body)).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let raw = resp.text().await.unwrap_or_default();
        if raw.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str(&raw) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(e) => {
                debug!(%status, error = %e, "unrecognised success body, ignoring");
                Ok(None)
            }
        }
    }

    /// POST with no body, ignoring whatever the backend answers on success.
    async fn post_empty(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.send(self.http.post(url)).await?;
        Self::handle_empty(resp).await
    }

    async fn patch_no_response<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PATCH {url}");

        let resp = self.send(self.http.patch(url).json(body)).await?;
        Self::handle_empty(resp).await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else {
                Error::Transport(e)
            }
        })
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    /// The body text is kept verbatim; callers decide how to present it.
    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Error::Authentication {
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
            };
        }

        Error::Api {
            status: status.as_u16(),
            message: raw,
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Categories ───────────────────────────────────────────────────

    pub async fn list_categories(&self) -> Result<Vec<CategoryResponse>, Error> {
        let env: Envelope<Vec<CategoryResponse>> = self.get("categories").await?;
        Ok(env.into_inner())
    }

    // ── Websites ─────────────────────────────────────────────────────

    pub async fn list_websites(&self, query: &WebsiteQuery) -> Result<Vec<WebsiteResponse>, Error> {
        let env: Envelope<Vec<WebsiteResponse>> =
            self.get_with_params("websites", &query.to_params()).await?;
        Ok(env.into_inner())
    }

    pub async fn get_website(&self, id: i64) -> Result<WebsiteResponse, Error> {
        let env: Envelope<WebsiteResponse> = self.get(&format!("websites/{id}")).await?;
        Ok(env.into_inner())
    }

    /// Submit a new entry. `Ok(None)` means the backend accepted it but did
    /// not echo the created record back.
    pub async fn create_website(
        &self,
        body: &WebsiteCreate,
    ) -> Result<Option<WebsiteResponse>, Error> {
        let env: Option<Envelope<WebsiteResponse>> = self.post_optional("websites", body).await?;
        Ok(env.map(Envelope::into_inner))
    }

    pub async fn like_website(&self, id: i64) -> Result<(), Error> {
        self.post_empty(&format!("websites/{id}/like")).await
    }

    pub async fn record_visit(&self, id: i64) -> Result<(), Error> {
        self.post_empty(&format!("websites/{id}/visit")).await
    }

    pub async fn update_status(&self, id: i64, status: &str) -> Result<(), Error> {
        let body = StatusUpdate {
            status: status.to_owned(),
        };
        self.patch_no_response(&format!("websites/{id}"), &body).await
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub async fn fetch_metadata(&self, page_url: &str) -> Result<MetadataResponse, Error> {
        let env: Envelope<MetadataResponse> = self
            .get_with_params("metadata", &[("url", page_url.to_owned())])
            .await?;
        Ok(env.into_inner())
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub async fn get_settings(&self) -> Result<SettingsResponse, Error> {
        let env: Envelope<SettingsResponse> = self.get("settings").await?;
        Ok(env.into_inner())
    }
}
