// Wire types for the directory backend.
//
// Field names follow the backend's JSON. Responses may arrive wrapped in a
// `{ "data": ... }` envelope or bare; `Envelope` accepts both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Envelope ─────────────────────────────────────────────────────────

/// A response that is either `{ "data": T }` or `T` itself.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

// ── Categories ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
}

// ── Websites ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebsiteResponse {
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_id")]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub status: String,
    #[serde(default)]
    pub visits: i64,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST api/websites`.
#[derive(Debug, Clone, Serialize)]
pub struct WebsiteCreate {
    pub title: String,
    pub url: String,
    pub description: String,
    pub category_id: i64,
    pub thumbnail: Option<String>,
}

/// Body of `PATCH api/websites/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Query parameters for `GET api/websites`.
#[derive(Debug, Clone, Default)]
pub struct WebsiteQuery {
    pub status: Option<String>,
    pub category_id: Option<i64>,
    pub search: Option<String>,
}

impl WebsiteQuery {
    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(ref status) = self.status {
            params.push(("status", status.clone()));
        }
        if let Some(id) = self.category_id {
            params.push(("category_id", id.to_string()));
        }
        if let Some(ref search) = self.search {
            if !search.is_empty() {
                params.push(("search", search.clone()));
            }
        }
        params
    }
}

// ── Metadata ─────────────────────────────────────────────────────────

/// Result of the metadata resolver. Any field may be absent.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct MetadataResponse {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

// ── Settings ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    #[serde(default)]
    pub allow_submissions: Option<bool>,
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Category ids come back as numbers, numeric strings, or null.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Int(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}
