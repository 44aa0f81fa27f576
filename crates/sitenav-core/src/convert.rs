// ── API-to-domain type conversions ──
//
// Bridges raw `sitenav_api` response types into `sitenav_core::model`
// domain types, and domain requests back into wire bodies.

use tracing::warn;

use sitenav_api::types::{
    CategoryResponse, MetadataResponse, SettingsResponse, WebsiteCreate, WebsiteResponse,
};

use crate::model::{
    Category, CategoryId, FeatureSettings, ModerationStatus, NewWebsite, PageMetadata, Website,
    WebsiteId, WebsiteQuery,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Treat empty or whitespace-only strings as absent.
fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

/// Unknown statuses are shown as pending so they stay in the moderation queue.
fn parse_status(raw: &str, id: i64) -> ModerationStatus {
    raw.parse().unwrap_or_else(|_| {
        warn!(website = id, status = raw, "unknown moderation status, treating as pending");
        ModerationStatus::Pending
    })
}

// ── Category ───────────────────────────────────────────────────────

impl From<CategoryResponse> for Category {
    fn from(c: CategoryResponse) -> Self {
        Self {
            id: CategoryId(c.id),
            name: c.name,
        }
    }
}

// ── Website ────────────────────────────────────────────────────────

impl From<WebsiteResponse> for Website {
    fn from(w: WebsiteResponse) -> Self {
        let status = parse_status(&w.status, w.id);
        Self {
            id: WebsiteId(w.id),
            title: w.title,
            url: w.url,
            description: w.description,
            category_id: w.category_id.map(CategoryId),
            thumbnail: non_blank(w.thumbnail),
            status,
            visits: w.visits,
            likes: w.likes,
            created_at: w.created_at,
        }
    }
}

impl From<&NewWebsite> for WebsiteCreate {
    fn from(n: &NewWebsite) -> Self {
        Self {
            title: n.title.clone(),
            url: n.url.clone(),
            description: n.description.clone(),
            category_id: n.category_id.get(),
            thumbnail: n.thumbnail.clone(),
        }
    }
}

impl From<&WebsiteQuery> for sitenav_api::types::WebsiteQuery {
    fn from(q: &WebsiteQuery) -> Self {
        Self {
            status: q.status.status().map(|s| s.as_str().to_owned()),
            category_id: q.category.map(CategoryId::get),
            search: q.search.clone().filter(|s| !s.trim().is_empty()),
        }
    }
}

// ── Metadata & settings ────────────────────────────────────────────

impl From<MetadataResponse> for PageMetadata {
    fn from(m: MetadataResponse) -> Self {
        Self {
            title: non_blank(m.title),
            description: non_blank(m.description),
            image: non_blank(m.image),
        }
    }
}

impl From<SettingsResponse> for FeatureSettings {
    fn from(s: SettingsResponse) -> Self {
        Self {
            allow_submissions: s.allow_submissions.unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StatusFilter;

    fn response(status: &str) -> WebsiteResponse {
        WebsiteResponse {
            id: 5,
            title: "Docs".into(),
            url: "https://docs.rs".into(),
            description: "Crate docs".into(),
            category_id: None,
            thumbnail: Some(String::new()),
            status: status.into(),
            visits: 1,
            likes: 2,
            created_at: None,
        }
    }

    #[test]
    fn unknown_status_becomes_pending() {
        let site = Website::from(response("archived"));
        assert_eq!(site.status, ModerationStatus::Pending);
    }

    #[test]
    fn empty_thumbnail_is_dropped() {
        let site = Website::from(response("approved"));
        assert_eq!(site.status, ModerationStatus::Approved);
        assert!(site.thumbnail.is_none());
    }

    #[test]
    fn all_filter_omits_status_param() {
        let query = WebsiteQuery {
            status: StatusFilter::All,
            category: Some(CategoryId(3)),
            search: Some("  ".into()),
        };
        let wire = sitenav_api::types::WebsiteQuery::from(&query);
        assert!(wire.status.is_none());
        assert_eq!(wire.category_id, Some(3));
        assert!(wire.search.is_none());
    }

    #[test]
    fn missing_allow_submissions_means_allowed() {
        let settings = FeatureSettings::from(SettingsResponse::default());
        assert!(settings.allow_submissions);
    }
}
