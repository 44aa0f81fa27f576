// ── Directory entries ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::ids::{CategoryId, WebsiteId};

/// Moderation state of an entry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    /// Wire value sent to the backend.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Listing filter. `All` is a sentinel and never the status of an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Approved,
    Rejected,
}

impl StatusFilter {
    /// The concrete status to query for, `None` for `All`.
    pub fn status(self) -> Option<ModerationStatus> {
        match self {
            Self::All => None,
            Self::Pending => Some(ModerationStatus::Pending),
            Self::Approved => Some(ModerationStatus::Approved),
            Self::Rejected => Some(ModerationStatus::Rejected),
        }
    }

    pub fn matches(self, status: ModerationStatus) -> bool {
        self.status().is_none_or(|s| s == status)
    }
}

impl From<ModerationStatus> for StatusFilter {
    fn from(status: ModerationStatus) -> Self {
        match status {
            ModerationStatus::Pending => Self::Pending,
            ModerationStatus::Approved => Self::Approved,
            ModerationStatus::Rejected => Self::Rejected,
        }
    }
}

/// A directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Website {
    pub id: WebsiteId,
    pub title: String,
    pub url: String,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub thumbnail: Option<String>,
    pub status: ModerationStatus,
    pub visits: i64,
    pub likes: i64,
    pub created_at: Option<DateTime<Utc>>,
}

/// A validated submission ready to post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewWebsite {
    pub title: String,
    pub url: String,
    pub description: String,
    pub category_id: CategoryId,
    pub thumbnail: Option<String>,
}

/// Whatever the metadata resolver could learn about a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Listing query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebsiteQuery {
    pub status: StatusFilter,
    pub category: Option<CategoryId>,
    pub search: Option<String>,
}

impl WebsiteQuery {
    pub fn with_status(status: StatusFilter) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(
            "Approved".parse::<ModerationStatus>().unwrap(),
            ModerationStatus::Approved
        );
        assert_eq!(ModerationStatus::Rejected.as_str(), "rejected");
    }

    #[test]
    fn all_filter_matches_everything() {
        assert!(StatusFilter::All.matches(ModerationStatus::Pending));
        assert!(StatusFilter::Approved.matches(ModerationStatus::Approved));
        assert!(!StatusFilter::Approved.matches(ModerationStatus::Rejected));
    }
}
