// ── Domain model ──
//
// Canonical shapes of directory entities as the front-ends see them.
// Wire types from sitenav-api are converted into these in `convert`.

pub mod category;
pub mod ids;
pub mod settings;
pub mod website;

// ── Re-exports ──────────────────────────────────────────────────────

pub use category::{Category, UNCATEGORIZED};
pub use ids::{CategoryId, WebsiteId};
pub use settings::{FeatureSettings, Role};
pub use website::{
    ModerationStatus, NewWebsite, PageMetadata, StatusFilter, Website, WebsiteQuery,
};
