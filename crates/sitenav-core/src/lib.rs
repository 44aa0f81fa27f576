// sitenav-core: Client-side logic between sitenav-api and the front-ends (CLI/TUI).
//
// Submission flow, listing cards with the like-once guard, moderation
// transitions and the shared application store.

pub mod backend;
pub mod card;
pub mod categories;
pub mod config;
pub mod convert;
pub mod directory;
pub mod error;
pub mod form;
pub mod guard;
pub mod like_store;
pub mod model;
pub mod notify;
pub mod store;
pub mod stream;
pub mod submit;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::DirectoryBackend;
pub use card::{CardDelegate, LikeOutcome, StatusBadge, StatusTone, WebsiteCard, status_badge};
pub use categories::{CategoryLoader, LoadState};
pub use config::{DirectoryConfig, TlsVerification};
pub use directory::Directory;
pub use error::CoreError;
pub use form::{FieldError, FormField, WebsiteDraft};
pub use guard::{InFlight, InFlightGuard};
pub use like_store::{FileLikeStore, LikeStore, MemoryLikeStore, like_key};
pub use notify::{Toast, ToastVariant};
pub use store::AppStore;
pub use stream::{Snapshot, Snapshots};
pub use submit::{AutofillOutcome, Route, SubmissionFlow, SubmitOutcome};

// Model types at the crate root for ergonomics.
pub use model::{
    Category, CategoryId, FeatureSettings, ModerationStatus, NewWebsite, PageMetadata, Role,
    StatusFilter, UNCATEGORIZED, Website, WebsiteId, WebsiteQuery,
};
