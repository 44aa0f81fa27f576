// ── Listing / moderation card ──
//
// One entry plus the bounded set of things a user may do with it. The
// card never writes the listing: visits and status changes go to the
// container through `CardDelegate`; likes are fire-and-forget and only
// move the card's own displayed counter.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::backend::DirectoryBackend;
use crate::like_store::LikeStore;
use crate::model::{Category, ModerationStatus, Role, StatusFilter, Website, WebsiteId};
use crate::notify::Toast;

/// Container callbacks for card actions that affect shared state.
pub trait CardDelegate {
    /// The user opened the entry's URL.
    fn on_visit(&self, website: &Website);

    /// An admin asked to move the entry to `status`.
    fn on_status_update(&self, id: WebsiteId, status: ModerationStatus);
}

// ── Status presentation ──────────────────────────────────────────────

/// Visual class of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Warning,
    Success,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: &'static str,
    /// `None` renders unstyled.
    pub tone: Option<StatusTone>,
}

/// Label and tone for a status. Total over the filter values; `All`
/// yields an empty, unstyled badge.
pub fn status_badge(status: impl Into<StatusFilter>) -> StatusBadge {
    match status.into() {
        StatusFilter::Pending => StatusBadge {
            label: "Pending",
            tone: Some(StatusTone::Warning),
        },
        StatusFilter::Approved => StatusBadge {
            label: "Approved",
            tone: Some(StatusTone::Success),
        },
        StatusFilter::Rejected => StatusBadge {
            label: "Rejected",
            tone: Some(StatusTone::Danger),
        },
        StatusFilter::All => StatusBadge {
            label: "",
            tone: None,
        },
    }
}

// ── Like outcome ─────────────────────────────────────────────────────

#[derive(Debug)]
pub enum LikeOutcome {
    /// The guard was already set. No request was made.
    AlreadyLiked { toast: Toast },
    /// A like request was fired and the displayed count bumped.
    ///
    /// `request` completes when the detached call finishes; its outcome
    /// is never inspected. Short-lived callers may await it before exit.
    Liked { likes: i64, request: JoinHandle<()> },
}

// ── Card ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct WebsiteCard {
    website: Arc<Website>,
    likes: i64,
    role: Role,
}

impl WebsiteCard {
    pub fn new(website: Arc<Website>, role: Role) -> Self {
        let likes = website.likes;
        Self {
            website,
            likes,
            role,
        }
    }

    pub fn website(&self) -> &Arc<Website> {
        &self.website
    }

    pub fn id(&self) -> WebsiteId {
        self.website.id
    }

    /// Like count as displayed, including local optimistic bumps.
    pub fn likes(&self) -> i64 {
        self.likes
    }

    pub fn visits(&self) -> i64 {
        self.website.visits
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Swap in a refreshed entry, keeping a higher local like count.
    pub fn refresh(&mut self, website: Arc<Website>) {
        self.likes = self.likes.max(website.likes);
        self.website = website;
    }

    pub fn badge(&self) -> StatusBadge {
        status_badge(self.website.status)
    }

    pub fn category_label(&self, categories: &[Arc<Category>]) -> String {
        Category::name_for(categories.iter().map(|c| &**c), self.website.category_id)
    }

    // ── Actions ──────────────────────────────────────────────────────

    pub fn visit(&self, delegate: &dyn CardDelegate) {
        delegate.on_visit(&self.website);
    }

    /// Like the entry once per client.
    ///
    /// Checks the guard before any network call. When clear, spawns the
    /// like request without awaiting it, sets the guard, and bumps the
    /// displayed count whatever the request's fate.
    pub fn like<B: DirectoryBackend>(
        &mut self,
        likes: &dyn LikeStore,
        backend: Arc<B>,
    ) -> LikeOutcome {
        let id = self.website.id;
        if likes.is_liked(id) {
            return LikeOutcome::AlreadyLiked {
                toast: Toast::info(
                    "Already liked",
                    "You have already liked this site. Come back another time!",
                ),
            };
        }

        let request = tokio::spawn(async move {
            if let Err(e) = backend.like_website(id).await {
                debug!(%id, error = %e, "like request failed (ignored)");
            }
        });

        if let Err(e) = likes.mark_liked(id) {
            warn!(%id, error = %e, "could not persist like flag");
        }
        self.likes += 1;

        LikeOutcome::Liked {
            likes: self.likes,
            request,
        }
    }

    /// Status transitions offered to the current role, in display order.
    pub fn available_transitions(&self) -> Vec<ModerationStatus> {
        if !self.role.is_admin() {
            return Vec::new();
        }
        [ModerationStatus::Approved, ModerationStatus::Rejected]
            .into_iter()
            .filter(|target| *target != self.website.status)
            .collect()
    }

    /// Ask the container to move the entry to `target`.
    ///
    /// Returns `false` (and does nothing) when the transition is not
    /// offered. No local state changes either way.
    pub fn request_status(&self, target: ModerationStatus, delegate: &dyn CardDelegate) -> bool {
        if !self.available_transitions().contains(&target) {
            return false;
        }
        delegate.on_status_update(self.website.id, target);
        true
    }
}
