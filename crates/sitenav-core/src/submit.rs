// ── Submission flow ──
//
// Auto-fill and submit for the website form. Each operation sits behind
// its own in-flight flag; activating one while it is already running is a
// no-op, and auto-fill is refused while a submit is in flight.

use tracing::{debug, info, warn};

use crate::backend::DirectoryBackend;
use crate::error::{CoreError, SUBMIT_FALLBACK_MESSAGE};
use crate::form::WebsiteDraft;
use crate::guard::InFlight;
use crate::model::{ModerationStatus, PageMetadata, Website};
use crate::notify::Toast;
use crate::store::AppStore;

/// Where the front-end navigates after a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Public listing.
    Home,
    /// Admin moderation queue.
    ModerationQueue,
}

/// Result of a successful submit.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// The created entry, when the backend echoed it back.
    pub website: Option<Website>,
    /// Status the entry lands in for the submitting role.
    pub status: ModerationStatus,
    pub route: Route,
    pub toast: Toast,
}

/// Result of a successful auto-fill.
#[derive(Debug, Clone)]
pub struct AutofillOutcome {
    pub metadata: PageMetadata,
    pub toast: Toast,
}

#[derive(Debug, Default)]
pub struct SubmissionFlow {
    submitting: InFlight,
    fetching: InFlight,
}

impl SubmissionFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_active()
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching.is_active()
    }

    /// Whether an auto-fill may start for this draft right now.
    pub fn autofill_available(&self, draft: &WebsiteDraft) -> bool {
        draft.can_autofill() && !self.is_submitting() && !self.is_fetching()
    }

    /// Fetch page metadata for the draft's URL.
    ///
    /// `Ok(None)` means nothing was started: the URL has no web scheme,
    /// a fetch is already running, or a submit is in flight. The caller
    /// merges the returned metadata with [`WebsiteDraft::apply_metadata`].
    pub async fn autofill<B: DirectoryBackend>(
        &self,
        backend: &B,
        draft: &WebsiteDraft,
    ) -> Result<Option<AutofillOutcome>, CoreError> {
        if !draft.can_autofill() || self.is_submitting() {
            return Ok(None);
        }
        let Some(_guard) = self.fetching.try_acquire() else {
            debug!("auto-fill already in flight, ignoring");
            return Ok(None);
        };

        let url = draft.url.trim();
        match backend.fetch_metadata(url).await {
            Ok(metadata) => {
                debug!(url, ?metadata, "fetched page metadata");
                Ok(Some(AutofillOutcome {
                    metadata,
                    toast: Toast::info("Fetched", "Website details filled in automatically"),
                }))
            }
            Err(e) => {
                warn!(url, error = %e, "metadata fetch failed");
                Err(CoreError::MetadataUnavailable {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Validate and post the draft.
    ///
    /// `Ok(None)` means a submit was already in flight and this call did
    /// nothing. Every `Err` is a local failure the form recovers from.
    pub async fn submit<B: DirectoryBackend>(
        &self,
        backend: &B,
        store: &AppStore,
        draft: &WebsiteDraft,
    ) -> Result<Option<SubmitOutcome>, CoreError> {
        if draft.category_id.is_none() {
            return Err(CoreError::CategoryRequired);
        }

        let Some(_guard) = self.submitting.try_acquire() else {
            debug!("submit already in flight, ignoring");
            return Ok(None);
        };

        let role = store.role();
        if !role.is_admin() && !store.settings().allow_submissions {
            return Err(CoreError::SubmissionsDisabled);
        }

        let new_site = draft.validate(&store.categories_snapshot())?;

        let website = backend
            .create_website(&new_site)
            .await
            .map_err(submission_failure)?;
        match &website {
            Some(created) => {
                info!(id = %created.id, url = %created.url, %role, "website submitted");
            }
            None => info!(url = %new_site.url, %role, "website submitted, no entry echoed"),
        }

        let (route, description) = if role.is_admin() {
            (
                Route::ModerationQueue,
                "The website was added to the approved list.",
            )
        } else {
            (Route::Home, "Your website has been submitted for review.")
        };

        Ok(Some(SubmitOutcome {
            website,
            status: role.initial_status(),
            route,
            toast: Toast::info("Submitted!", description),
        }))
    }
}

/// Backend rejections surface their body verbatim, or a fixed fallback.
fn submission_failure(err: CoreError) -> CoreError {
    match err {
        CoreError::Api { message, .. }
        | CoreError::NotFound {
            identifier: message,
        }
        | CoreError::AuthenticationFailed { message } => CoreError::SubmissionFailed {
            message: if message.trim().is_empty() {
                SUBMIT_FALLBACK_MESSAGE.to_owned()
            } else {
                message
            },
        },
        other => other,
    }
}
