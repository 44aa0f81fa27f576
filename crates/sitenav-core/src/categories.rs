// ── Category loader ──
//
// Sole writer of the category collection. Loads once per session when the
// collection is empty; concurrent triggers while a load runs are dropped.

use tracing::{debug, info, warn};

use crate::backend::DirectoryBackend;
use crate::error::CoreError;
use crate::guard::InFlight;
use crate::store::AppStore;

/// What `ensure_loaded` actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Categories were already present; no request made.
    Cached,
    /// Another load is running; no request made.
    InFlight,
    /// Fetched this many categories.
    Loaded(usize),
}

#[derive(Debug, Default)]
pub struct CategoryLoader {
    flight: InFlight,
}

impl CategoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.flight.is_active()
    }

    /// Load categories into the store if it has none yet.
    ///
    /// On failure the collection stays empty and the error is
    /// [`CoreError::CategoriesUnavailable`], so a later call retries.
    pub async fn ensure_loaded<B: DirectoryBackend>(
        &self,
        backend: &B,
        store: &AppStore,
    ) -> Result<LoadState, CoreError> {
        if store.has_categories() {
            return Ok(LoadState::Cached);
        }
        let Some(_guard) = self.flight.try_acquire() else {
            debug!("category load already in flight");
            return Ok(LoadState::InFlight);
        };

        match backend.list_categories().await {
            Ok(categories) => {
                let count = categories.len();
                store.set_categories(categories);
                info!(count, "loaded categories");
                Ok(LoadState::Loaded(count))
            }
            Err(e) => {
                warn!(error = %e, "failed to load categories");
                Err(CoreError::CategoriesUnavailable {
                    reason: e.to_string(),
                })
            }
        }
    }
}
