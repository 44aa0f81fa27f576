// ── Like guard storage ──
//
// Per-client record of which entries were already liked. Keys have the
// form `website-{id}-liked`. The file-backed store writes through on
// every change so the flag survives restarts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::WebsiteId;

/// Storage key for an entry's like flag.
pub fn like_key(id: WebsiteId) -> String {
    format!("website-{id}-liked")
}

/// Durable per-client like flags.
pub trait LikeStore: Send + Sync {
    fn is_liked(&self, id: WebsiteId) -> bool;

    /// Set the flag. Once set it is never cleared.
    fn mark_liked(&self, id: WebsiteId) -> Result<(), CoreError>;
}

/// Lock the flags, reading through poison.
fn lock_flags(flags: &Mutex<BTreeMap<String, bool>>) -> MutexGuard<'_, BTreeMap<String, bool>> {
    flags.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── File-backed store ────────────────────────────────────────────────

/// JSON object of `{ "website-{id}-liked": true }` entries on disk.
#[derive(Debug)]
pub struct FileLikeStore {
    path: PathBuf,
    flags: Mutex<BTreeMap<String, bool>>,
}

impl FileLikeStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file starts empty. A corrupt file is logged and treated
    /// as empty; it is overwritten on the next like.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let flags = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "like store is corrupt, starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(CoreError::Storage {
                    message: format!("failed to read {}: {e}", path.display()),
                });
            }
        };
        debug!(path = %path.display(), entries = flags.len(), "opened like store");

        Ok(Self {
            path,
            flags: Mutex::new(flags),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, flags: &BTreeMap<String, bool>) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::Storage {
                message: format!("failed to create {}: {e}", parent.display()),
            })?;
        }
        let json = serde_json::to_string_pretty(flags).map_err(|e| CoreError::Storage {
            message: e.to_string(),
        })?;
        std::fs::write(&self.path, json).map_err(|e| CoreError::Storage {
            message: format!("failed to write {}: {e}", self.path.display()),
        })
    }
}

impl LikeStore for FileLikeStore {
    fn is_liked(&self, id: WebsiteId) -> bool {
        lock_flags(&self.flags)
            .get(&like_key(id))
            .copied()
            .unwrap_or(false)
    }

    fn mark_liked(&self, id: WebsiteId) -> Result<(), CoreError> {
        let mut flags = lock_flags(&self.flags);
        flags.insert(like_key(id), true);
        self.persist(&flags)
    }
}

// ── In-memory store ──────────────────────────────────────────────────

/// Session-only like flags.
#[derive(Debug, Default)]
pub struct MemoryLikeStore {
    flags: Mutex<BTreeMap<String, bool>>,
}

impl MemoryLikeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LikeStore for MemoryLikeStore {
    fn is_liked(&self, id: WebsiteId) -> bool {
        lock_flags(&self.flags).contains_key(&like_key(id))
    }

    fn mark_liked(&self, id: WebsiteId) -> Result<(), CoreError> {
        lock_flags(&self.flags).insert(like_key(id), true);
        Ok(())
    }
}
