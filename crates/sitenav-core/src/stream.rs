// ── Store subscriptions ──
//
// A subscriber sees whole snapshots of one collection: the list as it
// stood when it last looked, and each replacement after that.

use std::sync::Arc;

use tokio::sync::watch;

/// Shared, immutable view of one store collection.
pub type Snapshot<T> = Arc<Vec<Arc<T>>>;

/// Subscriber to one collection in the [`AppStore`](crate::store::AppStore).
pub struct Snapshots<T> {
    seen: Snapshot<T>,
    rx: watch::Receiver<Snapshot<T>>,
}

impl<T> Snapshots<T> {
    pub(crate) fn new(mut rx: watch::Receiver<Snapshot<T>>) -> Self {
        let seen = Arc::clone(&rx.borrow_and_update());
        Self { seen, rx }
    }

    /// The snapshot this subscriber last observed.
    pub fn current(&self) -> &Snapshot<T> {
        &self.seen
    }

    /// Wait until the collection is replaced. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Snapshot<T>> {
        self.rx.changed().await.ok()?;
        self.seen = Arc::clone(&self.rx.borrow_and_update());
        Some(Arc::clone(&self.seen))
    }
}
