//! Data bridge: forwards [`AppStore`](sitenav_core::AppStore) changes to TUI actions.
//!
//! Runs as a background task. Sends the current snapshots first so screens
//! have something to draw, resolves feature settings and categories, then
//! relays every store change until cancelled.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use sitenav_core::Directory;

use crate::action::Action;

pub async fn spawn_data_bridge(
    directory: Directory,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let store = directory.store();
    let mut websites = store.subscribe_websites();
    let mut categories = store.subscribe_categories();
    let mut settings = store.subscribe_settings();

    let _ = action_tx.send(Action::WebsitesUpdated(websites.current().clone()));
    let _ = action_tx.send(Action::CategoriesUpdated(categories.current().clone()));
    let _ = action_tx.send(Action::SettingsUpdated(*settings.borrow_and_update()));

    directory.load_settings().await;
    if let Err(e) = directory.load_categories().await {
        warn!(error = %e, "initial category load failed");
        let _ = action_tx.send(Action::Notify(e.toast()));
    }

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(snapshot) = websites.changed() => {
                let _ = action_tx.send(Action::WebsitesUpdated(snapshot));
            }
            Some(snapshot) = categories.changed() => {
                let _ = action_tx.send(Action::CategoriesUpdated(snapshot));
            }
            Ok(()) = settings.changed() => {
                let current = *settings.borrow_and_update();
                let _ = action_tx.send(Action::SettingsUpdated(current));
            }
        }
    }

    debug!("data bridge shut down");
}
