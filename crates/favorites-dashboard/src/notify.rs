//! Cross-widget favorite change notifications.
//!
//! Every widget instance on a page shares one [`NotificationBus`]. A widget
//! that changes membership optimistically publishes a [`FavoriteChanged`];
//! every subscriber applies it if the identity matches its own viewer.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Default capacity for the notification channel.
const DEFAULT_BUS_CAPACITY: usize = 64;

/// A membership change made by one widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteChanged {
    /// Entity whose membership changed.
    pub entity_id: String,
    /// New membership.
    #[serde(rename = "isFavorite")]
    pub is_favorite: bool,
    /// Viewer who made the change, if known.
    #[serde(default)]
    pub user_id: Option<String>,
}

impl FavoriteChanged {
    /// Whether a widget viewed by `viewer` should apply this change.
    ///
    /// Only a conflict between two known identities rejects the change.
    pub fn applies_to(&self, viewer: Option<&str>) -> bool {
        match (self.user_id.as_deref(), viewer) {
            (Some(author), Some(viewer)) => author == viewer,
            _ => true,
        }
    }
}

/// Page-scoped publish/subscribe channel for [`FavoriteChanged`].
#[derive(Debug, Clone)]
pub struct NotificationBus {
    tx: broadcast::Sender<FavoriteChanged>,
}

impl NotificationBus {
    /// Bus with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUS_CAPACITY)
    }

    /// Bus buffering up to `capacity` undelivered changes per subscriber.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes a change, returning the number of subscribers reached.
    pub fn publish(&self, change: FavoriteChanged) -> usize {
        match self.tx.send(change) {
            Ok(count) => {
                tracing::trace!("favorite change sent to {} subscribers", count);
                count
            }
            Err(_) => {
                tracing::debug!("no subscribers for favorite change");
                0
            }
        }
    }

    /// New subscription receiving every change published from now on.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving end of a [`NotificationBus`]. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    rx: broadcast::Receiver<FavoriteChanged>,
}

impl Subscription {
    /// Next change, or `None` once the bus is gone.
    ///
    /// Lagging past the channel capacity skips the lost changes; the next
    /// host snapshot resynchronizes the list anyway.
    pub async fn recv(&mut self) -> Option<FavoriteChanged> {
        loop {
            match self.rx.recv().await {
                Ok(change) => return Some(change),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("notification subscriber lagged, skipped {} changes", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next already-delivered change, without waiting.
    pub fn try_recv(&mut self) -> Option<FavoriteChanged> {
        loop {
            match self.rx.try_recv() {
                Ok(change) => return Some(change),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("notification subscriber lagged, skipped {} changes", skipped);
                }
                Err(_) => return None,
            }
        }
    }
}
