use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, mpsc};
use tracing::debug;

/// A balance-affecting change observed for one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceChange {
    pub address: String,
    /// Fully-qualified token id; empty for the native token.
    pub token_id: String,
}

/// Handle returned by [`ObserverRegistry::subscribe`]; pass it back to
/// `unsubscribe` to stop receiving notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    id: u64,
}

/// Explicit observer registration for balance changes.
///
/// Observers receive change events over their own channel; a closed
/// receiver drops its subscription on the next notify.
#[derive(Clone, Default)]
pub struct ObserverRegistry {
    subscribers: Arc<RwLock<HashMap<u64, mpsc::Sender<BalanceChange>>>>,
    next_id: Arc<AtomicU64>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(&self, sender: mpsc::Sender<BalanceChange>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.write().await.insert(id, sender);
        debug!(subscriber_id = id, "balance observer subscribed");
        Subscription { id }
    }

    pub async fn unsubscribe(&self, subscription: Subscription) {
        if self
            .subscribers
            .write()
            .await
            .remove(&subscription.id)
            .is_some()
        {
            debug!(subscriber_id = subscription.id, "balance observer unsubscribed");
        }
    }

    pub async fn notify(&self, change: BalanceChange) {
        let mut closed = Vec::new();
        {
            let subscribers = self.subscribers.read().await;
            for (id, sender) in subscribers.iter() {
                if sender.send(change.clone()).await.is_err() {
                    closed.push(*id);
                }
            }
        }
        if !closed.is_empty() {
            let mut subscribers = self.subscribers.write().await;
            for id in closed {
                subscribers.remove(&id);
                debug!(subscriber_id = id, "dropped closed balance observer");
            }
        }
    }

    pub async fn observer_count(&self) -> usize {
        self.subscribers.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_changes_until_unsubscribed() {
        let registry = ObserverRegistry::new();
        let (tx, mut rx) = mpsc::channel(4);
        let sub = registry.subscribe(tx).await;

        let change = BalanceChange {
            address: "SP000".into(),
            token_id: String::new(),
        };
        registry.notify(change.clone()).await;
        assert_eq!(rx.recv().await.unwrap(), change);

        registry.unsubscribe(sub).await;
        registry.notify(change).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn closed_receivers_are_pruned() {
        let registry = ObserverRegistry::new();
        let (tx, rx) = mpsc::channel(1);
        registry.subscribe(tx).await;
        drop(rx);

        registry
            .notify(BalanceChange {
                address: "SP000".into(),
                token_id: String::new(),
            })
            .await;
        assert_eq!(registry.observer_count().await, 0);
    }
}
