//! Realtime product-list notifier.
//!
//! After every product mutation the full product list is published to all
//! currently connected clients. There is no per-client state beyond the
//! subscription itself: no acknowledgments, no replay for clients that
//! connect later. A late subscriber sees nothing until the next mutation.
//!
//! `close` ends every subscription so long-lived streams let the server
//! shut down.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use jsonshop_core::Product;

/// A published product list, shared between all subscribers.
pub type ProductList = Arc<Vec<Product>>;

/// Publish side of the realtime channel.
///
/// Cheaply cloneable; every clone publishes to the same subscribers.
#[derive(Debug, Clone)]
pub struct ProductNotifier {
    sender: broadcast::Sender<ProductList>,
    closed: Arc<watch::Sender<bool>>,
}

impl ProductNotifier {
    /// Create a notifier buffering up to `capacity` lists per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        let (closed, _) = watch::channel(false);
        Self {
            sender,
            closed: Arc::new(closed),
        }
    }

    /// Push `products` to every connected subscriber.
    ///
    /// Returns the number of subscribers the list was delivered to.
    pub fn broadcast_products(&self, products: &[Product]) -> usize {
        let list: ProductList = Arc::new(products.to_vec());
        match self.sender.send(list) {
            Ok(receivers) => {
                debug!(receivers, products = products.len(), "Broadcast product list");
                receivers
            }
            Err(_) => {
                debug!("No realtime subscribers, product list not broadcast");
                0
            }
        }
    }

    /// Register a new subscriber.
    #[must_use]
    pub fn subscribe(&self) -> ProductSubscription {
        let receiver = self.sender.subscribe();
        info!(
            subscribers = self.sender.receiver_count(),
            "Realtime client connected"
        );
        ProductSubscription {
            receiver,
            closed: self.closed.subscribe(),
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// End every current and future subscription.
    pub fn close(&self) {
        self.closed.send_replace(true);
        info!(
            subscribers = self.sender.receiver_count(),
            "Closing realtime subscriptions"
        );
    }
}

/// Receive side held by one connected client.
///
/// Dropping the subscription is the disconnect.
#[derive(Debug)]
pub struct ProductSubscription {
    receiver: broadcast::Receiver<ProductList>,
    closed: watch::Receiver<bool>,
}

impl ProductSubscription {
    /// Wait for the next product list.
    ///
    /// A subscriber that fell behind skips straight to the newest list.
    /// Returns `None` once the notifier is closed or gone.
    pub async fn next(&mut self) -> Option<ProductList> {
        loop {
            let received = tokio::select! {
                received = self.receiver.recv() => received,
                _ = self.closed.wait_for(|closed| *closed) => return None,
            };

            match received {
                Ok(list) => return Some(list),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Realtime client lagged behind");
                    if let Some(latest) = self.drain_latest() {
                        return Some(latest);
                    }
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    fn drain_latest(&mut self) -> Option<ProductList> {
        let mut latest = None;
        loop {
            match self.receiver.try_recv() {
                Ok(list) => latest = Some(list),
                Err(TryRecvError::Lagged(_)) => {}
                Err(TryRecvError::Empty | TryRecvError::Closed) => return latest,
            }
        }
    }
}

impl Drop for ProductSubscription {
    fn drop(&mut self) {
        info!("Realtime client disconnected");
    }
}
