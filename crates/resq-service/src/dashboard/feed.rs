//! Typed live query results.

use std::marker::PhantomData;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use resq_core::error::AppError;
use resq_core::result::AppResult;
use resq_core::traits::Subscription;
use resq_core::types::query::Query;
use resq_store::LiveView;

/// A subscription decoded into entities, kept current by merging every
/// snapshot into a [`LiveView`].
#[derive(Debug)]
pub struct LiveFeed<T> {
    view: LiveView,
    subscription: Subscription,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> LiveFeed<T> {
    /// Wrap a subscription and wait for its initial snapshot.
    pub async fn open(query: Query, mut subscription: Subscription) -> AppResult<Self> {
        let mut view = LiveView::new(query);
        let initial = subscription
            .next()
            .await
            .ok_or_else(|| AppError::external("Subscription closed before first snapshot"))?;
        view.apply_snapshot(&initial);
        Ok(Self {
            view,
            subscription,
            _marker: PhantomData,
        })
    }

    /// The current result set in query order.
    pub fn items(&self) -> AppResult<Vec<T>> {
        self.view.decode()
    }

    /// Wait for the result set to change.
    ///
    /// Returns `None` once the subscription is cancelled.
    pub async fn changed(&mut self) -> Option<AppResult<Vec<T>>> {
        loop {
            let snapshot = self.subscription.next().await?;
            if self.view.apply_snapshot(&snapshot) {
                return Some(self.view.decode());
            }
        }
    }

    /// Wait until the result set satisfies `predicate`, up to `limit`.
    pub async fn wait_for<F>(&mut self, limit: Duration, predicate: F) -> AppResult<Vec<T>>
    where
        F: Fn(&[T]) -> bool,
    {
        let current = self.items()?;
        if predicate(&current) {
            return Ok(current);
        }
        let wait = async {
            while let Some(items) = self.changed().await {
                let items = items?;
                if predicate(&items) {
                    return Ok(items);
                }
            }
            Err(AppError::external("Subscription closed"))
        };
        tokio::time::timeout(limit, wait)
            .await
            .map_err(|_| AppError::external("Timed out waiting for live update"))?
    }

    /// Number of items in view.
    pub fn len(&self) -> usize {
        self.view.len()
    }

    /// Whether the view is empty.
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// Token that stops this feed, for tying it to a session.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.subscription.cancellation_token()
    }

    /// Stop receiving updates.
    pub fn cancel(&self) {
        self.subscription.cancel();
    }
}
