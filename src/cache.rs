//! Process-lifetime cache for the current headline batch.
//!
//! Holds at most one batch. The first caller runs the acquisition; later
//! callers get the same batch until [`BatchCache::invalidate`] is called.
//! There is no key, no expiry and no eviction.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::models::HeadlineBatch;

#[derive(Debug, Default)]
pub struct BatchCache {
    slot: Mutex<Option<Arc<HeadlineBatch>>>,
}

impl BatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached batch, running `fetch` first if the cache is empty.
    ///
    /// The lock is held across `fetch`, so concurrent callers wait for the
    /// running acquisition instead of starting their own.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Arc<HeadlineBatch>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = HeadlineBatch>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(batch) = slot.as_ref() {
            debug!(headlines = batch.headlines.len(), "Headline cache hit");
            return Arc::clone(batch);
        }
        debug!("Headline cache miss");
        let batch = Arc::new(fetch().await);
        *slot = Some(Arc::clone(&batch));
        batch
    }

    /// The cached batch, if any, without fetching.
    pub async fn current(&self) -> Option<Arc<HeadlineBatch>> {
        self.slot.lock().await.clone()
    }

    /// Drop the cached batch so the next call fetches again.
    pub async fn invalidate(&self) {
        if self.slot.lock().await.take().is_some() {
            debug!("Headline cache invalidated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Headline;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn batch(title: &str) -> HeadlineBatch {
        HeadlineBatch::new(vec![Headline {
            title: title.into(),
            summary: "s".into(),
        }])
    }

    #[tokio::test]
    async fn test_fetch_runs_once_until_invalidated() {
        let cache = BatchCache::new();
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_fetch(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                batch("first")
            })
            .await;
        let second = cache
            .get_or_fetch(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                batch("second")
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.headlines[0].title, "first");

        cache.invalidate().await;
        assert!(cache.current().await.is_none());

        let third = cache.get_or_fetch(|| async { batch("third") }).await;
        assert_eq!(third.headlines[0].title, "third");
        assert!(Arc::ptr_eq(&third, &cache.current().await.unwrap()));
    }

    #[tokio::test]
    async fn test_empty_batch_is_cached_too() {
        let cache = BatchCache::new();
        cache
            .get_or_fetch(|| async { HeadlineBatch::failed("down") })
            .await;
        let again = cache.get_or_fetch(|| async { batch("fresh") }).await;
        assert!(again.is_empty());
        assert_eq!(again.warning.as_deref(), Some("down"));
    }
}
