use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use model::error::ApiError;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;
use tracing::debug;

type PendingValue<V> = Shared<BoxFuture<'static, Result<V, ApiError>>>;
type Producer<K, V> = Arc<dyn Fn(K) -> BoxFuture<'static, Result<V, ApiError>> + Send + Sync>;

enum Entry<V> {
    Ready(V),
    Pending(PendingValue<V>),
}

/// Memoizing async key-value cache.
///
/// The first `get` for a key starts the producer exactly once; concurrent
/// callers for the same key attach to the in-progress computation and all
/// observe its outcome. A resolved value is kept for the lifetime of the
/// cache. A failed computation evicts the entry, so a later `get` retries
/// (transient network failures stay recoverable).
pub struct MemoCache<K, V> {
    entries: Arc<Mutex<HashMap<K, Entry<V>>>>,
    produce: Producer<K, V>,
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new<F>(produce: F) -> Self
    where
        F: Fn(K) -> BoxFuture<'static, Result<V, ApiError>> + Send + Sync + 'static,
    {
        MemoCache {
            entries: Arc::new(Mutex::new(HashMap::new())),
            produce: Arc::new(produce),
        }
    }

    pub async fn get(&self, key: K) -> Result<V, ApiError> {
        let pending = {
            let mut entries = Self::lock(&self.entries);
            match entries.get(&key) {
                Some(Entry::Ready(value)) => return Ok(value.clone()),
                Some(Entry::Pending(pending)) => pending.clone(),
                None => {
                    let pending = self.start(key.clone());
                    entries.insert(key, Entry::Pending(pending.clone()));
                    pending
                }
            }
        };
        pending.await
    }

    /// Number of resolved and in-progress entries.
    pub fn len(&self) -> usize {
        Self::lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs the producer as a task so the computation completes even if
    /// every waiter is dropped, and settles the entry before any waiter
    /// observes the result.
    fn start(&self, key: K) -> PendingValue<V> {
        let fut = (self.produce)(key.clone());
        let entries = self.entries.clone();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let result = fut.await;
            {
                let mut map = Self::lock(&entries);
                match &result {
                    Ok(value) => {
                        map.insert(key, Entry::Ready(value.clone()));
                    }
                    Err(err) => {
                        debug!(%err, "producer failed, evicting entry");
                        map.remove(&key);
                    }
                }
            }
            let _ = tx.send(result);
        });
        async move {
            match rx.await {
                Ok(result) => result,
                Err(_) => Err(ApiError::Aborted),
            }
        }
        .boxed()
        .shared()
    }

    fn lock(entries: &Mutex<HashMap<K, Entry<V>>>) -> MutexGuard<'_, HashMap<K, Entry<V>>> {
        entries.lock().expect("memo cache lock poisoned")
    }
}
