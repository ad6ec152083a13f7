use crate::error::StreamError;
use crate::lazy::LazyStream;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use model::page::Page;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;
use tracing::debug;

type SharedFetch = Shared<BoxFuture<'static, Result<usize, StreamError>>>;

struct CacheState<T> {
    buf: Vec<T>,
    exhausted: bool,
    in_flight: Option<SharedFetch>,
}

struct Inner<T> {
    state: Mutex<CacheState<T>>,
    stream: LazyStream<T>,
}

/// Caching decorator over a [`LazyStream`].
///
/// All elements ever fetched are kept in a shared append-only buffer.
/// Independent [`StreamReader`] cursors serve reads from that buffer;
/// shortfalls trigger one shared source fetch at a time, which concurrent
/// readers join instead of duplicating. Once a fetch returns fewer
/// elements than requested the source is considered exhausted and is never
/// contacted again.
pub struct CachedStream<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for CachedStream<T> {
    fn clone(&self) -> Self {
        CachedStream {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> CachedStream<T> {
    pub fn new(stream: LazyStream<T>) -> Self {
        Self::build(stream, Vec::new(), false)
    }

    /// A cache seeded with already-known elements; the source continues
    /// after them.
    pub fn with_initial(stream: LazyStream<T>, items: Vec<T>) -> Self {
        Self::build(stream, items, false)
    }

    /// A fully-materialized cache with no backing source.
    pub fn from_items(items: Vec<T>) -> Self {
        Self::build(LazyStream::empty(), items, true)
    }

    fn build(stream: LazyStream<T>, buf: Vec<T>, exhausted: bool) -> Self {
        CachedStream {
            inner: Arc::new(Inner {
                state: Mutex::new(CacheState {
                    buf,
                    exhausted,
                    in_flight: None,
                }),
                stream,
            }),
        }
    }

    /// An independent cursor starting at offset 0 over the shared buffer.
    pub fn reader(&self) -> StreamReader<T> {
        StreamReader {
            inner: self.inner.clone(),
            offset: 0,
        }
    }

    pub fn cached_len(&self) -> usize {
        self.inner.lock().buf.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.inner.lock().exhausted
    }
}

/// One cursor over a [`CachedStream`]'s shared buffer.
///
/// Readers never affect each other's position; they share only the cached
/// elements and the exhaustion flag.
pub struct StreamReader<T> {
    inner: Arc<Inner<T>>,
    offset: u64,
}

impl<T: Clone + Send + 'static> StreamReader<T> {
    /// Current position of this cursor.
    pub fn position(&self) -> u64 {
        self.offset
    }

    /// Fetches up to `count` elements at this reader's position.
    ///
    /// Returns an empty page once the source is exhausted and the buffer
    /// holds nothing at or past this position. A fetch failure leaves both
    /// the cursor and the cache untouched.
    pub async fn fetch_next(&mut self, count: NonZeroUsize) -> Result<Page<T>, StreamError> {
        let offset = self.offset;
        let items = self.inner.range(offset, count.get()).await?;
        self.offset += items.len() as u64;
        Ok(Page { offset, items })
    }
}

impl<T: Clone + Send + 'static> Inner<T> {
    fn lock(&self) -> MutexGuard<'_, CacheState<T>> {
        // The state mutex is only ever held for short, await-free sections.
        self.state.lock().expect("cache state lock poisoned")
    }

    async fn range(self: &Arc<Self>, offset: u64, count: usize) -> Result<Vec<T>, StreamError> {
        loop {
            let fetch = {
                let mut state = self.lock();
                let have = Self::available(&state.buf, offset, count);
                if have == count || state.exhausted {
                    // Cache-resident path: never touches the source.
                    return Ok(Self::slice(&state.buf, offset, count));
                }
                match &state.in_flight {
                    // Join the running fetch rather than starting a second one.
                    Some(fetch) => fetch.clone(),
                    None => {
                        let shortfall = count - have;
                        let fetch = self.start_fetch(shortfall);
                        state.in_flight = Some(fetch.clone());
                        fetch
                    }
                }
            };

            // Every waiter observes the same outcome of the shared fetch.
            fetch.await?;
            // Re-slice from the original offset; another pass may start a
            // further fetch if this reader's range is still not covered.
        }
    }

    /// Spawns the actual source fetch as a task so it runs to completion
    /// even if every waiter is dropped, and exposes it as a shared future.
    fn start_fetch(self: &Arc<Self>, count: usize) -> SharedFetch {
        let inner = self.clone();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let result = inner.fetch_append(count).await;
            // Clear the marker only after the buffer mutation is visible.
            inner.lock().in_flight = None;
            let _ = tx.send(result);
        });
        async move {
            match rx.await {
                Ok(result) => result,
                Err(_) => Err(StreamError::Aborted),
            }
        }
        .boxed()
        .shared()
    }

    async fn fetch_append(&self, count: usize) -> Result<usize, StreamError> {
        let count = NonZeroUsize::new(count).unwrap_or(NonZeroUsize::MIN);
        let page = self.stream.fetch_next(count).await?;
        let fetched = page.len();
        let mut state = self.lock();
        if fetched < count.get() {
            debug!(fetched, requested = count.get(), "source exhausted");
            state.exhausted = true;
        }
        state.buf.extend(page.items);
        Ok(fetched)
    }

    fn available(buf: &[T], offset: u64, count: usize) -> usize {
        buf.len().saturating_sub(offset as usize).min(count)
    }

    fn slice(buf: &[T], offset: u64, count: usize) -> Vec<T> {
        let start = (offset as usize).min(buf.len());
        let end = (start + count).min(buf.len());
        buf[start..end].to_vec()
    }
}
