use crate::error::StreamError;
use async_trait::async_trait;
use model::page::Page;
use std::num::NonZeroUsize;
use tokio::sync::Mutex;
use tracing::error;

/// A remote ordered collection readable in ranges.
///
/// Implementations fetch `count` elements starting at `offset` and may
/// return fewer when the collection ends. `prepare` runs at most once,
/// before the first fetch, for sources that must resolve a remote handle
/// first.
#[async_trait]
pub trait RangeSource<T>: Send {
    async fn prepare(&mut self) -> Result<(), StreamError> {
        Ok(())
    }

    async fn fetch_range(&mut self, offset: u64, count: usize) -> Result<Vec<T>, StreamError>;
}

/// A source that is always exhausted.
pub struct EmptySource;

#[async_trait]
impl<T: Send + 'static> RangeSource<T> for EmptySource {
    async fn fetch_range(&mut self, _offset: u64, _count: usize) -> Result<Vec<T>, StreamError> {
        Ok(Vec::new())
    }
}

struct StreamState<T> {
    source: Box<dyn RangeSource<T>>,
    offset: u64,
    prepared: bool,
}

/// Lazy single-cursor view over a [`RangeSource`].
///
/// Each `fetch_next` continues where the previous one left off. At most one
/// read may be in flight per instance: an overlapping call is a caller bug
/// and fails fast with [`StreamError::ReadInProgress`] instead of queueing.
pub struct LazyStream<T> {
    state: Mutex<StreamState<T>>,
}

impl<T: Send + 'static> LazyStream<T> {
    pub fn new(source: impl RangeSource<T> + 'static) -> Self {
        Self::from_boxed(Box::new(source))
    }

    pub fn from_boxed(source: Box<dyn RangeSource<T>>) -> Self {
        LazyStream {
            state: Mutex::new(StreamState {
                source,
                offset: 0,
                prepared: false,
            }),
        }
    }

    /// A stream over a source with no elements.
    pub fn empty() -> Self {
        Self::new(EmptySource)
    }

    /// Fetches the next `count` elements.
    ///
    /// An empty page means the source is exhausted. On failure the cursor
    /// is left where it was, so the same read can be retried.
    pub async fn fetch_next(&self, count: NonZeroUsize) -> Result<Page<T>, StreamError> {
        // try_lock instead of lock: a second concurrent caller must fail,
        // not wait its turn.
        let mut state = self.state.try_lock().map_err(|_| {
            error!("fetch_next called while a previous read is still in flight");
            StreamError::ReadInProgress
        })?;

        if !state.prepared {
            // Marked before running so preparation is attempted once only.
            state.prepared = true;
            state.source.prepare().await?;
        }

        let offset = state.offset;
        let items = state.source.fetch_range(offset, count.get()).await?;
        state.offset += items.len() as u64;
        Ok(Page { offset, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counting {
        total: usize,
    }

    #[async_trait]
    impl RangeSource<u64> for Counting {
        async fn fetch_range(&mut self, offset: u64, count: usize) -> Result<Vec<u64>, StreamError> {
            let end = (offset as usize + count).min(self.total);
            Ok(((offset as usize)..end).map(|v| v as u64).collect())
        }
    }

    #[tokio::test]
    async fn cursor_advances_between_fetches() {
        let stream = LazyStream::new(Counting { total: 7 });
        let count = NonZeroUsize::new(3).unwrap();

        let first = stream.fetch_next(count).await.unwrap();
        assert_eq!(first.items, vec![0, 1, 2]);
        assert_eq!(first.offset, 0);

        let second = stream.fetch_next(count).await.unwrap();
        assert_eq!(second.items, vec![3, 4, 5]);
        assert_eq!(second.offset, 3);

        let tail = stream.fetch_next(count).await.unwrap();
        assert_eq!(tail.items, vec![6]);

        let done = stream.fetch_next(count).await.unwrap();
        assert!(done.is_empty());
    }

    #[tokio::test]
    async fn empty_stream_returns_empty_pages() {
        let stream: LazyStream<u64> = LazyStream::empty();
        let page = stream.fetch_next(NonZeroUsize::new(10).unwrap()).await.unwrap();
        assert!(page.is_empty());
    }
}
