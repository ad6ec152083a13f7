/// One batch of elements returned by a single range fetch.
///
/// An empty page signals exhaustion of the remote collection; a failed
/// fetch is reported as an error, never as an empty page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Offset of the first element within the remote collection.
    pub offset: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn empty(offset: u64) -> Self {
        Page {
            offset,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
