//! Offset/limit page cursor over a [`ContentSink`].
//!
//! The dedup scanner needs every existing destination item, and the
//! destination only serves bounded pages. This cursor produces a lazy,
//! finite, non-restartable sequence of pages: callers pull with
//! [`ItemPages::next_page`] until `None`, which arrives after the first
//! short page (fewer items than requested).

use crate::error::SyncError;
use crate::traits::ContentSink;
use crate::types::ItemPage;

/// Lazy page sequence over a sink's existing items.
pub struct ItemPages<'a, S: ContentSink + ?Sized> {
    sink: &'a S,
    limit: usize,
    offset: usize,
    done: bool,
}

impl<'a, S: ContentSink + ?Sized> ItemPages<'a, S> {
    pub fn new(sink: &'a S, limit: usize) -> Self {
        ItemPages {
            sink,
            limit,
            offset: 0,
            done: false,
        }
    }

    /// Fetch the next page, or `None` once the sequence is exhausted.
    ///
    /// A transport failure ends the sequence: an incomplete scan must not be
    /// mistaken for a complete one, so there is no way to resume after an
    /// error page.
    pub async fn next_page(&mut self) -> Option<Result<ItemPage, SyncError>> {
        if self.done {
            return None;
        }

        match self.sink.list_items(self.offset, self.limit).await {
            Ok(page) => {
                self.offset += page.items.len();
                if page.is_short(self.limit) {
                    self.done = true;
                }
                Some(Ok(page))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
