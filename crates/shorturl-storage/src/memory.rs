use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use shorturl_core::{NewShortLink, Result, ShortLink, ShortUrl, StorageError, UrlStore};
use std::sync::atomic::{AtomicI64, Ordering};

/// In-memory implementation of [`UrlStore`] using DashMap.
///
/// Ids start at 1 and are only drawn for successful inserts. The entry API
/// holds the shard lock across the check and the insert, so racing saves for
/// the same short URL resolve to one winner and one `Conflict`.
#[derive(Debug)]
pub struct InMemoryStore {
    links: DashMap<String, ShortLink>,
    next_id: AtomicI64,
}

impl InMemoryStore {
    /// Creates a new in-memory store.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new in-memory store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            links: DashMap::with_capacity(capacity),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlStore for InMemoryStore {
    async fn save(&self, link: &NewShortLink) -> Result<i64> {
        match self.links.entry(link.short_url.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(link.short_url.to_string())),
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                slot.insert(link.clone().with_id(id));
                Ok(id)
            }
        }
    }

    async fn lookup(&self, short_url: &ShortUrl) -> Result<ShortLink> {
        self.links
            .get(short_url.as_str())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StorageError::NotFound(short_url.to_string()))
    }
}
