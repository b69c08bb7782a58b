use crate::error::Result;
use crate::short_url::ShortUrl;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A link that has not been persisted yet.
///
/// Both timestamps are chosen by the caller; stores persist them unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShortLink {
    pub short_url: ShortUrl,
    pub long_url: String,
    pub created_at: Timestamp,
    /// Advisory expiry. Stores keep serving the link after this instant.
    pub expires_at: Timestamp,
}

impl NewShortLink {
    /// Attaches the store-assigned id.
    pub fn with_id(self, id: i64) -> ShortLink {
        ShortLink {
            id,
            short_url: self.short_url,
            long_url: self.long_url,
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}

/// A persisted shortening mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortLink {
    /// Surrogate key assigned by the store. Never reused.
    pub id: i64,
    pub short_url: ShortUrl,
    pub long_url: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

impl ShortLink {
    /// Whether `expires_at` lies at or before `now`.
    ///
    /// Informational only: nothing in the read path filters on it.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }
}

/// Durable mapping from short URL to link record.
#[async_trait]
pub trait UrlStore: Send + Sync + 'static {
    /// Persists a new link and returns its id.
    ///
    /// Returns `Err(Conflict)` if the short URL is already taken. Of two
    /// concurrent saves for the same short URL exactly one succeeds.
    async fn save(&self, link: &NewShortLink) -> Result<i64>;

    /// Fetches the link stored under `short_url`.
    ///
    /// Returns `Err(NotFound)` on a miss. Expired links are still returned.
    async fn lookup(&self, short_url: &ShortUrl) -> Result<ShortLink>;
}
