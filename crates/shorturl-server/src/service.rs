use crate::config::{DuplicatePolicy, ShortenerConfig};
use crate::error::{Result, ServiceError};
use shorturl_core::time::truncate_to_second;
use shorturl_core::{
    Clock, NewShortLink, ShortLink, ShortUrl, StorageError, SystemClock, UrlStore,
};
use shorturl_generator::Generator;
use tracing::{debug, error, info};

/// Creates and resolves short links.
///
/// Wraps a [`UrlStore`] and a [`Generator`]. Store errors are logged and
/// returned unchanged; nothing is retried.
#[derive(Debug)]
pub struct ShortenerService<S, G, C = SystemClock> {
    store: S,
    generator: G,
    clock: C,
    config: ShortenerConfig,
}

impl<S: UrlStore, G: Generator> ShortenerService<S, G, SystemClock> {
    pub fn new(store: S, generator: G, config: ShortenerConfig) -> Self {
        Self::with_clock(store, generator, config, SystemClock)
    }
}

impl<S: UrlStore, G: Generator, C: Clock> ShortenerService<S, G, C> {
    /// Creates a service that stamps links with `clock` instead of the
    /// system time.
    pub fn with_clock(store: S, generator: G, config: ShortenerConfig, clock: C) -> Self {
        Self {
            store,
            generator,
            clock,
            config,
        }
    }

    /// Shortens `long_url` and persists the link.
    ///
    /// The short URL depends only on `long_url`, so shortening the same URL
    /// twice collides in the store. With [`DuplicatePolicy::Reject`] that
    /// surfaces as `Conflict`.
    pub async fn create(&self, long_url: &str) -> Result<ShortLink> {
        let created_at = truncate_to_second(self.clock.now());
        let expires_at = created_at
            .checked_add(self.config.link_ttl)
            .map_err(|e| ServiceError::InvalidTimestamp(e.to_string()))?;

        let link = NewShortLink {
            short_url: self.generator.generate(long_url),
            long_url: long_url.to_owned(),
            created_at,
            expires_at,
        };

        match self.store.save(&link).await {
            Ok(id) => {
                info!(
                    id,
                    short_url = %link.short_url,
                    long_url = %link.long_url,
                    created_at = %link.created_at,
                    "created short url"
                );
                Ok(link.with_id(id))
            }
            Err(StorageError::Conflict(_))
                if self.config.on_duplicate == DuplicatePolicy::ReuseExisting =>
            {
                self.reuse_existing(link).await
            }
            Err(e) => {
                error!(error = %e, short_url = %link.short_url, "failed to save short url");
                Err(e.into())
            }
        }
    }

    async fn reuse_existing(&self, link: NewShortLink) -> Result<ShortLink> {
        let existing = self.store.lookup(&link.short_url).await.map_err(|e| {
            error!(error = %e, short_url = %link.short_url, "failed to load existing short url");
            ServiceError::from(e)
        })?;

        if existing.long_url != link.long_url {
            // digest collision between two different long URLs
            error!(
                short_url = %link.short_url,
                long_url = %link.long_url,
                existing_long_url = %existing.long_url,
                "short url taken by a different long url"
            );
            return Err(StorageError::Conflict(link.short_url.to_string()).into());
        }

        info!(id = existing.id, short_url = %existing.short_url, "reused existing short url");
        Ok(existing)
    }

    /// Looks up the link stored under `short_url`.
    ///
    /// Expiry is not enforced: expired links resolve like any other.
    pub async fn resolve(&self, short_url: &ShortUrl) -> Result<ShortLink> {
        match self.store.lookup(short_url).await {
            Ok(link) => {
                debug!(
                    short_url = %short_url,
                    long_url = %link.long_url,
                    expired = link.is_expired_at(self.clock.now()),
                    "resolved short url"
                );
                Ok(link)
            }
            Err(e) => {
                error!(error = %e, short_url = %short_url, "failed to retrieve long url");
                Err(e.into())
            }
        }
    }
}
