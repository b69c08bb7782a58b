pub mod digest;

pub use digest::{encode_token, generate, DigestGenerator, TOKEN_LEN};

use shorturl_core::ShortUrl;

/// Trait for deriving short URLs from long URLs.
///
/// Implementations are pure generators that don't interact with storage.
/// Uniqueness across repeated submissions is not guaranteed; the store's
/// uniqueness constraint is the only arbiter.
pub trait Generator: Send + Sync + 'static {
    /// Derives the short URL for `long_url`.
    fn generate(&self, long_url: &str) -> ShortUrl;
}
