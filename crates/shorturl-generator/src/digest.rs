use crate::Generator;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};
use shorturl_core::ShortUrl;

/// Digest width in bytes (128 bits).
const DIGEST_LEN: usize = 16;

/// Length of an encoded token: 16 bytes in unpadded base64.
pub const TOKEN_LEN: usize = 22;

/// Content-addressed generator.
///
/// The token is a 128-bit digest of the long URL, so the same long URL always
/// maps to the same short URL.
#[derive(Debug, Clone)]
pub struct DigestGenerator {
    base_url: String,
}

impl DigestGenerator {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Generator for DigestGenerator {
    fn generate(&self, long_url: &str) -> ShortUrl {
        generate(&self.base_url, long_url)
    }
}

/// Encodes the first 128 bits of the SHA-256 digest of `long_url` with the
/// URL-safe base64 alphabet, without padding.
pub fn encode_token(long_url: &str) -> String {
    let digest = Sha256::digest(long_url.as_bytes());
    URL_SAFE_NO_PAD.encode(&digest[..DIGEST_LEN])
}

/// Returns `"{base_url}/{token}"` for `long_url`.
pub fn generate(base_url: &str, long_url: &str) -> ShortUrl {
    ShortUrl::from_parts(base_url, &encode_token(long_url))
}
