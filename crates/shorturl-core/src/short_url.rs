use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The externally visible short URL, `"{base_url}/{token}"`.
///
/// This is the key a [`UrlStore`](crate::UrlStore) indexes links by. It is
/// produced by a generator and echoed back verbatim by clients on lookup, so
/// no validation is applied when wrapping a client-supplied string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortUrl(String);

impl ShortUrl {
    /// Wraps a short URL string.
    pub fn new(short_url: impl Into<String>) -> Self {
        Self(short_url.into())
    }

    /// Joins a base URL and an encoded token into a short URL.
    ///
    /// A trailing `/` on `base_url` is not doubled.
    pub fn from_parts(base_url: &str, token: &str) -> Self {
        Self(format!("{}/{}", base_url.trim_end_matches('/'), token))
    }

    /// Returns the short URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for ShortUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ShortUrl {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ShortUrl {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_joins_with_single_slash() {
        let url = ShortUrl::from_parts("https://short.example", "abc123");
        assert_eq!(url.as_str(), "https://short.example/abc123");

        let url = ShortUrl::from_parts("https://short.example/", "abc123");
        assert_eq!(url.as_str(), "https://short.example/abc123");
    }

    #[test]
    fn display_is_verbatim() {
        let url = ShortUrl::new("https://short.example/abc");
        assert_eq!(url.to_string(), "https://short.example/abc");
    }

    #[test]
    fn serializes_as_plain_string() {
        let url = ShortUrl::new("https://short.example/abc");
        let json = serde_json::to_string(&url).unwrap();
        assert_eq!(json, "\"https://short.example/abc\"");

        let back: ShortUrl = serde_json::from_str(&json).unwrap();
        assert_eq!(back, url);
    }
}
