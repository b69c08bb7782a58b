//! Storage backends for short links.
//!
//! [`InMemoryStore`] keeps links in a concurrent map and is meant for tests
//! and throwaway runs. [`SqliteStore`] persists links in a single SQLite
//! table and is the production backend.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryStore;
pub use shorturl_core::{NewShortLink, Result, ShortLink, ShortUrl, StorageError, UrlStore};
pub use sqlite::{SqliteOptions, SqliteStore};
