//! Core types and traits for the shorturl service.
//!
//! This crate provides the types shared by the identifier generator, the
//! storage backends and the gRPC server: the [`ShortUrl`] key, the
//! [`ShortLink`] record, the [`UrlStore`] contract and the [`Clock`] used to
//! stamp new links.

pub mod clock;
pub mod error;
pub mod link;
pub mod short_url;
pub mod time;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, StorageError};
pub use link::{NewShortLink, ShortLink, UrlStore};
pub use short_url::ShortUrl;
