//! URL shortener service implementation.
//!
//! [`ShortenerService`] composes a [`Generator`](shorturl_generator::Generator)
//! with a [`UrlStore`](shorturl_core::UrlStore); [`grpc::UrlShortenerGrpc`]
//! exposes it as the `shorturl.v1.URLShortener` gRPC service.

pub mod config;
pub mod error;
pub mod grpc;
pub mod service;

pub use config::{DuplicatePolicy, ShortenerConfig, DEFAULT_LINK_TTL};
pub use error::ServiceError;
pub use grpc::UrlShortenerGrpc;
pub use service::ShortenerService;
