use crate::service::ShortenerService;
use shorturl_core::{Clock, ShortUrl, SystemClock, UrlStore};
use shorturl_generator::Generator;
use shorturl_proto_schema::v1 as proto;
use shorturl_proto_schema::v1::url_shortener_server::UrlShortener;
use tonic::{Request, Response, Status};
use tracing::instrument;

/// gRPC adapter for [`ShortenerService`].
pub struct UrlShortenerGrpc<S, G, C = SystemClock> {
    service: ShortenerService<S, G, C>,
}

impl<S, G, C> UrlShortenerGrpc<S, G, C> {
    pub fn new(service: ShortenerService<S, G, C>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl<S: UrlStore, G: Generator, C: Clock> UrlShortener for UrlShortenerGrpc<S, G, C> {
    #[instrument(skip_all, fields(longurl = %request.get_ref().longurl))]
    async fn create_short_url(
        &self,
        request: Request<proto::CreateShortUrlRequest>,
    ) -> Result<Response<proto::CreateShortUrlResponse>, Status> {
        let request = request.into_inner();
        let link = self.service.create(&request.longurl).await?;
        Ok(Response::new(link.into()))
    }

    #[instrument(skip_all, fields(shorturl = %request.get_ref().shorturl))]
    async fn get_long_url(
        &self,
        request: Request<proto::GetLongUrlRequest>,
    ) -> Result<Response<proto::GetLongUrlResponse>, Status> {
        let request = request.into_inner();
        let link = self
            .service
            .resolve(&ShortUrl::new(request.shorturl))
            .await?;
        Ok(Response::new(link.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShortenerConfig;
    use jiff::{SignedDuration, Timestamp};
    use shorturl_core::ManualClock;
    use shorturl_generator::DigestGenerator;
    use shorturl_storage::InMemoryStore;
    use tonic::Code;

    const BASE: &str = "https://short.example";

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    type TestServer = UrlShortenerGrpc<InMemoryStore, DigestGenerator, ManualClock>;

    fn server(clock: ManualClock) -> TestServer {
        UrlShortenerGrpc::new(ShortenerService::with_clock(
            InMemoryStore::new(),
            DigestGenerator::new(BASE),
            ShortenerConfig::default(),
            clock,
        ))
    }

    async fn create(
        server: &TestServer,
        longurl: &str,
    ) -> Result<proto::CreateShortUrlResponse, Status> {
        server
            .create_short_url(Request::new(proto::CreateShortUrlRequest {
                longurl: longurl.to_string(),
            }))
            .await
            .map(Response::into_inner)
    }

    async fn get(
        server: &TestServer,
        shorturl: &str,
    ) -> Result<proto::GetLongUrlResponse, Status> {
        server
            .get_long_url(Request::new(proto::GetLongUrlRequest {
                shorturl: shorturl.to_string(),
            }))
            .await
            .map(Response::into_inner)
    }

    #[tokio::test]
    async fn create_then_get_end_to_end() {
        let server = server(ManualClock::new(ts("2024-01-01T00:00:00Z")));

        let created = create(&server, "https://example.com").await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.created_at, "2024-01-01T00:00:00Z");
        assert!(created.shorturl.starts_with("https://short.example/"));

        let got = get(&server, &created.shorturl).await.unwrap();
        assert_eq!(got.longurl, "https://example.com");
        assert_eq!(got.created_at_timestamp().unwrap(), ts("2024-01-01T00:00:00Z"));
        assert_eq!(got.ttl_timestamp().unwrap(), ts("2024-01-03T00:00:00Z"));
    }

    #[tokio::test]
    async fn duplicate_create_is_already_exists() {
        let server = server(ManualClock::new(ts("2024-01-01T00:00:00Z")));

        create(&server, "https://example.com").await.unwrap();
        let status = create(&server, "https://example.com").await.unwrap_err();

        assert_eq!(status.code(), Code::AlreadyExists);
    }

    #[tokio::test]
    async fn unknown_short_url_is_not_found() {
        let server = server(ManualClock::new(ts("2024-01-01T00:00:00Z")));

        let status = get(&server, "https://short.example/missing").await.unwrap_err();

        assert_eq!(status.code(), Code::NotFound);
    }

    #[tokio::test]
    async fn expired_link_is_served_with_past_ttl() {
        let clock = ManualClock::new(ts("2024-01-01T00:00:00Z"));
        let server = server(clock.clone());

        let created = create(&server, "https://example.com").await.unwrap();
        clock.advance(SignedDuration::from_hours(100));
        let got = get(&server, &created.shorturl).await.unwrap();

        assert!(got.ttl_timestamp().unwrap() < clock.now());
        assert_eq!(got.longurl, "https://example.com");
    }
}
