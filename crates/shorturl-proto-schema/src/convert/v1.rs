use crate::shorturl::v1::{CreateShortUrlResponse, GetLongUrlResponse};
use jiff::Timestamp;
use shorturl_core::time::format_rfc3339;
use shorturl_core::ShortLink;
use thiserror::Error;

const NANOS_PER_SECOND: i32 = 1_000_000_000;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("timestamp field is missing: {0}")]
    MissingTimestamp(&'static str),
    #[error("timestamp is out of range: {0}")]
    TimestampOutOfRange(String),
}

/// Converts to the protobuf well-known timestamp, keeping `nanos`
/// non-negative as the protobuf encoding requires.
pub fn to_proto_timestamp(ts: Timestamp) -> prost_types::Timestamp {
    let mut seconds = ts.as_second();
    let mut nanos = ts.subsec_nanosecond();
    if nanos < 0 {
        seconds -= 1;
        nanos += NANOS_PER_SECOND;
    }
    prost_types::Timestamp { seconds, nanos }
}

pub fn from_proto_timestamp(ts: &prost_types::Timestamp) -> Result<Timestamp, ConversionError> {
    Timestamp::new(ts.seconds, ts.nanos).map_err(|e| {
        ConversionError::TimestampOutOfRange(format!("{}s {}ns: {e}", ts.seconds, ts.nanos))
    })
}

impl From<ShortLink> for CreateShortUrlResponse {
    fn from(link: ShortLink) -> Self {
        Self {
            id: link.id,
            shorturl: link.short_url.into_string(),
            created_at: format_rfc3339(link.created_at),
        }
    }
}

impl From<ShortLink> for GetLongUrlResponse {
    fn from(link: ShortLink) -> Self {
        Self {
            longurl: link.long_url,
            created_at: Some(to_proto_timestamp(link.created_at)),
            ttl: Some(to_proto_timestamp(link.expires_at)),
        }
    }
}

impl GetLongUrlResponse {
    /// Creation time as a [`Timestamp`].
    pub fn created_at_timestamp(&self) -> Result<Timestamp, ConversionError> {
        let ts = self
            .created_at
            .as_ref()
            .ok_or(ConversionError::MissingTimestamp("created_at"))?;
        from_proto_timestamp(ts)
    }

    /// Advisory expiry as a [`Timestamp`].
    pub fn ttl_timestamp(&self) -> Result<Timestamp, ConversionError> {
        let ts = self
            .ttl
            .as_ref()
            .ok_or(ConversionError::MissingTimestamp("ttl"))?;
        from_proto_timestamp(ts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shorturl_core::ShortUrl;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn link() -> ShortLink {
        ShortLink {
            id: 42,
            short_url: ShortUrl::new("https://short.example/47DEQpj8HBSa-_TImW-5JA"),
            long_url: "https://example.com".to_string(),
            created_at: ts("2024-01-01T00:00:00Z"),
            expires_at: ts("2024-01-03T00:00:00Z"),
        }
    }

    #[test]
    fn create_response_carries_rfc3339_created_at() {
        let response = CreateShortUrlResponse::from(link());

        assert_eq!(response.id, 42);
        assert_eq!(
            response.shorturl,
            "https://short.example/47DEQpj8HBSa-_TImW-5JA"
        );
        assert_eq!(response.created_at, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn get_response_carries_proto_timestamps() {
        let response = GetLongUrlResponse::from(link());

        assert_eq!(response.longurl, "https://example.com");
        assert_eq!(
            response.created_at,
            Some(prost_types::Timestamp {
                seconds: 1_704_067_200,
                nanos: 0
            })
        );
        assert_eq!(response.created_at_timestamp().unwrap(), ts("2024-01-01T00:00:00Z"));
        assert_eq!(response.ttl_timestamp().unwrap(), ts("2024-01-03T00:00:00Z"));
    }

    #[test]
    fn missing_timestamp_is_reported() {
        let response = GetLongUrlResponse {
            longurl: "https://example.com".to_string(),
            created_at: None,
            ttl: None,
        };

        assert!(matches!(
            response.ttl_timestamp(),
            Err(ConversionError::MissingTimestamp("ttl"))
        ));
    }

    #[test]
    fn negative_fraction_is_normalized() {
        let before_epoch = ts("1969-12-31T23:59:59.5Z");
        let proto = to_proto_timestamp(before_epoch);

        assert_eq!(proto.seconds, -1);
        assert_eq!(proto.nanos, 500_000_000);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let proto = prost_types::Timestamp {
            seconds: i64::MAX,
            nanos: 0,
        };
        assert!(matches!(
            from_proto_timestamp(&proto),
            Err(ConversionError::TimestampOutOfRange(_))
        ));
    }
}
