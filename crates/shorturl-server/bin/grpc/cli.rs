use clap::{Parser, ValueEnum};
use jiff::SignedDuration;
use shorturl_server::{DuplicatePolicy, ShortenerConfig};
use shorturl_telemetry::{LogFormat, TelemetryConfig};
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const GRPC_HOST_ENV: &str = "SHORTURL_GRPC_HOST";
pub const GRPC_PORT_ENV: &str = "SHORTURL_GRPC_PORT";
pub const DB_PATH_ENV: &str = "SHORTURL_DB_PATH";
pub const STORAGE_BACKEND_ENV: &str = "SHORTURL_STORAGE_BACKEND";
pub const BASE_URL_ENV: &str = "SHORTURL_BASE_URL";
pub const TTL_HOURS_ENV: &str = "SHORTURL_TTL_HOURS";
pub const ON_DUPLICATE_ENV: &str = "SHORTURL_ON_DUPLICATE";
pub const LOG_FORMAT_ENV: &str = "SHORTURL_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "SHORTURL_OTLP_ENDPOINT";

pub const DEFAULT_GRPC_HOST: &str = "0.0.0.0";
pub const DEFAULT_GRPC_PORT: u16 = 8080;
pub const DEFAULT_DB_PATH: &str = "shorturl.db";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TTL_HOURS: u32 = 48;

pub const SERVICE_NAME: &str = "shorturl-server";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "sqlite")]
    Sqlite,
    #[value(name = "in-memory")]
    InMemory,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::Sqlite => write!(f, "sqlite"),
            StorageBackendArg::InMemory => write!(f, "in-memory"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DuplicatePolicyArg {
    #[value(name = "reject")]
    Reject,
    #[value(name = "reuse-existing")]
    ReuseExisting,
}

impl From<DuplicatePolicyArg> for DuplicatePolicy {
    fn from(value: DuplicatePolicyArg) -> Self {
        match value {
            DuplicatePolicyArg::Reject => DuplicatePolicy::Reject,
            DuplicatePolicyArg::ReuseExisting => DuplicatePolicy::ReuseExisting,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "shorturl-server", version, about = "gRPC URL shortener")]
pub struct CLI {
    /// Address to bind the gRPC listener to
    #[arg(long, env = GRPC_HOST_ENV, default_value = DEFAULT_GRPC_HOST)]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short = 'p', long, env = GRPC_PORT_ENV, default_value_t = DEFAULT_GRPC_PORT)]
    pub port: u16,

    /// Path to database file
    #[arg(short = 'd', long, env = DB_PATH_ENV, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Sqlite
    )]
    pub storage: StorageBackendArg,

    /// Prefix of every generated short URL
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Hours until a new link's advisory expiry
    #[arg(
        long,
        env = TTL_HOURS_ENV,
        default_value_t = DEFAULT_TTL_HOURS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub ttl_hours: u32,

    /// What to do when the same long URL is shortened twice
    #[arg(
        long,
        env = ON_DUPLICATE_ENV,
        value_enum,
        default_value_t = DuplicatePolicyArg::Reject
    )]
    pub on_duplicate: DuplicatePolicyArg,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,

    /// OTLP/gRPC collector endpoint; spans are not exported when unset
    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}

impl CLI {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn shortener_config(&self) -> ShortenerConfig {
        ShortenerConfig::builder()
            .link_ttl(SignedDuration::from_hours(i64::from(self.ttl_hours)))
            .on_duplicate(self.on_duplicate.into())
            .build()
    }

    pub fn telemetry_config(&self) -> TelemetryConfig {
        TelemetryConfig::builder()
            .service_name(SERVICE_NAME)
            .format(self.log_format.into())
            .otlp_endpoint(self.otlp_endpoint.clone())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        CLI::command().debug_assert();
    }

    #[test]
    fn defaults_match_original_flags() {
        let cli = CLI::try_parse_from(["shorturl-server"]).unwrap();

        assert_eq!(cli.port, 8080);
        assert_eq!(cli.db_path, PathBuf::from("shorturl.db"));
        assert_eq!(cli.storage, StorageBackendArg::Sqlite);
        assert_eq!(cli.listen_addr(), "0.0.0.0:8080".parse().unwrap());

        let config = cli.shortener_config();
        assert_eq!(config.link_ttl, SignedDuration::from_hours(48));
        assert_eq!(config.on_duplicate, DuplicatePolicy::Reject);
    }

    #[test]
    fn short_flags() {
        let cli =
            CLI::try_parse_from(["shorturl-server", "-p", "9090", "-d", "/tmp/links.db"]).unwrap();

        assert_eq!(cli.port, 9090);
        assert_eq!(cli.db_path, PathBuf::from("/tmp/links.db"));
    }

    #[test]
    fn long_flags() {
        let cli = CLI::try_parse_from([
            "shorturl-server",
            "--host",
            "127.0.0.1",
            "--storage",
            "in-memory",
            "--ttl-hours",
            "1",
            "--on-duplicate",
            "reuse-existing",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.listen_addr(), "127.0.0.1:8080".parse().unwrap());
        assert_eq!(cli.storage, StorageBackendArg::InMemory);
        assert_eq!(cli.shortener_config().link_ttl, SignedDuration::from_hours(1));
        assert_eq!(
            cli.shortener_config().on_duplicate,
            DuplicatePolicy::ReuseExisting
        );
        assert_eq!(cli.telemetry_config().format, LogFormat::Json);
    }

    #[test]
    fn telemetry_config_from_flags() {
        let cli = CLI::try_parse_from([
            "shorturl-server",
            "--otlp-endpoint",
            "http://collector:4317",
        ])
        .unwrap();

        let config = cli.telemetry_config();
        assert_eq!(config.service_name, SERVICE_NAME);
        assert_eq!(config.format, LogFormat::Text);
        assert_eq!(config.default_filter, shorturl_telemetry::DEFAULT_FILTER);
        assert_eq!(config.otlp_endpoint.as_deref(), Some("http://collector:4317"));

        let cli = CLI::try_parse_from(["shorturl-server"]).unwrap();
        assert!(cli.telemetry_config().otlp_endpoint.is_none());
    }

    #[test]
    fn zero_ttl_is_rejected() {
        assert!(CLI::try_parse_from(["shorturl-server", "--ttl-hours", "0"]).is_err());
    }
}
