mod cli;

use crate::cli::{StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use shorturl_core::{SystemClock, UrlStore};
use shorturl_generator::DigestGenerator;
use shorturl_proto_schema::v1::url_shortener_server::UrlShortenerServer;
use shorturl_server::{ShortenerConfig, ShortenerService, UrlShortenerGrpc};
use shorturl_storage::{InMemoryStore, SqliteStore};
use std::net::SocketAddr;
use tokio::signal;
use tonic::transport::Server;
use tonic_reflection::server::v1::{ServerReflection, ServerReflectionServer};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    let _telemetry = shorturl_telemetry::init(config.telemetry_config())
        .context("failed to initialise telemetry")?;

    let listen_addr = config.listen_addr();
    let generator = DigestGenerator::new(config.base_url.as_str());
    info!(
        listen_addr = %listen_addr,
        storage_backend = %config.storage,
        db_path = %config.db_path.display(),
        base_url = generator.base_url(),
        ttl_hours = config.ttl_hours,
        "starting shorturl gRPC server"
    );

    let shortener_config = config.shortener_config();

    match config.storage {
        StorageBackendArg::InMemory => {
            warn!("using in-memory storage; links are lost on shutdown");
            run_server(listen_addr, InMemoryStore::new(), generator, shortener_config).await?;
        }
        StorageBackendArg::Sqlite => {
            let store = SqliteStore::open(&config.db_path).await.with_context(|| {
                format!("failed to open database at {}", config.db_path.display())
            })?;
            let served =
                run_server(listen_addr, store.clone(), generator, shortener_config).await;
            store.close().await;
            served?;
        }
    }

    info!("shorturl gRPC server stopped");
    Ok(())
}

async fn run_server<S: UrlStore>(
    listen_addr: SocketAddr,
    store: S,
    generator: DigestGenerator,
    config: ShortenerConfig,
) -> anyhow::Result<()> {
    let service = ShortenerService::new(store, generator, config);
    let reflection_service =
        reflection_service().context("failed to build gRPC reflection service")?;

    let (health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<UrlShortenerServer<UrlShortenerGrpc<S, DigestGenerator, SystemClock>>>()
        .await;

    info!(listen_addr = %listen_addr, "serving gRPC");
    Server::builder()
        .add_service(health_service)
        .add_service(reflection_service)
        .add_service(UrlShortenerServer::new(UrlShortenerGrpc::new(service)))
        .serve_with_shutdown(listen_addr, shutdown_signal())
        .await?;
    Ok(())
}

/// Server reflection over the compiled `shorturl.v1` descriptors.
fn reflection_service(
) -> Result<ServerReflectionServer<impl ServerReflection>, tonic_reflection::server::Error> {
    tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(shorturl_proto_schema::FILE_DESCRIPTOR_SET)
        .build_v1()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutting down gRPC server");
}
