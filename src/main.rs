//! Overlay Hub Back binary entrypoint wiring REST routes, sessions and the record store.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use futures::future::{BoxFuture, FutureExt};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use overlay_hub_back::{
    build_router,
    config::{AppConfig, StorageConfig, StoreBackend},
    dao::{
        faceit::FaceitClient,
        record_store::{RecordStore, memory::MemoryRecordStore},
        storage::StorageError,
    },
    services::{session_service, storage_supervisor},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let faceit = FaceitClient::new(config.faceit_client_config())
        .context("building FACEIT client")?;
    if !faceit.is_configured() {
        info!("FACEIT_API_KEY not set; FACEIT routes will answer 500");
    }

    let port = config.server.port;
    let connect = store_connector(config.storage.clone());
    let app_state = AppState::new(config, faceit);

    tokio::spawn(storage_supervisor::run(app_state.clone(), connect));
    tokio::spawn(session_service::run_session_gc(app_state.clone()));

    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

type Connect = BoxFuture<'static, Result<Arc<dyn RecordStore>, StorageError>>;

/// Factory handed to the storage supervisor for the configured backend.
fn store_connector(storage: StorageConfig) -> impl FnMut() -> Connect + Send + 'static {
    let memory: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());

    move || -> Connect {
        match storage.backend {
            StoreBackend::Memory => {
                let store = memory.clone();
                async move { Ok(store) }.boxed()
            }
            StoreBackend::Mongo => connect_mongo(&storage),
        }
    }
}

#[cfg(feature = "mongo-store")]
fn connect_mongo(storage: &StorageConfig) -> Connect {
    use overlay_hub_back::dao::record_store::mongodb::{MongoConfig, MongoRecordStore};

    let uri = storage
        .mongo_uri
        .clone()
        .unwrap_or_else(|| "mongodb://localhost:27017".into());
    let db_name = storage.mongo_db.clone();

    async move {
        let config = MongoConfig::from_uri(&uri, db_name.as_deref()).await?;
        let store = MongoRecordStore::connect(config).await?;
        Ok::<_, StorageError>(Arc::new(store) as Arc<dyn RecordStore>)
    }
    .boxed()
}

#[cfg(not(feature = "mongo-store"))]
fn connect_mongo(_storage: &StorageConfig) -> Connect {
    async {
        Err(StorageError::unavailable(
            "mongo backend not compiled in".into(),
            std::io::Error::other("build with the `mongo-store` feature"),
        ))
    }
    .boxed()
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
