//! Fedigram server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use apalis::prelude::*;
use axum::{Router, middleware};
use fedigram_api::{AppState, api_router, auth_middleware, web_router};
use fedigram_common::{
    Config, CounterCache, IdGenerator, LocalStorage, RedisCounterCache, StorageBackend,
    open_backend,
};
use fedigram_core::{
    MediaService, MediaStorageService, ModLogService, ProfileService, RegistrationService,
    StatusService, UserFilterService, UserService,
};
use fedigram_db::repositories::{
    FollowerRepository, InstanceRepository, MediaRepository, MediaTagRepository, ModLogRepository,
    NotificationRepository, ProfileRepository, ReportRepository, StatusRepository,
    UserFilterRepository, UserRepository,
};
use fedigram_federation::{FederationState, UrlConfig, router as federation_router};
use fedigram_queue::{
    MEDIA_STORAGE_QUEUE, MediaStorageContext, MediaStorageJob, RedisMediaStorageQueue,
    media_storage_worker,
};
use fred::prelude::*;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fedigram=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting fedigram server...");

    let config = Config::load()?;
    let urls = UrlConfig::new(&config.server.url)?;
    let id_gen = IdGenerator::new(config.server.worker_id);

    // Database
    let db = fedigram_db::connect(&config.database).await?;
    let applied = fedigram_db::migrate(&db).await?;
    info!(applied, "Database migrations up to date");
    let db = Arc::new(db);

    // Job queue
    info!("Connecting to Redis...");
    let redis_client = redis::Client::open(config.redis.url.as_str())?;
    let redis_conn = redis::aio::ConnectionManager::new(redis_client).await?;
    let media_jobs = apalis_redis::RedisStorage::<MediaStorageJob>::new(redis_conn);
    info!("Connected to Redis job queue");

    // Counter cache
    let fred_config = fred::types::config::Config::from_url(&config.redis.url)?;
    let fred_client = fred::clients::Client::new(fred_config, None, None, None);
    fred_client.connect();
    fred_client.wait_for_connect().await?;
    let counter_cache: Arc<dyn CounterCache> = Arc::new(RedisCounterCache::new(
        Arc::new(fred_client),
        config.redis.prefix.clone(),
    ));
    info!("Connected to Redis counter cache");

    // Storage
    let local_storage: Arc<dyn StorageBackend> = Arc::new(LocalStorage::new(
        config.media.local_path.clone(),
        urls.url(&config.media.local_url_path),
    ));
    let cloud_storage = config.media.cloud.as_ref().map(open_backend).transpose()?;
    if config.media.cloud_storage && cloud_storage.is_none() {
        warn!("Cloud storage is enabled but no [media.cloud] backend is configured");
    }

    // Repositories
    let user_repo = UserRepository::new(Arc::clone(&db));
    let profile_repo = ProfileRepository::new(Arc::clone(&db));
    let follower_repo = FollowerRepository::new(Arc::clone(&db));
    let user_filter_repo = UserFilterRepository::new(Arc::clone(&db));
    let instance_repo = InstanceRepository::new(Arc::clone(&db));
    let report_repo = ReportRepository::new(Arc::clone(&db));
    let status_repo = StatusRepository::new(Arc::clone(&db));
    let media_repo = MediaRepository::new(Arc::clone(&db));
    let media_tag_repo = MediaTagRepository::new(Arc::clone(&db));
    let mod_log_repo = ModLogRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));

    // Services
    let state = AppState {
        user_service: UserService::new(user_repo.clone(), profile_repo.clone()),
        registration_service: RegistrationService::new(
            user_repo.clone(),
            profile_repo.clone(),
            &config.registration,
            id_gen.clone(),
        ),
        profile_service: ProfileService::new(
            profile_repo.clone(),
            user_repo.clone(),
            follower_repo.clone(),
            user_filter_repo.clone(),
            report_repo,
            counter_cache,
            urls.clone(),
        ),
        user_filter_service: UserFilterService::new(
            user_filter_repo,
            profile_repo.clone(),
            instance_repo,
            id_gen.clone(),
            urls.clone(),
        ),
        media_service: MediaService::new(
            media_repo.clone(),
            Arc::clone(&local_storage),
            Arc::new(RedisMediaStorageQueue::new(media_jobs.clone())),
            id_gen.clone(),
            &config.media,
            urls.clone(),
        ),
        status_service: StatusService::new(status_repo, media_tag_repo),
        mod_log_service: ModLogService::new(
            mod_log_repo,
            notification_repo,
            user_repo,
            profile_repo.clone(),
            id_gen,
        ),
        instance_name: config.federation.instance_name.clone(),
    };

    let mut app = Router::new()
        .merge(web_router())
        .nest("/api", api_router(config.media.max_upload_size))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
        .nest_service(
            &config.media.local_url_path,
            ServeDir::new(&config.media.local_path),
        );

    if config.federation.enabled {
        app = app.merge(federation_router(FederationState::new(
            profile_repo,
            follower_repo,
            urls,
        )));
        info!("Federation routes enabled");
    }

    let app = app.layer(TraceLayer::new_for_http()).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    );

    // Media storage worker
    let storage_ctx = MediaStorageContext::new(MediaStorageService::new(
        media_repo,
        local_storage,
        cloud_storage,
        &config.media,
    ));
    tokio::spawn(async move {
        let monitor = Monitor::new().register({
            WorkerBuilder::new(MEDIA_STORAGE_QUEUE)
                .data(storage_ctx)
                .backend(media_jobs)
                .build_fn(media_storage_worker)
        });
        if let Err(e) = monitor.run().await {
            error!(error = %e, "Media storage worker failed");
        }
    });
    info!("Media storage worker started");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
