//! kidvid server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use kidvid_api::{AppState, router as api_router};
use kidvid_common::Config;
use kidvid_core::{
    CommentService, LikedVideoService, NoOpVerifier, UserService, VideoService,
    WatchHistoryService,
};
use kidvid_db::repositories::{
    CommentRepository, LikedVideoRepository, UserRepository, VideoRepository,
    WatchHistoryRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kidvid=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting kidvid server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = kidvid_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    kidvid_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let video_repo = VideoRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let liked_repo = LikedVideoRepository::new(Arc::clone(&db));
    let watch_repo = WatchHistoryRepository::new(Arc::clone(&db));

    // Initialize services
    //
    // Code issuance lives outside this service; without a configured
    // verification backend every code is accepted.
    let verifier = Arc::new(NoOpVerifier);
    let user_service = UserService::new(user_repo.clone(), verifier);
    let video_service = VideoService::new(video_repo.clone());
    let comment_service = CommentService::new(comment_repo, user_repo, video_repo.clone());
    let liked_video_service = LikedVideoService::new(liked_repo, video_repo.clone());
    let watch_history_service = WatchHistoryService::new(watch_repo, video_repo);

    let state = AppState {
        user_service,
        video_service,
        comment_service,
        liked_video_service,
        watch_history_service,
    };

    // Build the router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}
