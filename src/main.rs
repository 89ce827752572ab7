//! Agriserve - Agricultural Services Platform
//!
//! Main entry point for the web application.

use agriserve::{
    classifier::Classifier,
    issue_service::IssueService,
    notice_service::NoticeService,
    recycle_service::RecycledItemService,
    state::{AppConfig, AppState},
    upload_store::UploadStore,
    user_service::UserService,
    web_api,
};
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agriserve=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting agriserve v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::default();
    tracing::info!(
        database_url = %config.database_url,
        upload_dir = %config.upload_dir.display(),
        recycle_upload_dir = %config.recycle_upload_dir.display(),
        model_path = %config.model_path.display(),
        class_names_path = %config.class_names_path.display(),
        "Configuration loaded"
    );

    // Create database pool
    let pool = MySqlPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&config.database_url)
        .await?;

    tracing::info!("Database connected");

    // Load the classifier once; classification requests reuse the handle
    let classifier = match Classifier::load(
        &config.model_path,
        &config.class_names_path,
        config.classifier_cuda,
    ) {
        Ok(c) => Some(Arc::new(c)),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Classifier not loaded; /classify will fail until MODEL_PATH \
                and CLASS_NAMES_PATH point at readable files"
            );
            None
        }
    };

    // Initialize components
    let uploads = Arc::new(
        UploadStore::new(
            config.upload_dir.clone(),
            config.recycle_upload_dir.clone(),
        )
        .await?,
    );
    tracing::info!("UploadStore initialized");

    let users = UserService::new(pool.clone());
    let notices = NoticeService::new(pool.clone());
    let issues = IssueService::new(pool.clone());
    let recycled = RecycledItemService::new(pool.clone());
    tracing::info!("Services initialized (UserService, NoticeService, IssueService, RecycledItemService)");

    // Create application state
    let state = AppState {
        pool,
        config: config.clone(),
        classifier,
        users,
        notices,
        issues,
        recycled,
        uploads,
    };

    // Create router with static file serving (uploaded images live under static/)
    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());
    let app = web_api::create_router(state)
        .nest_service("/static", ServeDir::new(&static_dir))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    tracing::info!(static_dir = %static_dir, "Static file serving enabled");

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
