//! Libris Server - Library Management Backend
//!
//! A Rust REST API server for book catalog, borrow workflow and dashboards.

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use libris_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("libris_server={},tower_http=debug", config.logging.level).into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Libris Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.policy.clone(), config.catalog.clone());

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(server_host.parse().expect("Invalid host address"), server_port);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Users
        .route("/register", post(api::users::register))
        .route("/me", get(api::users::me))
        .route("/update", put(api::users::update_profile))
        .route("/users", get(api::users::list_users))
        .route("/users/:id", delete(api::users::delete_user))
        .route("/users/:id/status", patch(api::users::update_user_status))
        // Books (catalog)
        .route("/books", get(api::books::list_books))
        .route("/books", post(api::books::create_book))
        .route("/books/categories", get(api::books::list_categories))
        .route("/books/:id", get(api::books::get_book))
        .route("/books/:id", put(api::books::update_book))
        .route("/books/:id", delete(api::books::delete_book))
        .route("/featured", get(api::books::featured))
        .route("/top-borrowed", get(api::books::top_borrowed))
        // Borrow workflow
        .route("/books/borrow/:id", post(api::borrows::request_borrow))
        .route("/books/return/:id", post(api::borrows::request_return))
        .route("/books/status/:id", get(api::borrows::book_status))
        .route("/my-borrowed-books", get(api::borrows::my_borrowed))
        .route("/borrow-history", get(api::borrows::history))
        // Admin ledger views and confirmations
        .route("/admin/pending-requests", get(api::borrows::admin_pending))
        .route("/admin/borrows/pending", get(api::borrows::admin_pending))
        .route("/admin/borrows", get(api::borrows::admin_all))
        .route("/admin/confirm-borrow/:id", post(api::borrows::confirm_borrow))
        .route("/admin/confirm-return/:id", post(api::borrows::confirm_return))
        // Dashboards
        .route("/dashboard/member", get(api::dashboard::member_dashboard))
        .route("/dashboard/teacher", get(api::dashboard::teacher_dashboard))
        .route("/dashboard/admin", get(api::dashboard::admin_dashboard))
        // Contact
        .route("/api/contact", post(api::contact::submit))
        .route("/api/contact", get(api::contact::list))
        .route("/api/contact/:id", delete(api::contact::delete))
        // Carousel
        .route("/carousel", get(api::carousel::list))
        .route("/carousel", post(api::carousel::create))
        .route("/carousel/:id", put(api::carousel::update))
        .route("/carousel/:id", delete(api::carousel::delete))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .merge(routes)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
