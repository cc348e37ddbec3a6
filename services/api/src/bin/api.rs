//! services/api/src/bin/api.rs

use api_lib::{
    adapters::db::PgStore,
    config::Config,
    error::ApiError,
    seed::seed_texts_if_empty,
    web::{
        add_text_handler, delete_text_handler, get_text_handler, health_handler,
        leaderboard_handler, list_texts_handler, rest::ApiDoc, state::AppState,
        submit_result_handler,
    },
};
use axum::{
    routing::{delete, get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let store = Arc::new(PgStore::new(db_pool));
    info!("Running database migrations...");
    store.run_migrations().await?;

    // --- 3. Seed Demo Texts ---
    let seeded = seed_texts_if_empty(store.as_ref()).await?;
    if seeded > 0 {
        info!("Seeded {} demo texts into the empty store", seeded);
    }

    // --- 4. Build the Shared AppState & Router ---
    let app_state = Arc::new(AppState {
        store,
        config: config.clone(),
    });

    // The frontend may be served from anywhere.
    let cors = CorsLayer::permissive();

    let api_router = Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/texts", get(get_text_handler).post(add_text_handler))
        .route("/api/texts/all", get(list_texts_handler))
        .route("/api/texts/{text_id}", delete(delete_text_handler))
        .route("/api/results", post(submit_result_handler))
        .route("/api/leaderboard", get(leaderboard_handler))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
