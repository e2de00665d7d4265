//! Main entry point for the detective academy backend.
//!
//! Initializes tracing, loads configuration from the environment, connects
//! to MongoDB, and serves the Axum application.

use std::net::SocketAddr;
use std::sync::Arc;

use academy_backend::config::Config;
use academy_backend::database::queries::MongoStore;
use academy_backend::state::AppState;
use academy_backend::{app, database};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let db = database::connect(&config.mongodb_uri, &config.database_name)
        .await
        .expect("failed to connect to MongoDB");
    let store = Arc::new(MongoStore::new(&db));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(store, config);

    tracing::info!("listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(app(state).into_make_service())
        .await
        .unwrap();
}
