//! Bookshelf server binary

use bookshelf::{config::AppConfig, db, handlers, App};

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    let pool = db::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    db::create_schema(&pool)
        .await
        .expect("Failed to create database schema");

    let app = Arc::new(App::new(pool, &config).expect("Failed to initialize services"));
    let router = handlers::create_routes(app);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!(addr = %config.bind_addr, "bookshelf listening");

    axum::serve(listener, router).await.expect("Server error");
}
