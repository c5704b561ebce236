pub mod api;
pub mod banner;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod utils;

use std::net::SocketAddr;

use tower_http::services::ServeDir;

pub use api::create_router;
pub use banner::print_banner;
pub use config::{Config, Environment};
pub use db::{create_pool, DatabaseError};
pub use error::{AppError, AppResult};
pub use state::AppState;

pub async fn run_server(
    addr: SocketAddr,
    config: Config,
) -> Result<(), Box<dyn std::error::Error>> {
    // Ensure data directories exist
    std::fs::create_dir_all(&config.data_path)?;
    std::fs::create_dir_all(config.exports_path())?;

    let pool = create_pool(&config.database_url, config.max_connections).await?;

    let exports_path = config.exports_path();
    let state = AppState::new(pool, config);

    let router = create_router(state);

    // Serve batch output artifacts from the data directory
    let app = router.nest_service("/exports", ServeDir::new(&exports_path));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
