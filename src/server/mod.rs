//! HTTP API over the catalog and in-memory builds (axum on a tokio runtime).

pub mod api;
pub mod routes;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::build::ShipBuild;
use crate::config::AppConfig;
use crate::data::Catalog;
use crate::error::Result;

/// Shared handler state. Builds live only as long as the process.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub builds: Arc<Mutex<HashMap<Uuid, ShipBuild>>>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            builds: Arc::new(Mutex::new(HashMap::new())),
            started_at: Utc::now(),
        }
    }
}

/// Load the catalog, bind and serve until the process is stopped.
pub fn run_server(config: &AppConfig) -> Result<()> {
    let catalog = Catalog::load_dir(&config.data_dir)?;
    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(serve(config, AppState::new(catalog)))
}

async fn serve(config: &AppConfig, state: AppState) -> Result<()> {
    let static_dir = config.static_dir.is_dir().then_some(config.static_dir.as_path());
    let app = routes::router(state, static_dir);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(
        addr = %config.bind_addr,
        static_dir = ?static_dir,
        "hotac server listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
