use std::sync::Arc;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use tokio::task;
use tracing::info;

use crate::api::error::ApiError;
use crate::database::connection::establish_pooled_connection;

pub struct AppState {
    pub pool: Pool<ConnectionManager<PgConnection>>,
}

impl AppState {
    pub fn new() -> Arc<Self> {
        info!("Initializing state...");
        let pool = establish_pooled_connection();

        Arc::new(Self { pool })
    }

    // Diesel is synchronous, so every query runs on the blocking pool with
    // its own pooled connection.
    pub async fn db<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let mut connection = pool.get()?;
            f(&mut connection)
        })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
    }
}
