pub mod loader;
pub mod query;
pub mod schema;
pub mod seeder;

pub use loader::{DimensionKeys, LoadReport, WarehouseLoader};
pub use query::{fetch_observations, table_counts, ObservationRow, WarehouseCounts};
pub use schema::create_schema;
pub use seeder::CalendarSeeder;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error::Result;

/// Open the warehouse connection. The pool is capped at a single connection
/// that is never reaped: the pipeline holds one exclusively-owned handle for
/// the whole run, and in-memory databases must outlive individual queries.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    Ok(pool)
}
