use sqlx::SqlitePool;
use tracing::info;

use crate::error::Result;

const STATION_DIM_DDL: &str = "
    CREATE TABLE IF NOT EXISTS Station_Dim (
        StationID   INTEGER PRIMARY KEY AUTOINCREMENT,
        StationCode TEXT NOT NULL,
        Name        TEXT,
        Latitude    REAL,
        Longitude   REAL,
        Elevation   REAL,
        Pays        CHAR(2)
    )";

const DATE_DIM_DDL: &str = "
    CREATE TABLE IF NOT EXISTS Date_Dim (
        Date_ID INTEGER PRIMARY KEY AUTOINCREMENT,
        Date    DATE,
        Year    INTEGER,
        Month   INTEGER,
        Day     INTEGER
    )";

const WEATHER_FACT_DDL: &str = "
    CREATE TABLE IF NOT EXISTS Weather_Fact (
        StationID INTEGER NOT NULL,
        Date_ID   INTEGER NOT NULL,
        PRCP REAL,
        TAVG REAL,
        TMAX REAL,
        TMIN REAL,
        SNWD REAL,
        PGTM REAL,
        SNOW REAL,
        WDFG REAL,
        WSFG REAL,
        PRIMARY KEY (StationID, Date_ID),
        FOREIGN KEY (StationID) REFERENCES Station_Dim (StationID),
        FOREIGN KEY (Date_ID) REFERENCES Date_Dim (Date_ID)
    )";

/// Create the star schema if absent. Safe to call on every run; the tables
/// are never dropped or altered here.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    for (table, ddl) in [
        ("Station_Dim", STATION_DIM_DDL),
        ("Date_Dim", DATE_DIM_DDL),
        ("Weather_Fact", WEATHER_FACT_DDL),
    ] {
        sqlx::query(ddl).execute(pool).await?;
        info!(table, "Ensured warehouse table");
    }

    Ok(())
}
