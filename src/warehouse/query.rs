use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::error::Result;

/// One row of the flat join exposed to the downstream viewer. All filtering
/// (station, year, month, season bucket) happens on the consumer's side.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ObservationRow {
    pub station_code: String,
    pub station_name: String,
    pub pays: String,
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub prcp: f64,
    pub tavg: f64,
    pub tmax: f64,
    pub tmin: f64,
    pub snwd: f64,
    pub pgtm: f64,
    pub snow: f64,
    pub wdfg: f64,
    pub wsfg: f64,
}

const JOIN_QUERY: &str = "
    SELECT
        s.StationCode AS station_code,
        s.Name        AS station_name,
        s.Pays        AS pays,
        d.Date        AS date,
        d.Year        AS year,
        d.Month       AS month,
        d.Day         AS day,
        f.PRCP AS prcp,
        f.TAVG AS tavg,
        f.TMAX AS tmax,
        f.TMIN AS tmin,
        f.SNWD AS snwd,
        f.PGTM AS pgtm,
        f.SNOW AS snow,
        f.WDFG AS wdfg,
        f.WSFG AS wsfg
    FROM Weather_Fact f
    JOIN Station_Dim s ON f.StationID = s.StationID
    JOIN Date_Dim d ON f.Date_ID = d.Date_ID";

/// The single read contract: Weather_Fact joined with both dimensions.
pub async fn fetch_observations(
    pool: &SqlitePool,
    limit: Option<usize>,
) -> Result<Vec<ObservationRow>> {
    let rows = match limit {
        Some(n) => {
            sqlx::query_as::<_, ObservationRow>(&format!("{} LIMIT ?", JOIN_QUERY))
                .bind(n as i64)
                .fetch_all(pool)
                .await?
        }
        None => {
            sqlx::query_as::<_, ObservationRow>(JOIN_QUERY)
                .fetch_all(pool)
                .await?
        }
    };

    Ok(rows)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarehouseCounts {
    pub stations: i64,
    pub dates: i64,
    pub facts: i64,
}

pub async fn table_counts(pool: &SqlitePool) -> Result<WarehouseCounts> {
    let (stations,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM Station_Dim")
        .fetch_one(pool)
        .await?;
    let (dates,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM Date_Dim")
        .fetch_one(pool)
        .await?;
    let (facts,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM Weather_Fact")
        .fetch_one(pool)
        .await?;

    Ok(WarehouseCounts {
        stations,
        dates,
        facts,
    })
}
