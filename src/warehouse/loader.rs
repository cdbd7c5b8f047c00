use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};
use validator::Validate;

use crate::error::{EtlError, Result};
use crate::models::{CleanObservation, DateRecord, StationRecord, WeatherFact};
use crate::utils::ProgressReporter;

/// Natural-key to surrogate-key mappings for one load operation. Built up
/// during dimension insertion, consulted read-only during fact insertion;
/// its lifetime is exactly one `WarehouseLoader::load` call.
#[derive(Debug, Default)]
pub struct DimensionKeys {
    stations: HashMap<String, i64>,
    dates: HashMap<NaiveDate, i64>,
}

impl DimensionKeys {
    pub fn record_station(&mut self, code: &str, id: i64) {
        self.stations.insert(code.to_string(), id);
    }

    pub fn record_date(&mut self, date: NaiveDate, id: i64) {
        self.dates.insert(date, id);
    }

    pub fn station_id(&self, code: &str) -> Result<i64> {
        self.stations
            .get(code)
            .copied()
            .ok_or_else(|| EtlError::UnknownKey {
                key: code.to_string(),
            })
    }

    pub fn date_id(&self, date: NaiveDate) -> Result<i64> {
        self.dates
            .get(&date)
            .copied()
            .ok_or_else(|| EtlError::UnknownKey {
                key: date.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub stations_inserted: usize,
    pub dates_inserted: usize,
    pub facts_inserted: usize,
}

/// Populates the star schema from a cleaned dataset in three phases:
/// dimension extraction, dimension insertion, fact insertion. All three run
/// inside one transaction; the warehouse is untouched on any failure.
pub struct WarehouseLoader {
    silent: bool,
}

impl WarehouseLoader {
    pub fn new() -> Self {
        Self { silent: false }
    }

    pub fn with_silent(silent: bool) -> Self {
        Self { silent }
    }

    pub async fn load(
        &self,
        records: &[CleanObservation],
        pool: &SqlitePool,
    ) -> Result<LoadReport> {
        self.ensure_empty(pool).await?;

        // Phase A: first-seen deduplication by natural key.
        let stations = unique_stations(records);
        let dates = unique_dates(records);

        let mut tx = pool.begin().await?;
        let mut keys = DimensionKeys::default();

        // Phase B: dimension insertion, capturing surrogate keys.
        for station in &stations {
            if let Err(e) = station.validate() {
                warn!(station = %station.code, error = %e, "Station attributes failed validation");
            }

            let done = sqlx::query(
                "INSERT INTO Station_Dim (StationCode, Name, Latitude, Longitude, Elevation, Pays) \
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&station.code)
            .bind(&station.name)
            .bind(station.latitude)
            .bind(station.longitude)
            .bind(station.elevation)
            .bind(&station.pays)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_insert_error(e, "Station_Dim"))?;

            keys.record_station(&station.code, done.last_insert_rowid());
        }

        for date in &dates {
            let done = sqlx::query("INSERT INTO Date_Dim (Date, Year, Month, Day) VALUES (?, ?, ?, ?)")
                .bind(date.date)
                .bind(date.year)
                .bind(date.month as i32)
                .bind(date.day as i32)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_insert_error(e, "Date_Dim"))?;

            keys.record_date(date.date, done.last_insert_rowid());
        }

        // Phase C: one fact row per observation, keyed through the maps.
        let progress =
            ProgressReporter::new(records.len() as u64, "Inserting fact rows", self.silent);

        for record in records {
            let fact = WeatherFact::new(
                keys.station_id(&record.station)?,
                keys.date_id(record.date)?,
                record,
            );

            sqlx::query(
                "INSERT INTO Weather_Fact \
                 (StationID, Date_ID, PRCP, TAVG, TMAX, TMIN, SNWD, PGTM, SNOW, WDFG, WSFG) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(fact.station_id)
            .bind(fact.date_id)
            .bind(fact.prcp)
            .bind(fact.tavg)
            .bind(fact.tmax)
            .bind(fact.tmin)
            .bind(fact.snwd)
            .bind(fact.pgtm)
            .bind(fact.snow)
            .bind(fact.wdfg)
            .bind(fact.wsfg)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_insert_error(e, "Weather_Fact"))?;

            progress.increment(1);
        }

        tx.commit().await?;
        progress.finish_with_message("Fact rows inserted");

        let report = LoadReport {
            stations_inserted: stations.len(),
            dates_inserted: dates.len(),
            facts_inserted: records.len(),
        };

        info!(
            stations = report.stations_inserted,
            dates = report.dates_inserted,
            facts = report.facts_inserted,
            "Warehouse load committed"
        );

        Ok(report)
    }

    /// The load is insert-only and assumes an empty warehouse. Surrogate
    /// autoincrement would hand a rerun fresh keys and silently duplicate
    /// every fact row, so the precondition is checked up front.
    async fn ensure_empty(&self, pool: &SqlitePool) -> Result<()> {
        for (table, query) in [
            ("Station_Dim", "SELECT COUNT(*) FROM Station_Dim"),
            ("Weather_Fact", "SELECT COUNT(*) FROM Weather_Fact"),
        ] {
            let (count,): (i64,) = sqlx::query_as(query).fetch_one(pool).await?;
            if count > 0 {
                return Err(EtlError::DuplicateKey {
                    table: table.to_string(),
                    detail: format!("{} rows already present; the load expects an empty warehouse", count),
                });
            }
        }

        Ok(())
    }
}

impl Default for WarehouseLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// First occurrence wins: later rows with the same station code but
/// different attributes are shadowed.
pub fn unique_stations(records: &[CleanObservation]) -> Vec<StationRecord> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.station.clone()))
        .map(StationRecord::from_observation)
        .collect()
}

pub fn unique_dates(records: &[CleanObservation]) -> Vec<DateRecord> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.date))
        .map(DateRecord::from_observation)
        .collect()
}

fn map_insert_error(err: sqlx::Error, table: &str) -> EtlError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => EtlError::DuplicateKey {
            table: table.to_string(),
            detail: db.message().to_string(),
        },
        _ => EtlError::Database(err),
    }
}
