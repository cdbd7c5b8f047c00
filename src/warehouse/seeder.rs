use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{info, warn};

use crate::error::Result;
use crate::models::CalendarDay;
use crate::utils::constants::SEED_CHUNK_SIZE;
use crate::utils::ProgressReporter;

/// Loads the exhaustive calendar reference into Date_Dim, independent of
/// which dates the observations produced.
pub struct CalendarSeeder {
    silent: bool,
}

impl CalendarSeeder {
    pub fn new() -> Self {
        Self { silent: false }
    }

    pub fn with_silent(silent: bool) -> Self {
        Self { silent }
    }

    pub async fn seed(&self, days: &[CalendarDay], pool: &SqlitePool) -> Result<usize> {
        // Date_Dim's primary key is the surrogate Date_ID, so seeding over
        // existing rows duplicates natural keys. Flagged, not prevented.
        let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM Date_Dim")
            .fetch_one(pool)
            .await?;
        if existing > 0 {
            warn!(
                existing,
                "Date_Dim already holds rows; seeding will insert duplicate calendar dates under new surrogate keys"
            );
        }

        let progress = ProgressReporter::new(days.len() as u64, "Seeding calendar", self.silent);

        let mut tx = pool.begin().await?;
        for chunk in days.chunks(SEED_CHUNK_SIZE) {
            let mut qb =
                QueryBuilder::<Sqlite>::new("INSERT INTO Date_Dim (Date, Year, Month, Day) ");
            qb.push_values(chunk, |mut b, day| {
                b.push_bind(day.date)
                    .push_bind(day.year)
                    .push_bind(day.month as i32)
                    .push_bind(day.day as i32);
            });
            qb.build().execute(&mut *tx).await?;
            progress.increment(chunk.len() as u64);
        }
        tx.commit().await?;

        progress.finish_with_message("Calendar seeded");
        info!(days = days.len(), "Seeded calendar reference into Date_Dim");

        Ok(days.len())
    }
}

impl Default for CalendarSeeder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::{connect, create_schema};
    use chrono::{Datelike, Duration, NaiveDate};

    fn calendar_span(start: NaiveDate, days: usize) -> Vec<CalendarDay> {
        (0..days)
            .map(|offset| {
                let date = start + Duration::days(offset as i64);
                CalendarDay {
                    date,
                    year: date.year(),
                    month: date.month(),
                    day: date.day(),
                }
            })
            .collect()
    }

    #[tokio::test]
    async fn test_seed_inserts_every_reference_row() {
        let pool = connect("sqlite::memory:").await.unwrap();
        create_schema(&pool).await.unwrap();

        let days = calendar_span(NaiveDate::from_ymd_opt(1850, 1, 1).unwrap(), 250);
        let seeded = CalendarSeeder::with_silent(true)
            .seed(&days, &pool)
            .await
            .unwrap();

        assert_eq!(seeded, 250);

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM Date_Dim")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 250);
    }

    #[tokio::test]
    async fn test_seed_over_existing_rows_duplicates_natural_keys() {
        let pool = connect("sqlite::memory:").await.unwrap();
        create_schema(&pool).await.unwrap();

        let days = calendar_span(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), 3);
        let seeder = CalendarSeeder::with_silent(true);
        seeder.seed(&days, &pool).await.unwrap();
        seeder.seed(&days, &pool).await.unwrap();

        // Same calendar date twice under different surrogate keys: the known
        // correctness gap of a surrogate-only primary key.
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM Date_Dim WHERE Date = '2020-01-01'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 2);
    }
}
