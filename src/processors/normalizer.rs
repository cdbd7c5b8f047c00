use chrono::{Datelike, NaiveDate};
use tracing::info;

use crate::error::{EtlError, Result};
use crate::models::CleanObservation;
use crate::readers::RawFrame;
use crate::utils::constants::{
    DATE_FORMAT, NUMERIC_COLUMNS, REGION_CODE_LEN, REQUIRED_COLUMNS, SENTINEL_COLUMNS,
    SENTINEL_VALUES, ZERO_FILL_COLUMNS,
};
use crate::utils::stats::median;

// Positions within NUMERIC_COLUMNS, fixed by the canonical column order.
const LATITUDE: usize = 0;
const LONGITUDE: usize = 1;
const ELEVATION: usize = 2;
const PRCP: usize = 3;
const TAVG: usize = 4;
const TMAX: usize = 5;
const TMIN: usize = 6;
const SNWD: usize = 7;
const PGTM: usize = 8;
const SNOW: usize = 9;
const WDFG: usize = 10;
const WSFG: usize = 11;

/// A row between projection and imputation: numeric cells may still be missing.
struct DraftObservation {
    station: String,
    name: String,
    date: NaiveDate,
    pays: String,
    values: Vec<Option<f64>>,
}

/// Projects aggregated rows onto the canonical column set, derives the
/// calendar and region columns, and resolves every missing numeric value.
pub struct RecordNormalizer;

impl RecordNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalization steps run in a fixed order: projection, date parsing,
    /// calendar/region derivation, sentinel replacement, zero-fill, then a
    /// single global median imputation per remaining column.
    pub fn normalize(&self, frame: &RawFrame) -> Result<Vec<CleanObservation>> {
        let projection = self.project_columns(frame)?;

        let mut drafts = Vec::with_capacity(frame.rows.len());
        for row in &frame.rows {
            drafts.push(self.parse_row(row, &projection)?);
        }

        self.replace_sentinels(&mut drafts);
        self.zero_fill(&mut drafts);
        self.impute_medians(&mut drafts);

        let cleaned: Vec<CleanObservation> =
            drafts.into_iter().map(finalize_observation).collect();

        info!(rows = cleaned.len(), "Normalized observations");

        Ok(cleaned)
    }

    /// Resolve the index of every required column in the aggregated frame.
    fn project_columns(&self, frame: &RawFrame) -> Result<Vec<usize>> {
        REQUIRED_COLUMNS
            .iter()
            .map(|&column| {
                frame
                    .column_index(column)
                    .ok_or_else(|| EtlError::MissingColumn {
                        column: column.to_string(),
                    })
            })
            .collect()
    }

    fn parse_row(&self, row: &csv::StringRecord, projection: &[usize]) -> Result<DraftObservation> {
        let cell = |i: usize| row.get(projection[i]).unwrap_or("").trim();

        let station = cell(0).to_string();
        let name = cell(1).to_string();

        let raw_date = cell(5);
        let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|source| {
            EtlError::InvalidDate {
                value: raw_date.to_string(),
                source,
            }
        })?;

        if station.chars().count() < REGION_CODE_LEN {
            return Err(EtlError::InvalidFormat(format!(
                "station identifier '{}' is too short to carry a region code",
                station
            )));
        }
        let pays: String = station.chars().take(REGION_CODE_LEN).collect();

        // Numeric cells follow the canonical order: LATITUDE..ELEVATION sit
        // before DATE, the nine measurements after it.
        let mut values = Vec::with_capacity(NUMERIC_COLUMNS.len());
        for (ni, &column) in NUMERIC_COLUMNS.iter().enumerate() {
            let pi = if ni <= ELEVATION { ni + 2 } else { ni + 3 };
            values.push(parse_numeric(cell(pi), column)?);
        }

        Ok(DraftObservation {
            station,
            name,
            date,
            pays,
            values,
        })
    }

    /// Out-of-range markers in the sentinel columns become missing.
    fn replace_sentinels(&self, drafts: &mut [DraftObservation]) {
        for (ni, column) in NUMERIC_COLUMNS.iter().enumerate() {
            if !SENTINEL_COLUMNS.contains(column) {
                continue;
            }
            for draft in drafts.iter_mut() {
                if let Some(v) = draft.values[ni] {
                    if SENTINEL_VALUES.contains(&v) {
                        draft.values[ni] = None;
                    }
                }
            }
        }
    }

    /// Absent precipitation readings mean zero, not unknown.
    fn zero_fill(&self, drafts: &mut [DraftObservation]) {
        for (ni, column) in NUMERIC_COLUMNS.iter().enumerate() {
            if !ZERO_FILL_COLUMNS.contains(column) {
                continue;
            }
            for draft in drafts.iter_mut() {
                draft.values[ni].get_or_insert(0.0);
            }
        }
    }

    /// Fill every remaining gap with its column's global median. A column
    /// with no readings at all yields NaN, which is preserved as-is.
    fn impute_medians(&self, drafts: &mut [DraftObservation]) {
        for ni in 0..NUMERIC_COLUMNS.len() {
            if drafts.iter().all(|d| d.values[ni].is_some()) {
                continue;
            }

            let present: Vec<f64> = drafts.iter().filter_map(|d| d.values[ni]).collect();
            let fill = median(&present);

            for draft in drafts.iter_mut() {
                draft.values[ni].get_or_insert(fill);
            }
        }
    }
}

impl Default for RecordNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_numeric(raw: &str, column: &str) -> Result<Option<f64>> {
    if raw.is_empty() {
        return Ok(None);
    }

    raw.parse::<f64>().map(Some).map_err(|_| {
        EtlError::InvalidFormat(format!("column {}: unparseable number '{}'", column, raw))
    })
}

fn finalize_observation(draft: DraftObservation) -> CleanObservation {
    let v = |i: usize| draft.values[i].unwrap_or(f64::NAN);

    CleanObservation {
        station: draft.station,
        name: draft.name,
        latitude: v(LATITUDE),
        longitude: v(LONGITUDE),
        elevation: v(ELEVATION),
        date: draft.date,
        year: draft.date.year(),
        month: draft.date.month(),
        day: draft.date.day(),
        pays: draft.pays,
        prcp: v(PRCP),
        tavg: v(TAVG),
        tmax: v(TMAX),
        tmin: v(TMIN),
        snwd: v(SNWD),
        pgtm: v(PGTM),
        snow: v(SNOW),
        wdfg: v(WDFG),
        wsfg: v(WSFG),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str =
        "STATION,NAME,LATITUDE,LONGITUDE,ELEVATION,DATE,PRCP,TAVG,TMAX,TMIN,SNWD,PGTM,SNOW,WDFG,WSFG";

    fn frame_from(rows: &[&str]) -> RawFrame {
        let text = format!("{}\n{}\n", HEADER, rows.join("\n"));
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let columns = reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();
        let rows = reader.records().map(|r| r.unwrap()).collect();
        RawFrame { columns, rows }
    }

    #[test]
    fn test_calendar_and_region_derivation() {
        let frame = frame_from(&[
            "MA00123,TANGER,35.73,-5.9,21.0,2020-03-15,0.1,15.0,20.0,10.0,0.0,1000,0.0,180,9.9",
        ]);

        let cleaned = RecordNormalizer::new().normalize(&frame).unwrap();

        assert_eq!(cleaned[0].pays, "MA");
        assert_eq!(cleaned[0].year, 2020);
        assert_eq!(cleaned[0].month, 3);
        assert_eq!(cleaned[0].day, 15);
    }

    #[test]
    fn test_missing_column_rejected() {
        let text = "STATION,NAME\nAL001,ALGIERS\n";
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let columns = reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();
        let rows = reader.records().map(|r| r.unwrap()).collect();
        let frame = RawFrame { columns, rows };

        let err = RecordNormalizer::new().normalize(&frame).unwrap_err();
        assert!(matches!(err, EtlError::MissingColumn { .. }));
    }

    #[test]
    fn test_invalid_date_rejected() {
        let frame = frame_from(&[
            "AL001,ALGIERS,36.7,3.2,25.0,15/03/2020,0.0,12.0,17.0,8.0,0.0,1200,0.0,270,11.0",
        ]);

        let err = RecordNormalizer::new().normalize(&frame).unwrap_err();
        assert!(matches!(err, EtlError::InvalidDate { .. }));
    }

    #[test]
    fn test_sentinels_replaced_by_column_median() {
        // TMAX carries both sentinel markers; the surviving values 10, 20, 30
        // have median 20, which must fill both sentinel rows.
        let frame = frame_from(&[
            "AL001,A,36.0,3.0,25.0,2020-01-01,0.0,12.0,-99,8.0,0.0,1200,0.0,270,11.0",
            "AL001,A,36.0,3.0,25.0,2020-01-02,0.0,12.0,93.2,8.0,0.0,1200,0.0,270,11.0",
            "AL001,A,36.0,3.0,25.0,2020-01-03,0.0,12.0,10.0,8.0,0.0,1200,0.0,270,11.0",
            "AL001,A,36.0,3.0,25.0,2020-01-04,0.0,12.0,20.0,8.0,0.0,1200,0.0,270,11.0",
            "AL001,A,36.0,3.0,25.0,2020-01-05,0.0,12.0,30.0,8.0,0.0,1200,0.0,270,11.0",
        ]);

        let cleaned = RecordNormalizer::new().normalize(&frame).unwrap();

        assert_eq!(cleaned[0].tmax, 20.0);
        assert_eq!(cleaned[1].tmax, 20.0);
        assert!(cleaned.iter().all(|o| o.tmax != -99.0 && o.tmax != 93.2));
    }

    #[test]
    fn test_zero_fill_takes_precedence_over_median() {
        // PRCP median over present values would be 5.0; the gap must become 0.
        let frame = frame_from(&[
            "AL001,A,36.0,3.0,25.0,2020-01-01,4.0,12.0,17.0,8.0,0.0,1200,0.0,270,11.0",
            "AL001,A,36.0,3.0,25.0,2020-01-02,,12.0,17.0,8.0,0.0,1200,0.0,270,11.0",
            "AL001,A,36.0,3.0,25.0,2020-01-03,6.0,12.0,17.0,8.0,0.0,1200,0.0,270,11.0",
        ]);

        let cleaned = RecordNormalizer::new().normalize(&frame).unwrap();

        assert_eq!(cleaned[1].prcp, 0.0);
    }

    #[test]
    fn test_median_is_global_not_per_station() {
        // One missing TMAX across two stations: the fill value is the median
        // of the whole combined dataset, not of the row's own station.
        let frame = frame_from(&[
            "AL001,A,36.0,3.0,25.0,2020-01-01,0.0,12.0,,8.0,0.0,1200,0.0,270,11.0",
            "MA002,B,35.7,-5.9,21.0,2020-01-02,0.0,12.0,24.0,8.0,0.0,1200,0.0,270,11.0",
        ]);

        let cleaned = RecordNormalizer::new().normalize(&frame).unwrap();

        assert_eq!(cleaned[0].tmax, 24.0);
    }

    #[test]
    fn test_no_missing_numeric_values_after_normalization() {
        let frame = frame_from(&[
            "AL001,A,36.0,3.0,25.0,2020-01-01,,,-99,,,,,,",
            "MA002,B,35.7,-5.9,21.0,2020-01-02,0.5,12.0,24.0,8.0,0.0,1200,0.0,270,11.0",
        ]);

        let cleaned = RecordNormalizer::new().normalize(&frame).unwrap();

        assert!(cleaned.iter().all(|o| !o.has_missing_measurement()));
    }

    #[test]
    fn test_station_too_short_for_region_code() {
        let frame = frame_from(&[
            "A,A,36.0,3.0,25.0,2020-01-01,0.0,12.0,17.0,8.0,0.0,1200,0.0,270,11.0",
        ]);

        let err = RecordNormalizer::new().normalize(&frame).unwrap_err();
        assert!(matches!(err, EtlError::InvalidFormat(_)));
    }
}
