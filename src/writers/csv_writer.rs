use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::models::CleanObservation;

/// Persist the cleaned dataset as the intermediate CSV artifact.
pub fn write_cleaned(records: &[CleanObservation], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(
        path = %path.display(),
        rows = records.len(),
        "Wrote cleaned dataset"
    );

    Ok(records.len())
}

/// Read a cleaned artifact back for the warehouse load stage.
pub fn read_cleaned(path: &Path) -> Result<Vec<CleanObservation>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();

    for row in reader.deserialize() {
        let record: CleanObservation = row?;
        records.push(record);
    }

    info!(
        path = %path.display(),
        rows = records.len(),
        "Read cleaned dataset"
    );

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn observation(station: &str, date: NaiveDate) -> CleanObservation {
        CleanObservation {
            station: station.to_string(),
            name: "TEST".to_string(),
            latitude: 36.0,
            longitude: 3.0,
            elevation: 25.0,
            date,
            year: 2020,
            month: 1,
            day: 1,
            pays: station.chars().take(2).collect(),
            prcp: 0.0,
            tavg: 12.0,
            tmax: 17.0,
            tmin: 8.0,
            snwd: 0.0,
            pgtm: 1200.0,
            snow: 0.0,
            wdfg: 270.0,
            wsfg: 11.0,
        }
    }

    #[test]
    fn test_artifact_header_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Weather_data.csv");
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

        write_cleaned(&[observation("AL001", date)], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let header = contents.lines().next().unwrap();
        assert_eq!(
            header,
            "STATION,NAME,LATITUDE,LONGITUDE,ELEVATION,DATE,YEAR,MONTH,DAY,PAYS,\
             PRCP,TAVG,TMAX,TMIN,SNWD,PGTM,SNOW,WDFG,WSFG"
        );
    }

    #[test]
    fn test_write_then_read_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Weather_data.csv");
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let records = vec![observation("AL001", date), observation("MA002", date)];

        write_cleaned(&records, &path).unwrap();
        let read_back = read_cleaned(&path).unwrap();

        assert_eq!(read_back, records);
    }
}
