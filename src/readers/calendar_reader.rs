use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::models::CalendarDay;

/// Read the pre-built calendar reference file (Date,Year,Month,Day).
pub fn read_calendar(path: &Path) -> Result<Vec<CalendarDay>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut days = Vec::new();

    for row in reader.deserialize() {
        let day: CalendarDay = row?;
        days.push(day);
    }

    info!(
        path = %path.display(),
        days = days.len(),
        "Read calendar reference"
    );

    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_calendar_reference() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Date,Year,Month,Day").unwrap();
        writeln!(file, "1850-01-01,1850,1,1").unwrap();
        writeln!(file, "1850-01-02,1850,1,2").unwrap();

        let days = read_calendar(file.path()).unwrap();

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(1850, 1, 1).unwrap());
        assert_eq!(days[1].day, 2);
    }
}
