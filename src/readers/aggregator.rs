use std::path::{Path, PathBuf};

use csv::StringRecord;
use glob::glob;
use tracing::info;

use crate::error::{EtlError, Result};

/// Unordered tabular union of one or more raw extracts. Column order comes
/// from the first file read; rows keep file-enumeration order then in-file
/// order. No deduplication and no keys at this stage.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub columns: Vec<String>,
    pub rows: Vec<StringRecord>,
}

impl RawFrame {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Count of empty cells per column, for the post-aggregation diagnostics.
    pub fn null_summary(&self) -> Vec<(String, usize)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let nulls = self
                    .rows
                    .iter()
                    .filter(|row| row.get(i).map_or(true, |v| v.trim().is_empty()))
                    .count();
                (name.clone(), nulls)
            })
            .collect()
    }

    /// Union multiple per-region frames into one combined frame. The first
    /// frame fixes the column order; the rest must carry the same column set.
    pub fn concat(frames: Vec<RawFrame>) -> Result<RawFrame> {
        let mut iter = frames.into_iter();
        let mut combined = iter
            .next()
            .ok_or_else(|| EtlError::NoInputFiles {
                pattern: "<no region frames>".to_string(),
            })?;

        for frame in iter {
            let aligned = align_columns(&combined.columns, &frame.columns, Path::new("<frame>"))?;
            append_rows(&mut combined.rows, frame.rows, &aligned);
        }

        Ok(combined)
    }
}

/// Discovers, parses, and unions all CSV files matching one glob pattern.
pub struct FileAggregator;

impl FileAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(&self, pattern: &str) -> Result<RawFrame> {
        let paths: Vec<PathBuf> = glob(pattern)?.collect::<std::result::Result<_, _>>()?;

        if paths.is_empty() {
            return Err(EtlError::NoInputFiles {
                pattern: pattern.to_string(),
            });
        }

        let mut columns: Vec<String> = Vec::new();
        let mut rows: Vec<StringRecord> = Vec::new();

        for path in &paths {
            let mut reader = csv::Reader::from_path(path)?;
            let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

            if columns.is_empty() {
                columns = headers;
                for record in reader.records() {
                    rows.push(record?);
                }
            } else {
                let aligned = align_columns(&columns, &headers, path)?;
                let mut file_rows = Vec::new();
                for record in reader.records() {
                    file_rows.push(record?);
                }
                append_rows(&mut rows, file_rows, &aligned);
            }
        }

        let frame = RawFrame { columns, rows };

        info!(
            pattern,
            files = paths.len(),
            rows = frame.rows.len(),
            "Aggregated raw extracts"
        );
        for (column, nulls) in frame.null_summary() {
            if nulls > 0 {
                info!(column, nulls, "Missing cells in aggregated column");
            }
        }

        Ok(frame)
    }
}

impl Default for FileAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Map each canonical column to its index in `headers`, failing when the
/// column sets are incompatible. Columns in a different order are aligned by
/// name rather than rejected.
fn align_columns(canonical: &[String], headers: &[String], path: &Path) -> Result<Vec<usize>> {
    if headers.len() != canonical.len() {
        return Err(EtlError::SchemaMismatch {
            path: path.to_path_buf(),
            detail: format!(
                "expected {} columns, found {}",
                canonical.len(),
                headers.len()
            ),
        });
    }

    canonical
        .iter()
        .map(|name| {
            headers.iter().position(|h| h == name).ok_or_else(|| {
                EtlError::SchemaMismatch {
                    path: path.to_path_buf(),
                    detail: format!("column '{}' not present", name),
                }
            })
        })
        .collect()
}

fn append_rows(rows: &mut Vec<StringRecord>, incoming: Vec<StringRecord>, aligned: &[usize]) {
    let identity = aligned.iter().enumerate().all(|(i, &j)| i == j);

    for record in incoming {
        if identity {
            rows.push(record);
        } else {
            let reordered: StringRecord = aligned
                .iter()
                .map(|&j| record.get(j).unwrap_or(""))
                .collect();
            rows.push(reordered);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) {
        let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
        write!(file, "{}", contents).unwrap();
    }

    #[test]
    fn test_aggregate_two_files_in_enumeration_order() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "Weather_2019.csv", "STATION,NAME\nAL001,ALGIERS\n");
        write_file(&dir, "Weather_2020.csv", "STATION,NAME\nAL002,ORAN\n");

        let pattern = format!("{}/Weather_*.csv", dir.path().display());
        let frame = FileAggregator::new().aggregate(&pattern).unwrap();

        assert_eq!(frame.columns, vec!["STATION", "NAME"]);
        assert_eq!(frame.rows.len(), 2);
        assert_eq!(frame.rows[0].get(0), Some("AL001"));
        assert_eq!(frame.rows[1].get(0), Some("AL002"));
    }

    #[test]
    fn test_no_matching_files_is_fatal() {
        let dir = TempDir::new().unwrap();
        let pattern = format!("{}/Weather_*.csv", dir.path().display());

        let err = FileAggregator::new().aggregate(&pattern).unwrap_err();
        assert!(matches!(err, EtlError::NoInputFiles { .. }));
    }

    #[test]
    fn test_incompatible_columns_rejected() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "Weather_2019.csv", "STATION,NAME\nAL001,ALGIERS\n");
        write_file(&dir, "Weather_2020.csv", "STATION,TMAX\nAL002,21.0\n");

        let pattern = format!("{}/Weather_*.csv", dir.path().display());
        let err = FileAggregator::new().aggregate(&pattern).unwrap_err();
        assert!(matches!(err, EtlError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_reordered_columns_align_by_name() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "Weather_2019.csv", "STATION,NAME\nAL001,ALGIERS\n");
        write_file(&dir, "Weather_2020.csv", "NAME,STATION\nORAN,AL002\n");

        let pattern = format!("{}/Weather_*.csv", dir.path().display());
        let frame = FileAggregator::new().aggregate(&pattern).unwrap();

        assert_eq!(frame.rows[1].get(0), Some("AL002"));
        assert_eq!(frame.rows[1].get(1), Some("ORAN"));
    }

    #[test]
    fn test_null_summary_counts_empty_cells() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "Weather_2019.csv", "STATION,TMAX\nAL001,\nAL002,21.0\n");

        let pattern = format!("{}/Weather_*.csv", dir.path().display());
        let frame = FileAggregator::new().aggregate(&pattern).unwrap();

        assert_eq!(
            frame.null_summary(),
            vec![("STATION".to_string(), 0), ("TMAX".to_string(), 1)]
        );
    }

    #[test]
    fn test_concat_unions_region_frames() {
        let a = RawFrame {
            columns: vec!["STATION".to_string()],
            rows: vec![StringRecord::from(vec!["AL001"])],
        };
        let b = RawFrame {
            columns: vec!["STATION".to_string()],
            rows: vec![StringRecord::from(vec!["MA002"])],
        };

        let combined = RawFrame::concat(vec![a, b]).unwrap();
        assert_eq!(combined.rows.len(), 2);
        assert_eq!(combined.rows[0].get(0), Some("AL001"));
        assert_eq!(combined.rows[1].get(0), Some("MA002"));
    }
}
