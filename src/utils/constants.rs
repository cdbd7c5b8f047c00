/// Canonical column set required in every raw extract, in projection order.
pub const REQUIRED_COLUMNS: [&str; 15] = [
    "STATION",
    "NAME",
    "LATITUDE",
    "LONGITUDE",
    "ELEVATION",
    "DATE",
    "PRCP",
    "TAVG",
    "TMAX",
    "TMIN",
    "SNWD",
    "PGTM",
    "SNOW",
    "WDFG",
    "WSFG",
];

/// Numeric columns in the cleaned output, in the order they are imputed.
pub const NUMERIC_COLUMNS: [&str; 12] = [
    "LATITUDE",
    "LONGITUDE",
    "ELEVATION",
    "PRCP",
    "TAVG",
    "TMAX",
    "TMIN",
    "SNWD",
    "PGTM",
    "SNOW",
    "WDFG",
    "WSFG",
];

/// Columns whose sentinel readings are replaced with missing before imputation.
pub const SENTINEL_COLUMNS: [&str; 6] = ["TMIN", "TMAX", "TAVG", "PGTM", "WDFG", "WSFG"];

/// Source markers for "no reading": an out-of-range low and an out-of-range high.
pub const SENTINEL_VALUES: [f64; 2] = [-99.0, 93.2];

/// Columns where a missing reading means no precipitation, not an unknown.
pub const ZERO_FILL_COLUMNS: [&str; 3] = ["PRCP", "SNWD", "SNOW"];

/// Strict date format for the DATE column and the calendar reference.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Leading characters of a station code that identify its country.
pub const REGION_CODE_LEN: usize = 2;

/// Batch size for chunked calendar inserts.
pub const SEED_CHUNK_SIZE: usize = 100;
