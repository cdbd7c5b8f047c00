use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One fully normalized observation row, as persisted to the cleaned CSV.
///
/// Field order matches the cleaned artifact's column order; serde renames
/// carry the ALL-CAPS headers of the source extracts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanObservation {
    #[serde(rename = "STATION")]
    pub station: String,

    #[serde(rename = "NAME")]
    pub name: String,

    #[serde(rename = "LATITUDE")]
    pub latitude: f64,

    #[serde(rename = "LONGITUDE")]
    pub longitude: f64,

    #[serde(rename = "ELEVATION")]
    pub elevation: f64,

    #[serde(rename = "DATE")]
    pub date: NaiveDate,

    #[serde(rename = "YEAR")]
    pub year: i32,

    #[serde(rename = "MONTH")]
    pub month: u32,

    #[serde(rename = "DAY")]
    pub day: u32,

    #[serde(rename = "PAYS")]
    pub pays: String,

    #[serde(rename = "PRCP")]
    pub prcp: f64,

    #[serde(rename = "TAVG")]
    pub tavg: f64,

    #[serde(rename = "TMAX")]
    pub tmax: f64,

    #[serde(rename = "TMIN")]
    pub tmin: f64,

    #[serde(rename = "SNWD")]
    pub snwd: f64,

    #[serde(rename = "PGTM")]
    pub pgtm: f64,

    #[serde(rename = "SNOW")]
    pub snow: f64,

    #[serde(rename = "WDFG")]
    pub wdfg: f64,

    #[serde(rename = "WSFG")]
    pub wsfg: f64,
}

impl CleanObservation {
    /// Measurement values in warehouse column order.
    pub fn measurements(&self) -> [f64; 9] {
        [
            self.prcp, self.tavg, self.tmax, self.tmin, self.snwd, self.pgtm, self.snow,
            self.wdfg, self.wsfg,
        ]
    }

    pub fn has_missing_measurement(&self) -> bool {
        self.measurements().iter().any(|v| v.is_nan())
    }
}
