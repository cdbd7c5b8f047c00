use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the pre-built exhaustive calendar reference file
/// (one entry per day across the 1850-2050 span).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    #[serde(rename = "Date")]
    pub date: NaiveDate,

    #[serde(rename = "Year")]
    pub year: i32,

    #[serde(rename = "Month")]
    pub month: u32,

    #[serde(rename = "Day")]
    pub day: u32,
}
