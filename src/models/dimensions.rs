use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::CleanObservation;

/// Station dimension row. Natural key is the station code; the surrogate
/// StationID is assigned by the warehouse on insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StationRecord {
    pub code: String,

    pub name: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    pub elevation: f64,

    #[validate(length(equal = 2))]
    pub pays: String,
}

impl StationRecord {
    pub fn from_observation(obs: &CleanObservation) -> Self {
        Self {
            code: obs.station.clone(),
            name: obs.name.clone(),
            latitude: obs.latitude,
            longitude: obs.longitude,
            elevation: obs.elevation,
            pays: obs.pays.clone(),
        }
    }
}

/// Date dimension row. Year/month/day are stored redundantly for query
/// performance; they are always derived from the date itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRecord {
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }

    pub fn from_observation(obs: &CleanObservation) -> Self {
        Self {
            date: obs.date,
            year: obs.year,
            month: obs.month,
            day: obs.day,
        }
    }
}

/// Fact row keyed by the two surrogate identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherFact {
    pub station_id: i64,
    pub date_id: i64,
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

impl WeatherFact {
    pub fn new(station_id: i64, date_id: i64, obs: &CleanObservation) -> Self {
        Self {
            station_id,
            date_id,
            prcp: obs.prcp,
            tavg: obs.tavg,
            tmax: obs.tmax,
            tmin: obs.tmin,
            snwd: obs.snwd,
            pgtm: obs.pgtm,
            snow: obs.snow,
            wdfg: obs.wdfg,
            wsfg: obs.wsfg,
        }
    }
}
