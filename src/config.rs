use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

/// One per-country source of raw extracts: a display name and the glob
/// pattern its daily CSV files match.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceRegion {
    pub name: String,
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub sources: Vec<SourceRegion>,
    pub cleaned_file: PathBuf,
    pub calendar_file: PathBuf,
    pub database_url: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sources: vec![
                SourceRegion {
                    name: "Algeria".to_string(),
                    pattern: "Dataset/Weather Data/Algeria/Weather_*.csv".to_string(),
                },
                SourceRegion {
                    name: "Morocco".to_string(),
                    pattern: "Dataset/Weather Data/Morocco/Weather_*.csv".to_string(),
                },
                SourceRegion {
                    name: "Tunisia".to_string(),
                    pattern: "Dataset/Weather Data/Tunisia/Weather_*.csv".to_string(),
                },
            ],
            cleaned_file: PathBuf::from("Dataset/Weather_data.csv"),
            calendar_file: PathBuf::from("Dataset/Dim_Date_1850-2050.csv"),
            database_url: "sqlite://weather_warehouse.sqlite".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from an optional TOML file, with `METEO`-prefixed
    /// environment variables overriding file values and built-in defaults
    /// covering everything else.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let builder = match path {
            Some(p) => config::Config::builder().add_source(config::File::from(p)),
            None => config::Config::builder()
                .add_source(config::File::with_name("meteo-warehouse").required(false)),
        };

        let settings = builder
            .add_source(config::Environment::with_prefix("METEO").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
