use std::path::Path;
use std::sync::Mutex;

use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Cli, Commands};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::processors::RecordNormalizer;
use crate::readers::{read_calendar, FileAggregator, RawFrame};
use crate::warehouse::{
    self, create_schema, fetch_observations, table_counts, CalendarSeeder, WarehouseLoader,
};
use crate::writers::{read_cleaned, write_cleaned};

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let config = PipelineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Clean { output } => {
            let aggregator = FileAggregator::new();
            let mut frames = Vec::with_capacity(config.sources.len());

            for source in &config.sources {
                println!("Merging files for {} ({})", source.name, source.pattern);
                frames.push(aggregator.aggregate(&source.pattern)?);
            }

            let combined = RawFrame::concat(frames)?;
            println!("Aggregated {} rows across all regions", combined.rows.len());

            let cleaned = RecordNormalizer::new().normalize(&combined)?;

            let output = output.unwrap_or_else(|| config.cleaned_file.clone());
            let written = write_cleaned(&cleaned, &output)?;
            println!("Cleaned {} observations -> {}", written, output.display());
        }

        Commands::Load {
            input,
            skip_calendar,
        } => {
            let input = input.unwrap_or_else(|| config.cleaned_file.clone());
            let records = read_cleaned(&input)?;
            println!("Read {} cleaned observations from {}", records.len(), input.display());

            let pool = warehouse::connect(&config.database_url).await?;
            create_schema(&pool).await?;

            let report = WarehouseLoader::new().load(&records, &pool).await?;
            println!(
                "Loaded {} stations, {} dates, {} fact rows",
                report.stations_inserted, report.dates_inserted, report.facts_inserted
            );

            if !skip_calendar {
                let days = read_calendar(&config.calendar_file)?;
                let seeded = CalendarSeeder::new().seed(&days, &pool).await?;
                println!("Seeded {} calendar dates into Date_Dim", seeded);
            }

            pool.close().await;
        }

        Commands::Report { sample, json: as_json } => {
            let pool = warehouse::connect(&config.database_url).await?;
            let counts = table_counts(&pool).await?;
            let rows = fetch_observations(&pool, Some(sample)).await?;

            if as_json {
                let report = json!({ "counts": counts, "sample": rows });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Station_Dim:  {} rows", counts.stations);
                println!("Date_Dim:     {} rows", counts.dates);
                println!("Weather_Fact: {} rows", counts.facts);

                for row in &rows {
                    println!(
                        "{} ({}) on {}: prcp={:.1} tavg={:.1} tmax={:.1} tmin={:.1}",
                        row.station_name, row.pays, row.date, row.prcp, row.tavg, row.tmax,
                        row.tmin
                    );
                }
            }

            pool.close().await;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let default_filter = if verbose {
        "meteo_warehouse=debug,info"
    } else {
        "meteo_warehouse=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    Ok(())
}
