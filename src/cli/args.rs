use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "meteo-warehouse")]
#[command(about = "Weather station ETL and star-schema warehouse loader")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Configuration file path (TOML)")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate the per-region extracts, normalize them, and write the
    /// cleaned dataset
    Clean {
        #[arg(short, long, help = "Cleaned output file [default: from config]")]
        output: Option<PathBuf>,
    },

    /// Create the warehouse schema and load the cleaned dataset into it
    Load {
        #[arg(short, long, help = "Cleaned input file [default: from config]")]
        input: Option<PathBuf>,

        #[arg(long, default_value = "false", help = "Skip seeding the calendar reference")]
        skip_calendar: bool,
    },

    /// Show warehouse row counts and a sample of the joined dataset
    Report {
        #[arg(short, long, default_value = "5", help = "Joined sample rows to show")]
        sample: usize,

        #[arg(long, default_value = "false", help = "Emit the report as JSON")]
        json: bool,
    },
}
