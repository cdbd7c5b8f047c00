use clap::Parser;
use meteo_warehouse::cli::{run, Cli};
use meteo_warehouse::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
