use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use roster_scraper::{Credentials, RosterPipeline, ScraperConfig};

/// Scrape current team rosters from a Zuluru league site.
///
/// Credentials come from ZULURU_USER and ZULURU_PASSWORD.
#[derive(Debug, Parser)]
#[command(name = "roster-scraper", version, about)]
struct Cli {
    /// TOML file overriding the default site settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Division to scrape (defaults to the configured division)
    #[arg(short, long)]
    division: Option<String>,

    /// Fetch only these team IDs instead of listing the division
    #[arg(short, long = "team")]
    teams: Vec<String>,

    /// Write the roster JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ScraperConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ScraperConfig::default(),
    };
    let division = cli
        .division
        .clone()
        .unwrap_or_else(|| config.division_id.clone());
    let credentials = Credentials::from_env();

    let pipeline = RosterPipeline::with_http(config);
    let scraped = if cli.teams.is_empty() {
        pipeline.run(&division, &credentials).await
    } else {
        pipeline.run_with_ids(&cli.teams, &credentials).await
    };
    let index = scraped.context("Roster scrape failed")?;

    let json = index.to_json(cli.pretty).context("Failed to serialize rosters")?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {} teams to {}", index.len(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
