use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use indicatif::{ParallelProgressIterator, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use npfl_results_scraper::{
    analysis,
    config::ScraperConfig,
    features,
    fetch::{self, PageFetcher},
    season::{self, SeasonReport},
    store::{self, MasterDataset},
};

/// Seasons with a results matrix on their Wikipedia page.
const HISTORICAL_SEASONS: [&str; 4] = ["2024-25", "2023-24", "2022-23", "2021-22"];
const CURRENT_SEASON: &str = "2025-26";

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rebuild the master dataset from the historical season pages
    Scrape {
        /// Season labels (e.g. 2023-24); defaults to the known list
        #[arg(short, long)]
        seasons: Vec<String>,
    },
    /// Scrape one season and merge it into the master dataset
    Update {
        /// Season label to refresh
        #[arg(short, long, default_value = CURRENT_SEASON)]
        season: String,
    },
    /// Run the pipeline over a saved HTML page
    ProcessFile {
        /// Path to the HTML file to process
        #[arg(short, long)]
        file: PathBuf,
        /// Season label to stamp on extracted records
        #[arg(short, long)]
        season: String,
        /// Optional CSV path for the extracted records
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Derive attack/defense training features from the master dataset
    Features,
    /// Print the outcome distribution and team-name audit
    Audit,
}

fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = ScraperConfig::from_env();

    match cli.command {
        Commands::Scrape { seasons } => {
            let seasons = if seasons.is_empty() {
                HISTORICAL_SEASONS.iter().map(|s| s.to_string()).collect()
            } else {
                seasons
            };
            scrape(&config, &seasons)
        }
        Commands::Update { season } => update(&config, &season),
        Commands::ProcessFile { file, season, out } => {
            process_file(&file, &season, out.as_deref())
        }
        Commands::Features => build_features(&config),
        Commands::Audit => audit(&config),
    }
}

/// Fetches each season page in turn (the limiter paces the requests). A
/// season that fails to download is logged and skipped; it must not take
/// the rest of the run down with it.
fn fetch_season_pages(
    config: &ScraperConfig,
    seasons: &[String],
) -> Result<Vec<(String, String)>> {
    let mut fetcher = PageFetcher::new(config)?;
    let mut pages = Vec::new();
    for season in seasons {
        let url = fetch::season_url(season);
        info!("Fetching {} from {}", season, url);
        match fetcher.fetch_page(&url) {
            Ok(html) => pages.push((season.clone(), html)),
            Err(e) => error!("Failed to fetch {}: {:#}", season, e),
        }
    }
    Ok(pages)
}

fn scrape(config: &ScraperConfig, seasons: &[String]) -> Result<()> {
    let pages = fetch_season_pages(config, seasons)?;

    // Pages are independent, so classification and extraction fan out; only
    // the merge below must stay a single sequential fold.
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} seasons ({eta})")
        .unwrap();
    let reports: Vec<SeasonReport> = pages
        .par_iter()
        .progress_with_style(style)
        .map(|(season, html)| season::process_page(html, season))
        .collect();

    let mut dataset = MasterDataset::default();
    for report in reports {
        dataset.merge(report.records);
    }

    if dataset.is_empty() {
        warn!("No data scraped; master file left untouched");
        return Ok(());
    }
    dataset.save(&config.storage.master_file)?;
    info!(
        "Saved {} matches to {:?}",
        dataset.len(),
        config.storage.master_file
    );
    Ok(())
}

fn update(config: &ScraperConfig, season: &str) -> Result<()> {
    let mut dataset = MasterDataset::load(&config.storage.master_file)?;
    info!("Loaded master dataset: {} matches", dataset.len());

    let mut fetcher = PageFetcher::new(config)?;
    let url = fetch::season_url(season);
    let html = fetcher
        .fetch_page(&url)
        .with_context(|| format!("fetching season {}", season))?;
    let report = season::process_page(&html, season);
    if report.records.is_empty() {
        warn!("No matches scraped for {}; nothing to merge", season);
        return Ok(());
    }

    let added = dataset.merge(report.records);
    dataset.save(&config.storage.master_file)?;
    info!(
        "Updated {:?}: {} matches total, {} net new",
        config.storage.master_file,
        dataset.len(),
        added
    );
    Ok(())
}

fn process_file(file: &Path, season: &str, out: Option<&Path>) -> Result<()> {
    let html = fs::read_to_string(file).with_context(|| format!("reading {:?}", file))?;
    let report = season::process_page(&html, season);
    info!(
        "{:?}: {} tables, {} matrices, {} records",
        file,
        report.tables_seen,
        report.matrices_found,
        report.records.len()
    );
    if let Some(out) = out {
        store::write_records(out, &report.records)?;
        info!("Wrote {} records to {:?}", report.records.len(), out);
    }
    Ok(())
}

fn build_features(config: &ScraperConfig) -> Result<()> {
    let dataset = MasterDataset::load(&config.storage.master_file)?;
    let rows = features::build_training_rows(dataset.records());
    features::write_training_csv(&config.storage.training_file, &rows)?;
    info!(
        "Wrote {} training rows to {:?}",
        rows.len(),
        config.storage.training_file
    );
    Ok(())
}

fn audit(config: &ScraperConfig) -> Result<()> {
    let dataset = MasterDataset::load(&config.storage.master_file)?;
    println!("{}", analysis::audit_dataset(dataset.records()));
    Ok(())
}
