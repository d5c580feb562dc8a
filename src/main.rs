//! triplanner - City trip planning CLI
//!
//! Resolves a city against the knowledge graph, enriches its monuments
//! from Wikipedia and Commons, and prints a day-by-day sightseeing
//! itinerary. An ambiguous city name lists the candidates and asks to be
//! re-run with an explicit `--qid`.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use triplanner::config::Settings;
use triplanner::fusion::CascadeResolver;
use triplanner::sources::{CommonsClient, WikidataClient, WikipediaClient};
use triplanner::types::Itinerary;
use triplanner::workflow::{CityMatch, Planner};

#[derive(Parser)]
#[command(name = "triplanner", version, about = "Plan a sightseeing itinerary for a city")]
struct Cli {
    /// City to plan for
    #[arg(required_unless_present = "qid")]
    city: Option<String>,

    /// Trip length in days
    #[arg(long, default_value_t = 3)]
    days: usize,

    /// Plan directly for a city QID, skipping name resolution
    #[arg(long)]
    qid: Option<String>,

    /// Override the configured monument query limit
    #[arg(long)]
    limit: Option<usize>,

    /// Path to a TOML settings file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the itinerary as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    info!("Starting triplanner v{}", env!("CARGO_PKG_VERSION"));

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(limit) = cli.limit {
        settings.monument_limit = limit;
    }

    let timeout = settings.request_timeout();
    let wikidata = Arc::new(WikidataClient::new(timeout)?);
    let wikipedia = Arc::new(WikipediaClient::new(timeout)?);
    let commons = Arc::new(CommonsClient::new(timeout)?);

    let resolver = CascadeResolver::new(wikipedia.clone(), wikipedia, commons);
    let planner = Planner::new(wikidata.clone(), wikidata, resolver, settings);

    let qid = match cli.qid {
        Some(qid) => qid,
        None => {
            let Some(city) = cli.city.as_deref() else {
                anyhow::bail!("a city name or --qid is required");
            };

            match planner.resolve_city(city).await {
                CityMatch::NoMatch => {
                    println!("No city found matching '{city}'.");
                    return Ok(());
                }
                CityMatch::Unique(candidate) => {
                    info!(label = %candidate.label, qid = %candidate.qid, "Resolved city");
                    candidate.qid
                }
                CityMatch::Ambiguous(candidates) => {
                    println!("Multiple cities match '{city}':");
                    for candidate in &candidates {
                        println!(
                            "  {:<12} {} ({})",
                            candidate.qid, candidate.label, candidate.country
                        );
                    }
                    println!("Re-run with --qid <QID> to choose one.");
                    return Ok(());
                }
            }
        }
    };

    let itinerary = planner.plan(&qid, cli.days).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&itinerary)?);
    } else {
        print_itinerary(&itinerary);
    }

    Ok(())
}

fn print_itinerary(itinerary: &Itinerary) {
    for (index, day) in itinerary.days.iter().enumerate() {
        println!("Day {}:", index + 1);

        if day.is_empty() {
            println!("  no results for this day");
            continue;
        }

        for monument in &day.monuments {
            println!("  - {} [{}]", monument.label, monument.description_source);
            println!("    {}", monument.description);
            if let Some(image) = &monument.image {
                println!("    image: {} [{}]", image, monument.image_source);
            }
        }
    }
}
