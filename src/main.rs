use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use travelplanner::catalogue::{self, DestinationMatch};
use travelplanner::{
    AccommodationType, AdventureLevel, CancelToken, ItineraryGenerator, OpenAiClient,
    PlannerConfig, TravelPlan, TravelPreferences, telemetry,
};

#[derive(Parser)]
#[command(name = "travelplanner", version, about = "Day-by-day travel itineraries for Spanish destinations")]
struct Cli {
    /// Configuration file (defaults to <config dir>/travelplanner/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Plan a trip and print the itinerary as Markdown
    Plan {
        /// Destination city
        #[arg(short, long)]
        destination: String,

        /// Trip length in days
        #[arg(long, default_value_t = 5)]
        days: u32,

        /// Total budget in euros
        #[arg(short, long, default_value_t = 1000.0)]
        budget: f64,

        /// Interests, repeatable or comma separated
        #[arg(short, long = "interest", value_delimiter = ',')]
        interests: Vec<String>,

        /// hotel, hostel, apartment or rural-house
        #[arg(long, default_value = "hotel")]
        accommodation: AccommodationType,

        /// relaxed, moderate or intense
        #[arg(long, default_value = "moderate")]
        adventure: AdventureLevel,

        /// Dietary or mobility restrictions
        #[arg(long, default_value = "")]
        restrictions: String,

        /// Print the full plan report as JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },
    /// Look up destinations in the city catalogue
    Cities {
        /// Full or partial city name
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Cities { query } => {
            print_matches(&query);
            Ok(())
        }
        Command::Plan {
            destination,
            days,
            budget,
            interests,
            accommodation,
            adventure,
            restrictions,
            json,
        } => {
            let config = PlannerConfig::load_from_path(cli.config)?;
            telemetry::init_tracing(&config.logging)?;

            let destination = match catalogue::resolve_destination(&destination) {
                DestinationMatch::Exact(name) => name,
                DestinationMatch::Suggested {
                    chosen,
                    alternatives,
                } => {
                    info!(%chosen, alternatives = %alternatives.join(", "), "using closest catalogue match");
                    chosen
                }
                DestinationMatch::Unlisted(name) => {
                    warn!(%name, "destination not in catalogue, using general information");
                    name
                }
                DestinationMatch::Empty => anyhow::bail!("Destination cannot be empty"),
            };

            let preferences = TravelPreferences::new(destination, days, budget)?
                .with_interests(interests)
                .with_accommodation(accommodation)
                .with_adventure_level(adventure)
                .with_restrictions(restrictions);

            let client = Arc::new(OpenAiClient::from_config(&config.llm)?);
            let pipeline = ItineraryGenerator::from_config(&config, client.clone(), client);

            let cancel = CancelToken::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("interrupted, finishing with the fallback itinerary");
                    on_signal.cancel();
                }
            });

            let plan = pipeline.plan(&preferences, &cancel).await;
            if json {
                let report =
                    serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?;
                println!("{report}");
            } else {
                println!("{}", plan.itinerary);
                print_summary(&plan);
            }
            Ok(())
        }
    }
}

fn print_matches(query: &str) {
    match catalogue::resolve_destination(query) {
        DestinationMatch::Exact(name) => println!("{name}"),
        DestinationMatch::Suggested { alternatives, .. } => {
            for name in alternatives {
                println!("{name}");
            }
        }
        DestinationMatch::Unlisted(name) => {
            eprintln!("'{name}' is not in the catalogue; general information will be used");
        }
        DestinationMatch::Empty => eprintln!("Enter a city name"),
    }
}

fn print_summary(plan: &TravelPlan) {
    let quality = &plan.quality;
    eprintln!();
    eprintln!(
        "Quality: {}/100 ({})",
        quality.score,
        if quality.is_valid { "ok" } else { "needs review" }
    );
    for issue in &quality.issues {
        eprintln!("  - {issue}");
    }
    if plan.source.is_fallback() {
        eprintln!("Note: the itinerary service was unavailable, a basic itinerary was used.");
    }
    eprintln!(
        "{} words, {} day headings, model {}",
        plan.metadata.analysis.word_count, plan.metadata.analysis.day_markers, plan.metadata.model
    );
}
