//! CLI entrypoint for TravelCard

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tokio::io::BufReader;
use tracing::{info, warn};

use travelcard::cli::{Cli, Command};
use travelcard::export;
use travelcard::session::Session;
use travelcard::{
    CardState, ForecastOrchestrator, Geocoder, OpenMeteoClient, TravelCardConfig, VERSION, logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = TravelCardConfig::load_from_path(cli.config.clone())
        .with_context(|| "Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose);

    info!("Starting TravelCard {VERSION}");

    let client = Arc::new(OpenMeteoClient::new(&config)?);

    match cli.command {
        Command::Search { query } => run_search(client.as_ref(), &query).await,
        Command::Card {
            query,
            pick,
            png,
            text,
            text_out,
        } => {
            let options = CardOptions {
                pick: pick as usize,
                png,
                text,
                text_out,
            };
            run_card(client.as_ref(), &config, &query, options).await
        }
        Command::Session => {
            let mut session = Session::new(client, &config);
            let stdin = BufReader::new(tokio::io::stdin());
            session.run(stdin, &mut std::io::stdout()).await
        }
    }
}

struct CardOptions {
    pick: usize,
    png: Option<Option<PathBuf>>,
    text: bool,
    text_out: Option<PathBuf>,
}

async fn run_search(client: &OpenMeteoClient, query: &str) -> Result<()> {
    let locations = match client.search_locations(query).await {
        Ok(locations) => locations,
        Err(e) => {
            warn!("{e}");
            bail!("{}", e.user_message());
        }
    };

    if locations.is_empty() {
        println!("No places found for \"{}\".", query.trim());
        return Ok(());
    }

    for (i, location) in locations.iter().enumerate() {
        println!(
            "{}. {} ({})  [{}]",
            i + 1,
            location.name,
            location.subtitle(),
            location.format_coordinates()
        );
    }
    Ok(())
}

async fn run_card(
    client: &OpenMeteoClient,
    config: &TravelCardConfig,
    query: &str,
    options: CardOptions,
) -> Result<()> {
    let mut orchestrator = ForecastOrchestrator::new(config.search.min_query_chars);

    let Some(request) = orchestrator.edit_query(query) else {
        bail!(
            "Search needs at least {} characters",
            config.search.min_query_chars
        );
    };
    let result = client.search_locations(&request.query).await;
    orchestrator.apply_search(request.ticket, result);

    match orchestrator.state() {
        CardState::NoResults { query } => bail!("No places found for \"{query}\"."),
        CardState::GeocodeError { message, .. } => bail!("{message}"),
        _ => {}
    }

    let available = orchestrator.suggestions().len();
    if orchestrator.pick_suggestion(options.pick - 1).is_none() {
        bail!("Only {available} result(s) for \"{query}\"");
    }

    let forecast = match orchestrator.generate(client).await {
        CardState::Success { forecast } => forecast,
        CardState::ForecastError { message, .. } => bail!("{message}"),
        other => bail!("Unexpected card state: {}", other.name()),
    };

    println!("{}", export::terminal_card(forecast));

    if let Some(target) = options.png {
        let path =
            export::resolve_png_path(target.as_deref(), Path::new(&config.export.output_dir), forecast);
        match export::write_png(forecast, &path) {
            Ok(()) => println!("\nSaved {}", path.display()),
            Err(e) => {
                warn!("PNG export failed: {e}");
                eprintln!("{}", e.user_message());
            }
        }
    }

    if options.text {
        println!("\n{}", export::summary_text(forecast));
    }

    if let Some(path) = options.text_out {
        match export::write_summary(forecast, &path) {
            Ok(()) => println!("\nSaved {}", path.display()),
            Err(e) => {
                warn!("Summary export failed: {e}");
                eprintln!("{}", e.user_message());
            }
        }
    }

    Ok(())
}
