//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for travelcard
#[derive(Parser, Debug)]
#[command(name = "travelcard")]
#[command(author, version, about = "Shareable 7-day travel weather cards")]
#[command(long_about = r#"
TravelCard looks up a destination, fetches a 7-day forecast from Open-Meteo
and renders a card that highlights the best day to visit.

Configuration is loaded from (in priority order):
1. TRAVELCARD_* environment variables (e.g. TRAVELCARD_SEARCH__DEBOUNCE_MS=500)
2. --config <path>     Explicit config file
3. ~/.config/travelcard/config.toml

Example:
  travelcard search "San Sebastián"
  travelcard card Lisbon --png --text
  travelcard card Portland --pick 2 --png cards/
  travelcard session
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List matching destinations
    Search {
        /// Place name to look up
        query: String,
    },

    /// Build a forecast card for a destination
    Card {
        /// Place name to look up
        query: String,

        /// Which search result to use (1-based)
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pick: u32,

        /// Save the card as PNG, to a file or into a directory
        #[arg(long, value_name = "PATH")]
        png: Option<Option<PathBuf>>,

        /// Print the shareable text summary
        #[arg(long)]
        text: bool,

        /// Write the text summary to a file
        #[arg(long, value_name = "PATH")]
        text_out: Option<PathBuf>,
    },

    /// Interactive search-as-you-type session
    Session,
}
