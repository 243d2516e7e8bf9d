use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;

use nba_game_feed::config::{DEFAULT_BASE_URL, DEFAULT_OUTPUT, DEFAULT_SEASONS};
use nba_game_feed::{Config, FeedError, Outcome};

#[derive(Parser)]
#[command(name = "nba-game-feed")]
#[command(about = "Build a CSV of NBA game logs for players on today's active rosters", long_about = None)]
struct Cli {
    /// API key sent as the Authorization header.
    /// Set via API_KEY env var to avoid exposing in shell history.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Output CSV file (overwritten)
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Seasons to fetch
    #[arg(long, default_values_t = DEFAULT_SEASONS, value_delimiter = ',')]
    seasons: Vec<u32>,

    /// Schedule date to scan (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// API base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let api_key = cli.api_key.ok_or(FeedError::MissingCredential)?;
    let config = Config::new(api_key)?
        .with_base_url(&cli.base_url)?
        .with_seasons(cli.seasons)?
        .with_output(cli.output);

    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());

    match nba_game_feed::run(&config, date).context("Feed generation failed")? {
        Outcome::NoActivePlayers => {
            println!("No active players for {}; nothing written.", date);
        }
        Outcome::Written { path, rows, players } => {
            println!("Done! {} rows for {} players in {}", rows, players, path.display());
        }
    }

    Ok(())
}
