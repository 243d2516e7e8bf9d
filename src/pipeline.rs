//! Roster discovery, log fetch, merge and export, run in sequence

use crate::api::{ApiClient, HttpTransport, Transport};
use crate::config::Config;
use crate::error::Result;
use crate::export::write_rows_to_csv;
use crate::fetch::fetch_game_logs;
use crate::merge::merge_logs;
use crate::roster::discover_active_players;
use chrono::NaiveDate;
use std::path::PathBuf;

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No games on the date, or the schedule could not be read. Nothing written.
    NoActivePlayers,
    Written {
        path: PathBuf,
        rows: usize,
        players: usize,
    },
}

/// Run against the live API
pub fn run(config: &Config, date: NaiveDate) -> Result<Outcome> {
    let transport = HttpTransport::new(config)?;
    let client = ApiClient::new(transport, config.retry.clone());
    run_with(&client, config, date)
}

/// Run with any transport
pub fn run_with<T: Transport>(client: &ApiClient<T>, config: &Config, date: NaiveDate) -> Result<Outcome> {
    let player_ids = discover_active_players(client, config, date);
    if player_ids.is_empty() {
        return Ok(Outcome::NoActivePlayers);
    }

    let logs = fetch_game_logs(client, config, &player_ids);

    println!("Merging datasets...");
    let rows = merge_logs(&logs.standard, &logs.advanced);
    let written = write_rows_to_csv(&rows, &config.output)?;
    println!("Saved {} rows to {}", written, config.output.display());

    Ok(Outcome::Written {
        path: config.output.clone(),
        rows: written,
        players: player_ids.len(),
    })
}
