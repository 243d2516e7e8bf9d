//! Standard and advanced game logs for a set of players

use crate::api::{AdvancedStatLine, ApiClient, Paged, StatLine, Transport};
use crate::config::Config;
use crate::error::FeedError;
use serde::de::DeserializeOwned;

/// Everything fetched for one run, in fetch order
#[derive(Debug, Default)]
pub struct GameLogs {
    pub standard: Vec<StatLine>,
    pub advanced: Vec<AdvancedStatLine>,
    /// Pagination loops that stopped early
    pub aborted_loops: usize,
}

/// Query for one chunk: every season and every player id as repeated keys
pub fn stats_query(seasons: &[u32], player_ids: &[u64], per_page: u32) -> Vec<(String, String)> {
    let mut query: Vec<(String, String)> = seasons
        .iter()
        .map(|s| ("seasons[]".to_string(), s.to_string()))
        .collect();
    query.extend(player_ids.iter().map(|id| ("player_ids[]".to_string(), id.to_string())));
    query.push(("per_page".to_string(), per_page.to_string()));
    query
}

/// Fetch both stat variants for `player_ids`, `config.chunk_size` ids per request.
pub fn fetch_game_logs<T: Transport>(
    client: &ApiClient<T>,
    config: &Config,
    player_ids: &[u64],
) -> GameLogs {
    let mut logs = GameLogs::default();
    if player_ids.is_empty() {
        return logs;
    }

    let chunk_size = config.chunk_size.max(1);
    let total_chunks = player_ids.len().div_ceil(chunk_size);
    let season_label = config
        .seasons
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    println!("Fetching game logs for seasons {}...", season_label);

    for (idx, chunk) in player_ids.chunks(chunk_size).enumerate() {
        println!("  Processing chunk {}/{}...", idx + 1, total_chunks);
        let query = stats_query(&config.seasons, chunk, config.per_page);

        let standard: Paged<StatLine> = fetch_endpoint(client, config, "stats", &query, idx + 1);
        logs.aborted_loops += usize::from(!standard.is_complete());
        logs.standard.extend(standard.items);

        let advanced: Paged<AdvancedStatLine> =
            fetch_endpoint(client, config, "stats/advanced", &query, idx + 1);
        logs.aborted_loops += usize::from(!advanced.is_complete());
        logs.advanced.extend(advanced.items);
    }

    println!(
        "  Fetched {} standard and {} advanced records.",
        logs.standard.len(),
        logs.advanced.len()
    );
    if logs.aborted_loops > 0 {
        println!(
            "  Warning: {} fetches stopped early; results may be incomplete.",
            logs.aborted_loops
        );
    }

    logs
}

fn fetch_endpoint<T: Transport, R: DeserializeOwned>(
    client: &ApiClient<T>,
    config: &Config,
    path: &str,
    query: &[(String, String)],
    chunk: usize,
) -> Paged<R> {
    let paged = client.paginate::<R>(path, query, config.stats_delay);
    if let Some(e) = &paged.error {
        if matches!(e, FeedError::RetriesExhausted { .. }) {
            log::warn!(
                "Chunk {}: /{} gave up after {} pages, keeping {} records: {}",
                chunk,
                path,
                paged.pages,
                paged.items.len(),
                e
            );
        } else {
            log::warn!(
                "Chunk {}: /{} returned an unusable response after {} pages, keeping {} records: {}",
                chunk,
                path,
                paged.pages,
                paged.items.len(),
                e
            );
        }
    }
    paged
}
