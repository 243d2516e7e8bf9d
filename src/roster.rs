//! Today's active players: schedule lookup followed by per-team rosters

use crate::api::{ApiClient, PlayerRecord, ScheduledGame, Transport};
use crate::config::Config;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Teams appearing on the schedule, home or away
pub fn teams_playing(games: &[ScheduledGame]) -> BTreeSet<u64> {
    games
        .iter()
        .flat_map(|g| [g.home_team.id, g.visitor_team.id])
        .collect()
}

/// Player ids for every team with a game on `date`, deduplicated and sorted.
///
/// Returns an empty list on an off day or when the schedule can't be read.
/// A team whose roster fails part way keeps the players already collected.
pub fn discover_active_players<T: Transport>(
    client: &ApiClient<T>,
    config: &Config,
    date: NaiveDate,
) -> Vec<u64> {
    println!("Scanning schedule for {}...", date);

    let query = vec![("dates[]".to_string(), date.format("%Y-%m-%d").to_string())];
    let games = match client.get_page::<ScheduledGame>("games", &query, None) {
        Ok(page) => page.data,
        Err(e) => {
            println!("  Error: failed to fetch schedule: {}", e);
            log::warn!("Schedule fetch for {} failed: {:?}", date, e);
            return Vec::new();
        }
    };

    if games.is_empty() {
        println!("  No games found today.");
        return Vec::new();
    }

    let team_ids = teams_playing(&games);
    println!(
        "  {} games; fetching active rosters for {} teams...",
        games.len(),
        team_ids.len()
    );

    let mut active = BTreeSet::new();
    for team_id in &team_ids {
        let query = vec![
            ("team_ids[]".to_string(), team_id.to_string()),
            ("per_page".to_string(), config.per_page.to_string()),
        ];
        let roster = client.paginate::<PlayerRecord>("players", &query, config.roster_delay);
        if let Some(e) = &roster.error {
            log::warn!(
                "Roster for team {} stopped after {} pages ({} players kept): {}",
                team_id,
                roster.pages,
                roster.items.len(),
                e
            );
        }
        log::debug!("Team {}: {} players", team_id, roster.items.len());
        active.extend(roster.items.iter().map(|p| p.id));
    }

    println!("  Identified {} active players.", active.len());
    active.into_iter().collect()
}
