//! Join standard and advanced stat lines into output rows

use crate::api::{AdvancedStatLine, Minutes, StatLine};
use serde::Serialize;
use std::collections::HashMap;

/// Games dated after this belong to the 2025 season. Compared as strings.
pub const SEASON_CUTOFF: &str = "2024-09-01";
pub const CURRENT_SEASON: u32 = 2025;
pub const PREVIOUS_SEASON: u32 = 2024;

/// Minutes values meaning the player did not play
const DNP_MINUTES: [&str; 4] = ["0", "00", "0:00", ""];

/// One player-game in the exported feed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Season")]
    pub season: u32,
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Loc")]
    pub loc: Location,
    #[serde(rename = "Opp_ID")]
    pub opp_id: u64,
    #[serde(rename = "MIN")]
    pub min: f64,
    #[serde(rename = "PTS")]
    pub pts: u32,
    #[serde(rename = "REB")]
    pub reb: u32,
    #[serde(rename = "AST")]
    pub ast: u32,
    #[serde(rename = "STL")]
    pub stl: u32,
    #[serde(rename = "BLK")]
    pub blk: u32,
    #[serde(rename = "TOV")]
    pub tov: u32,
    #[serde(rename = "PRA")]
    pub pra: u32,
    #[serde(rename = "PR")]
    pub pr: u32,
    #[serde(rename = "PA")]
    pub pa: u32,
    #[serde(rename = "Stocks")]
    pub stocks: u32,
    #[serde(rename = "Usage")]
    pub usage: f64,
    #[serde(rename = "DefRtg")]
    pub def_rtg: Option<f64>,
    #[serde(rename = "NetRtg")]
    pub net_rtg: Option<f64>,
    #[serde(rename = "Pace")]
    pub pace: Option<f64>,
}

/// CSV header, in column order
pub const COLUMNS: [&str; 21] = [
    "Date", "Season", "Player", "Team", "Loc", "Opp_ID", "MIN", "PTS", "REB", "AST", "STL", "BLK",
    "TOV", "PRA", "PR", "PA", "Stocks", "Usage", "DefRtg", "NetRtg", "Pace",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Location {
    Home,
    Away,
}

/// True when the minutes field marks a did-not-play line
pub fn is_dnp(min: Option<&str>) -> bool {
    match min {
        None => true,
        Some(m) => DNP_MINUTES.contains(&m),
    }
}

/// "MM:SS" or a plain number. Unparseable input counts as zero minutes.
pub fn parse_minutes(min: &str) -> f64 {
    let parsed = if min.contains(':') {
        let mut parts = min.split(':');
        let minutes = parts.next().and_then(|m| m.trim().parse::<i64>().ok());
        let seconds = parts.next().and_then(|s| s.trim().parse::<i64>().ok());
        match (minutes, seconds) {
            (Some(m), Some(s)) => Some(m as f64 + s as f64 / 60.0),
            _ => None,
        }
    } else {
        min.trim().parse::<f64>().ok()
    };
    parsed.unwrap_or(0.0)
}

/// Season label for a game date such as "2024-10-22"
pub fn season_for(date: &str) -> u32 {
    if date > SEASON_CUTOFF {
        CURRENT_SEASON
    } else {
        PREVIOUS_SEASON
    }
}

/// Round to `decimals` places, ties to even
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Build the output row for one standard line, or `None` for a DNP
pub fn build_row(line: &StatLine, advanced: Option<&AdvancedStatLine>) -> Option<OutputRow> {
    // a numeric zero is a real value; only text sentinels mean DNP
    let minutes = match &line.min {
        None => return None,
        Some(Minutes::Text(m)) if is_dnp(Some(m.as_str())) => return None,
        Some(Minutes::Text(m)) => parse_minutes(m),
        Some(Minutes::Number(n)) => *n,
    };

    let game = &line.game;
    let is_home = line.team.id == game.home_team_id;
    let opp_id = if is_home {
        game.visitor_team_id
    } else {
        game.home_team_id
    };

    let pts = line.pts.unwrap_or(0);
    let reb = line.reb.unwrap_or(0);
    let ast = line.ast.unwrap_or(0);
    let stl = line.stl.unwrap_or(0);
    let blk = line.blk.unwrap_or(0);

    let usage_pct = advanced.and_then(|a| a.usage_percentage).unwrap_or(0.0);

    Some(OutputRow {
        date: game.date.get(..10).unwrap_or(&game.date).to_string(),
        season: season_for(&game.date),
        player: line.player.full_name(),
        team: line.team.abbreviation.clone(),
        loc: if is_home { Location::Home } else { Location::Away },
        opp_id,
        min: round_to(minutes, 2),
        pts,
        reb,
        ast,
        stl,
        blk,
        tov: line.turnover.unwrap_or(0),
        pra: pts + reb + ast,
        pr: pts + reb,
        pa: pts + ast,
        stocks: stl + blk,
        usage: round_to(usage_pct * 100.0, 1),
        def_rtg: advanced.and_then(|a| a.defensive_rating),
        net_rtg: advanced.and_then(|a| a.net_rating),
        pace: advanced.and_then(|a| a.pace),
    })
}

/// Date descending, then player name ascending. Stable for ties.
pub fn sort_rows(rows: &mut [OutputRow]) {
    rows.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.player.cmp(&b.player)));
}

/// Join on (player id, game id), drop DNPs, derive combos and sort.
pub fn merge_logs(standard: &[StatLine], advanced: &[AdvancedStatLine]) -> Vec<OutputRow> {
    // later lines win for a repeated key
    let by_key: HashMap<(u64, u64), &AdvancedStatLine> = advanced
        .iter()
        .map(|a| ((a.player.id, a.game.id), a))
        .collect();

    let mut rows: Vec<OutputRow> = standard
        .iter()
        .filter_map(|s| build_row(s, by_key.get(&(s.player.id, s.game.id)).copied()))
        .collect();

    log::info!(
        "Merged {} rows from {} standard lines ({} DNP)",
        rows.len(),
        standard.len(),
        standard.len() - rows.len()
    );

    sort_rows(&mut rows);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{GameRecord, IdRef, PlayerRecord, TeamRecord};

    fn line(player: u64, game: u64, date: &str, min: Option<&str>) -> StatLine {
        StatLine {
            player: PlayerRecord {
                id: player,
                first_name: "Player".to_string(),
                last_name: player.to_string(),
            },
            team: TeamRecord {
                id: 10,
                abbreviation: "BOS".to_string(),
            },
            game: GameRecord {
                id: game,
                date: date.to_string(),
                home_team_id: 10,
                visitor_team_id: 20,
            },
            min: min.map(|m| Minutes::Text(m.to_string())),
            pts: Some(20),
            reb: Some(5),
            ast: Some(7),
            stl: Some(1),
            blk: Some(0),
            turnover: Some(3),
        }
    }

    fn adv(player: u64, game: u64, usage: Option<f64>, def: Option<f64>) -> AdvancedStatLine {
        AdvancedStatLine {
            player: IdRef { id: player },
            game: IdRef { id: game },
            usage_percentage: usage,
            defensive_rating: def,
            net_rating: Some(4.5),
            pace: Some(99.1),
        }
    }

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_minutes("35:30"), 35.5);
        assert_eq!(parse_minutes("0:45"), 0.75);
        assert_eq!(parse_minutes("32"), 32.0);
        assert_eq!(parse_minutes("28.5"), 28.5);
        assert_eq!(parse_minutes("garbage"), 0.0);
        assert_eq!(parse_minutes("12:xx"), 0.0);
        assert_eq!(parse_minutes(":"), 0.0);
    }

    #[test]
    fn test_dnp_sentinels() {
        assert!(is_dnp(None));
        for m in ["0", "00", "0:00", ""] {
            assert!(is_dnp(Some(m)), "{:?} should be DNP", m);
        }
        assert!(!is_dnp(Some("0:01")));
        assert!(!is_dnp(Some("12")));
    }

    #[test]
    fn test_season_boundary_is_string_comparison() {
        assert_eq!(season_for("2024-10-22"), 2025);
        assert_eq!(season_for("2024-09-02"), 2025);
        assert_eq!(season_for("2024-09-01"), 2024);
        assert_eq!(season_for("2024-04-14"), 2024);
        // a time suffix sorts after the bare cutoff date
        assert_eq!(season_for("2024-09-01T00:00:00.000Z"), 2025);
    }

    #[test]
    fn test_home_game_without_advanced_match() {
        let row = build_row(&line(1, 100, "2025-01-10", Some("35:30")), None).unwrap();
        assert_eq!(row.min, 35.5);
        assert_eq!(row.pra, 32);
        assert_eq!(row.pr, 25);
        assert_eq!(row.pa, 27);
        assert_eq!(row.stocks, 1);
        assert_eq!(row.tov, 3);
        assert_eq!(row.usage, 0.0);
        assert_eq!(row.def_rtg, None);
        assert_eq!(row.net_rtg, None);
        assert_eq!(row.pace, None);
        assert_eq!(row.loc, Location::Home);
        assert_eq!(row.opp_id, 20);
        assert_eq!(row.season, 2025);
        assert_eq!(row.player, "Player 1");
        assert_eq!(row.team, "BOS");
    }

    #[test]
    fn test_away_game_opponent_is_home_team() {
        let mut s = line(1, 100, "2025-01-10", Some("20:00"));
        s.team.id = 20;
        let row = build_row(&s, None).unwrap();
        assert_eq!(row.loc, Location::Away);
        assert_eq!(row.opp_id, 10);
    }

    #[test]
    fn test_zero_minutes_dropped() {
        let mut s = line(1, 100, "2025-01-10", Some("0:00"));
        s.pts = Some(40);
        assert!(build_row(&s, Some(&adv(1, 100, Some(0.3), None))).is_none());
        assert!(build_row(&line(1, 100, "2025-01-10", None), None).is_none());
    }

    #[test]
    fn test_unparseable_minutes_kept_as_zero() {
        let row = build_row(&line(1, 100, "2025-01-10", Some("DNP-CD?")), None).unwrap();
        assert_eq!(row.min, 0.0);
    }

    #[test]
    fn test_missing_counts_are_zero() {
        let mut s = line(1, 100, "2025-01-10", Some("10:00"));
        s.pts = None;
        s.blk = None;
        s.turnover = None;
        let row = build_row(&s, None).unwrap();
        assert_eq!(row.pts, 0);
        assert_eq!(row.pra, 12);
        assert_eq!(row.pr, 5);
        assert_eq!(row.pa, 7);
        assert_eq!(row.stocks, 1);
        assert_eq!(row.tov, 0);
    }

    #[test]
    fn test_usage_and_ratings_from_advanced() {
        let row = build_row(
            &line(1, 100, "2025-01-10T00:00:00.000Z", Some("30")),
            Some(&adv(1, 100, Some(0.2876), Some(108.3))),
        )
        .unwrap();
        assert_eq!(row.usage, 28.8);
        assert_eq!(row.def_rtg, Some(108.3));
        assert_eq!(row.net_rtg, Some(4.5));
        assert_eq!(row.pace, Some(99.1));
        assert_eq!(row.date, "2025-01-10");

        let row = build_row(&line(1, 100, "2025-01-10", Some("30")), Some(&adv(1, 100, None, None))).unwrap();
        assert_eq!(row.usage, 0.0);
        assert_eq!(row.def_rtg, None);
    }

    #[test]
    fn test_rounding_ties_go_to_even() {
        assert_eq!(round_to(parse_minutes("28.125"), 2), 28.12);
        assert_eq!(round_to(parse_minutes("28.375"), 2), 28.38);
        assert_eq!(round_to(0.25 * 100.0, 1), 25.0);
        assert_eq!(round_to(12.25, 1), 12.2);

        let row = build_row(&line(1, 100, "2025-01-10", Some("28.125")), None).unwrap();
        assert_eq!(row.min, 28.12);
    }

    #[test]
    fn test_numeric_minutes_are_not_dnp() {
        let mut s = line(1, 100, "2025-01-10", None);
        s.min = Some(Minutes::Number(0.0));
        let row = build_row(&s, None).unwrap();
        assert_eq!(row.min, 0.0);
        assert_eq!(row.pra, 32);

        s.min = Some(Minutes::Number(33.5));
        assert_eq!(build_row(&s, None).unwrap().min, 33.5);
    }

    #[test]
    fn test_minutes_rounded_to_two_places() {
        let row = build_row(&line(1, 100, "2025-01-10", Some("10:01")), None).unwrap();
        assert_eq!(row.min, 10.02);
    }

    #[test]
    fn test_join_is_exact_and_last_advanced_wins() {
        let standard = vec![
            line(1, 100, "2025-01-10", Some("30:00")),
            line(2, 100, "2025-01-10", Some("30:00")),
            line(1, 101, "2025-01-12", Some("30:00")),
        ];
        let advanced = vec![
            adv(1, 100, Some(0.10), None),
            adv(1, 100, Some(0.25), None),
            // same game, different player
            adv(3, 100, Some(0.50), None),
            // same player, different game
            adv(2, 101, Some(0.40), None),
        ];

        let rows = merge_logs(&standard, &advanced);
        assert_eq!(rows.len(), 3);
        let usage: Vec<(String, String, f64)> = rows
            .iter()
            .map(|r| (r.date.clone(), r.player.clone(), r.usage))
            .collect();
        assert_eq!(
            usage,
            vec![
                ("2025-01-12".to_string(), "Player 1".to_string(), 0.0),
                ("2025-01-10".to_string(), "Player 1".to_string(), 25.0),
                ("2025-01-10".to_string(), "Player 2".to_string(), 0.0),
            ]
        );
    }

    #[test]
    fn test_sort_date_desc_then_player_asc() {
        let mut standard = Vec::new();
        for (player, date) in [(3, "2025-01-01"), (1, "2025-01-03"), (2, "2025-01-01"), (1, "2025-01-01")] {
            standard.push(line(player, 100, date, Some("12:00")));
        }
        let rows = merge_logs(&standard, &[]);
        let order: Vec<(&str, &str)> = rows.iter().map(|r| (r.date.as_str(), r.player.as_str())).collect();
        assert_eq!(
            order,
            vec![
                ("2025-01-03", "Player 1"),
                ("2025-01-01", "Player 1"),
                ("2025-01-01", "Player 2"),
                ("2025-01-01", "Player 3"),
            ]
        );
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut a = line(1, 100, "2025-01-01", Some("12:00"));
        a.pts = Some(1);
        let mut b = line(1, 101, "2025-01-01", Some("12:00"));
        b.pts = Some(2);
        let rows = merge_logs(&[a, b], &[]);
        assert_eq!(rows[0].pts, 1);
        assert_eq!(rows[1].pts, 2);
    }

    #[test]
    fn test_combos_hold_for_every_row() {
        let standard: Vec<StatLine> = (0..20u32)
            .map(|i| {
                let mut s = line(i as u64, 100 + i as u64, "2025-02-01", Some("20:00"));
                s.pts = Some(i * 3);
                s.reb = if i % 3 == 0 { None } else { Some(i) };
                s.ast = Some(i % 5);
                s.stl = Some(i % 2);
                s.blk = if i % 4 == 0 { None } else { Some(1) };
                s
            })
            .collect();
        for row in merge_logs(&standard, &[]) {
            assert_eq!(row.pra, row.pts + row.reb + row.ast);
            assert_eq!(row.pr, row.pts + row.reb);
            assert_eq!(row.pa, row.pts + row.ast);
            assert_eq!(row.stocks, row.stl + row.blk);
        }
    }
}
