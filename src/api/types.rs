//! Response shapes for the balldontlie v1 endpoints

use serde::{Deserialize, Deserializer};
use std::fmt;

/// One page of a cursor-paginated listing
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Meta,
}

#[derive(Debug, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub next_cursor: Option<Cursor>,
}

/// Opaque continuation token; the API currently sends integers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Cursor {
    Number(u64),
    Text(String),
}

impl Cursor {
    /// An empty or zero cursor marks the last page, same as no cursor
    pub fn is_terminal(&self) -> bool {
        match self {
            Cursor::Number(n) => *n == 0,
            Cursor::Text(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cursor::Number(n) => write!(f, "{}", n),
            Cursor::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub struct IdRef {
    pub id: u64,
}

/// Entry from `/games`
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduledGame {
    pub id: u64,
    #[serde(default)]
    pub date: String,
    pub home_team: IdRef,
    pub visitor_team: IdRef,
}

/// Game as embedded in a stat line
#[derive(Debug, Clone, Deserialize)]
pub struct GameRecord {
    pub id: u64,
    pub date: String,
    pub home_team_id: u64,
    pub visitor_team_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamRecord {
    pub id: u64,
    #[serde(default)]
    pub abbreviation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerRecord {
    pub id: u64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl PlayerRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Box-score line from `/stats`
#[derive(Debug, Clone, Deserialize)]
pub struct StatLine {
    pub player: PlayerRecord,
    pub team: TeamRecord,
    pub game: GameRecord,
    #[serde(default, deserialize_with = "minutes_field")]
    pub min: Option<Minutes>,
    #[serde(default)]
    pub pts: Option<u32>,
    #[serde(default)]
    pub reb: Option<u32>,
    #[serde(default)]
    pub ast: Option<u32>,
    #[serde(default)]
    pub stl: Option<u32>,
    #[serde(default)]
    pub blk: Option<u32>,
    #[serde(default)]
    pub turnover: Option<u32>,
}

/// Line from `/stats/advanced`
#[derive(Debug, Clone, Deserialize)]
pub struct AdvancedStatLine {
    pub player: IdRef,
    pub game: IdRef,
    #[serde(default)]
    pub usage_percentage: Option<f64>,
    #[serde(default)]
    pub defensive_rating: Option<f64>,
    #[serde(default)]
    pub net_rating: Option<f64>,
    #[serde(default)]
    pub pace: Option<f64>,
}

/// Minutes as sent: usually text ("35:12", "35", ""), sometimes a bare number
#[derive(Debug, Clone, PartialEq)]
pub enum Minutes {
    Text(String),
    Number(f64),
}

fn minutes_field<'de, D>(deserializer: D) -> std::result::Result<Option<Minutes>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(Minutes::Text(s)),
        Some(serde_json::Value::Number(n)) => Some(Minutes::Number(n.as_f64().unwrap_or(0.0))),
        Some(other) => Some(Minutes::Text(other.to_string())),
    })
}
