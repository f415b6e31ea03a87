use std::cmp::Ordering;

use serde::Serialize;

const LEAGUE_ICON_URL: &str = "https://media.api-sports.io/football/leagues";
const TEAM_ICON_URL: &str = "https://media.api-sports.io/football/teams";

/// Maximum number of rows returned by the leaderboards.
pub const LEADERBOARD_SIZE: usize = 10;

pub fn league_icon_url(league_id: i64) -> String {
    format!("{LEAGUE_ICON_URL}/{league_id}.png")
}

pub fn team_icon_url(team_id: i64) -> String {
    format!("{TEAM_ICON_URL}/{team_id}.png")
}

// Rows as read from storage.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct League {
    pub id: i64,
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: i64,
    pub name: String,
}

/// A match joined with both teams, as returned for a league listing page.
#[derive(Debug, Clone)]
pub struct MatchRow {
    pub id: i64,
    pub kickoff: String,
    pub home_team_id: i64,
    pub home_team: String,
    pub away_team_id: i64,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub home_score: u32,
    pub away_score: u32,
}

/// One lineup row (player, team, match) with the names already joined in.
#[derive(Debug, Clone)]
pub struct Appearance {
    pub player_id: i64,
    pub player_name: String,
    pub team_id: i64,
    pub team_name: String,
    pub goals: u32,
    pub assists: u32,
    pub minutes: u32,
}

// Derived results handed to the dispatcher.

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueEntry {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub icon_url: String,
}

impl From<League> for LeagueEntry {
    fn from(league: League) -> Self {
        Self {
            icon_url: league_icon_url(league.id),
            id: league.id,
            name: league.name,
            country: league.country,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonEntry {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueSummary {
    pub id: i64,
    pub name: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub id: i64,
    pub date: String,
    pub time: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    pub home_icon_url: String,
    pub away_icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchListing {
    pub league: LeagueSummary,
    pub matches: Vec<MatchSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStanding {
    pub id: i64,
    pub name: String,
    pub matches_played: u32,
    #[serde(rename = "avg_points")]
    pub avg_points_per_game: Option<f64>,
    pub avg_goals_for: Option<f64>,
    pub avg_goals_against: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopTeams {
    pub season: String,
    pub teams: Vec<TeamStanding>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStanding {
    pub player_id: i64,
    pub name: String,
    pub team_id: i64,
    pub team_name: String,
    pub total_points: u32,
    pub total_goals: u32,
    pub total_assists: u32,
    #[serde(rename = "avg_points")]
    pub avg_minutes_per_point: Option<f64>,
    #[serde(rename = "avg_goal")]
    pub avg_minutes_per_goal: Option<f64>,
}

/// `numerator / denominator` rounded half away from zero to two decimals.
///
/// Computed in integer hundredths so values like 1.005 do not drift; `None`
/// when the denominator is zero.
pub fn ratio_2dp(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator == 0 {
        return None;
    }
    let scaled = numerator.saturating_mul(200).saturating_add(denominator) / (2 * denominator);
    Some(scaled as f64 / 100.0)
}

/// Descending by value; a missing value sorts after every present one.
pub fn desc_nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Ascending by value; a missing value sorts after every present one.
pub fn asc_nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
