use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDateTime};
use tracing::{debug, warn};

use crate::error::{QueryError, QueryResult};
use crate::model::{
    LeagueSummary, MatchListing, MatchRow, MatchSummary, league_icon_url, team_icon_url,
};
use crate::pagination::PageWindow;
use crate::store::StatsStore;

const KICKOFF_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Pages through one league's matches for a season.
pub struct MatchListingQuery<'a> {
    store: &'a dyn StatsStore,
}

impl<'a> MatchListingQuery<'a> {
    pub fn new(store: &'a dyn StatsStore) -> Self {
        Self { store }
    }

    /// Fails with `NotFound` when the league does not exist. An existing league
    /// with no matches on this page gives an empty list.
    pub fn list(&self, league_id: i64, season: &str, page: PageWindow) -> QueryResult<MatchListing> {
        let rows = self
            .store
            .league_matches(league_id, season, page.limit, page.offset)?;
        let Some(league) = self.store.league(league_id)? else {
            warn!(league_id, "league not found");
            return Err(QueryError::not_found(format!("league {league_id}")));
        };

        let matches = rows
            .iter()
            .map(summarize_match)
            .collect::<Result<Vec<_>>>()?;
        debug!(
            league_id,
            season,
            limit = page.limit,
            offset = page.offset,
            matches = matches.len(),
            "listed league matches"
        );

        Ok(MatchListing {
            league: LeagueSummary {
                icon_url: league_icon_url(league.id),
                id: league.id,
                name: league.name,
            },
            matches,
        })
    }
}

pub fn summarize_match(row: &MatchRow) -> Result<MatchSummary> {
    let kickoff = parse_kickoff(&row.kickoff)?;
    Ok(MatchSummary {
        id: row.id,
        date: kickoff.format("%Y-%m-%d").to_string(),
        time: kickoff.format("%H:%M").to_string(),
        home_team: row.home_team.clone(),
        away_team: row.away_team.clone(),
        home_score: row.home_score,
        away_score: row.away_score,
        home_icon_url: team_icon_url(row.home_team_id),
        away_icon_url: team_icon_url(row.away_team_id),
    })
}

/// Kickoffs are stored as ISO-8601 text; an explicit offset is ignored and
/// the wall-clock time as written is kept.
pub fn parse_kickoff(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_local());
    }
    KICKOFF_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| anyhow!("unparseable match kickoff {raw:?}"))
}
