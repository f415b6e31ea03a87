use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::debug;

use crate::error::QueryResult;
use crate::model::{
    LEADERBOARD_SIZE, MatchResult, Team, TeamStanding, TopTeams, asc_nulls_last, desc_nulls_last,
    ratio_2dp,
};
use crate::store::StatsStore;

/// Season totals for one team before averaging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamTotals {
    pub matches_played: u32,
    pub points: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl TeamTotals {
    fn record(&mut self, own: u32, opponent: u32) {
        let points = match own.cmp(&opponent) {
            Ordering::Greater => 3,
            Ordering::Equal => 1,
            Ordering::Less => 0,
        };
        self.matches_played = self.matches_played.saturating_add(1);
        self.points = self.points.saturating_add(points);
        self.goals_for = self.goals_for.saturating_add(own);
        self.goals_against = self.goals_against.saturating_add(opponent);
    }
}

/// Ranks every team of a season by points per game.
pub struct TeamLeaderboard<'a> {
    store: &'a dyn StatsStore,
}

impl<'a> TeamLeaderboard<'a> {
    pub fn new(store: &'a dyn StatsStore) -> Self {
        Self { store }
    }

    /// Top teams for `season`. An unknown season is not an error: every team
    /// simply has no matches.
    pub fn top_teams(&self, season: &str) -> QueryResult<TopTeams> {
        let teams = self.store.teams()?;
        let results = self.store.season_results(season)?;

        let mut standings = compute_team_standings(&teams, &results);
        debug!(season, teams = standings.len(), matches = results.len(), "computed team standings");
        rank_team_standings(&mut standings);
        standings.truncate(LEADERBOARD_SIZE);

        Ok(TopTeams {
            season: season.to_string(),
            teams: standings,
        })
    }
}

/// Accumulates points and goals per team id. Matches involving unknown team
/// ids are still counted under those ids.
pub fn accumulate_team_totals(results: &[MatchResult]) -> BTreeMap<i64, TeamTotals> {
    let mut totals: BTreeMap<i64, TeamTotals> = BTreeMap::new();
    for m in results {
        totals
            .entry(m.home_team_id)
            .or_default()
            .record(m.home_score, m.away_score);
        if m.away_team_id != m.home_team_id {
            totals
                .entry(m.away_team_id)
                .or_default()
                .record(m.away_score, m.home_score);
        }
    }
    totals
}

/// One unranked standing per team, including teams without any match.
pub fn compute_team_standings(teams: &[Team], results: &[MatchResult]) -> Vec<TeamStanding> {
    let totals = accumulate_team_totals(results);
    teams
        .iter()
        .map(|team| {
            let t = totals.get(&team.id).copied().unwrap_or_default();
            let played = u64::from(t.matches_played);
            TeamStanding {
                id: team.id,
                name: team.name.clone(),
                matches_played: t.matches_played,
                avg_points_per_game: ratio_2dp(u64::from(t.points), played),
                avg_goals_for: ratio_2dp(u64::from(t.goals_for), played),
                avg_goals_against: ratio_2dp(u64::from(t.goals_against), played),
            }
        })
        .collect()
}

/// Points per game desc, goals for desc, goals against asc; then team id.
/// Missing averages always sort after present ones.
pub fn rank_team_standings(standings: &mut [TeamStanding]) {
    standings.sort_by(|a, b| {
        desc_nulls_last(a.avg_points_per_game, b.avg_points_per_game)
            .then_with(|| desc_nulls_last(a.avg_goals_for, b.avg_goals_for))
            .then_with(|| asc_nulls_last(a.avg_goals_against, b.avg_goals_against))
            .then_with(|| a.id.cmp(&b.id))
    });
}
