use std::collections::BTreeMap;

use tracing::debug;

use crate::error::QueryResult;
use crate::model::{Appearance, LEADERBOARD_SIZE, PlayerStanding, asc_nulls_last, ratio_2dp};
use crate::store::StatsStore;

#[derive(Debug, Clone, Default)]
struct PlayerTotals {
    name: String,
    team_name: String,
    goals: u32,
    assists: u32,
    minutes: u64,
}

/// Ranks goal contributors (goals + assists) over one season.
pub struct PlayerLeaderboard<'a> {
    store: &'a dyn StatsStore,
}

impl<'a> PlayerLeaderboard<'a> {
    pub fn new(store: &'a dyn StatsStore) -> Self {
        Self { store }
    }

    pub fn top_players(&self, season: &str) -> QueryResult<Vec<PlayerStanding>> {
        let appearances = self.store.season_appearances(season)?;
        let mut standings = compute_player_standings(&appearances);
        debug!(season, contributors = standings.len(), "computed player standings");
        rank_player_standings(&mut standings);
        standings.truncate(LEADERBOARD_SIZE);
        Ok(standings)
    }
}

/// Sums appearances per (player, team). A player who moved clubs mid-season
/// gets one row per club. Pairs with no goal and no assist are dropped.
pub fn compute_player_standings(appearances: &[Appearance]) -> Vec<PlayerStanding> {
    let mut totals: BTreeMap<(i64, i64), PlayerTotals> = BTreeMap::new();
    for a in appearances {
        let entry = totals
            .entry((a.player_id, a.team_id))
            .or_insert_with(|| PlayerTotals {
                name: a.player_name.clone(),
                team_name: a.team_name.clone(),
                ..PlayerTotals::default()
            });
        entry.goals = entry.goals.saturating_add(a.goals);
        entry.assists = entry.assists.saturating_add(a.assists);
        entry.minutes = entry.minutes.saturating_add(u64::from(a.minutes));
    }

    totals
        .into_iter()
        .filter(|(_, t)| t.goals > 0 || t.assists > 0)
        .map(|((player_id, team_id), t)| {
            let points = t.goals.saturating_add(t.assists);
            PlayerStanding {
                player_id,
                name: t.name,
                team_id,
                team_name: t.team_name,
                total_points: points,
                total_goals: t.goals,
                total_assists: t.assists,
                avg_minutes_per_point: ratio_2dp(t.minutes, u64::from(points)),
                avg_minutes_per_goal: ratio_2dp(t.minutes, u64::from(t.goals)),
            }
        })
        .collect()
}

/// Points, goals, assists (all desc), then minutes per point and minutes per
/// goal (asc, missing last), then player and team id.
pub fn rank_player_standings(standings: &mut [PlayerStanding]) {
    standings.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| b.total_goals.cmp(&a.total_goals))
            .then_with(|| b.total_assists.cmp(&a.total_assists))
            .then_with(|| asc_nulls_last(a.avg_minutes_per_point, b.avg_minutes_per_point))
            .then_with(|| asc_nulls_last(a.avg_minutes_per_goal, b.avg_minutes_per_goal))
            .then_with(|| a.player_id.cmp(&b.player_id))
            .then_with(|| a.team_id.cmp(&b.team_id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(player: i64, team: i64, goals: u32, assists: u32, minutes: u32) -> Appearance {
        Appearance {
            player_id: player,
            player_name: format!("P{player}"),
            team_id: team,
            team_name: format!("T{team}"),
            goals,
            assists,
            minutes,
        }
    }

    #[test]
    fn sums_per_player_and_team() {
        let rows = compute_player_standings(&[
            app(1, 10, 1, 0, 90),
            app(1, 10, 0, 2, 45),
            app(1, 20, 1, 0, 30),
        ]);
        assert_eq!(rows.len(), 2);
        let first = &rows[0];
        assert_eq!((first.player_id, first.team_id), (1, 10));
        assert_eq!(first.total_points, 3);
        assert_eq!(first.avg_minutes_per_point, Some(45.0));
        assert_eq!(first.avg_minutes_per_goal, Some(135.0));
    }

    #[test]
    fn assist_only_player_has_no_minutes_per_goal() {
        let rows = compute_player_standings(&[app(5, 1, 0, 1, 70)]);
        assert_eq!(rows[0].avg_minutes_per_goal, None);
        assert_eq!(rows[0].avg_minutes_per_point, Some(70.0));
    }

    #[test]
    fn absurd_totals_saturate() {
        let rows = compute_player_standings(&[
            app(3, 1, u32::MAX, 0, 90),
            app(3, 1, 1, u32::MAX, 90),
        ]);
        assert_eq!(rows[0].total_goals, u32::MAX);
        assert_eq!(rows[0].total_assists, u32::MAX);
        assert_eq!(rows[0].total_points, u32::MAX);
    }
}
