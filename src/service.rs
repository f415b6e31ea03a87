use std::sync::Arc;

use crate::catalog;
use crate::error::QueryResult;
use crate::match_listing::MatchListingQuery;
use crate::model::{LeagueEntry, MatchListing, PlayerStanding, SeasonEntry, TopTeams};
use crate::pagination::resolve_page;
use crate::player_leaderboard::PlayerLeaderboard;
use crate::store::StatsStore;
use crate::team_leaderboard::TeamLeaderboard;

/// The five read operations exposed to a request dispatcher.
///
/// Holds no state besides the store handle, so one instance can be shared
/// across threads.
#[derive(Clone)]
pub struct StatsService {
    store: Arc<dyn StatsStore>,
}

impl StatsService {
    pub fn new(store: Arc<dyn StatsStore>) -> Self {
        Self { store }
    }

    pub fn list_leagues(&self) -> QueryResult<Vec<LeagueEntry>> {
        catalog::list_leagues(self.store.as_ref())
    }

    pub fn list_seasons(&self) -> QueryResult<Vec<SeasonEntry>> {
        catalog::list_seasons(self.store.as_ref())
    }

    /// `page` and `limit` are the raw request values; see [`resolve_page`].
    pub fn list_matches(
        &self,
        league_id: i64,
        season: &str,
        page: Option<&str>,
        limit: Option<&str>,
    ) -> QueryResult<MatchListing> {
        let window = resolve_page(page, limit);
        MatchListingQuery::new(self.store.as_ref()).list(league_id, season, window)
    }

    pub fn top_teams(&self, season: &str) -> QueryResult<TopTeams> {
        TeamLeaderboard::new(self.store.as_ref()).top_teams(season)
    }

    pub fn top_players(&self, season: &str) -> QueryResult<Vec<PlayerStanding>> {
        PlayerLeaderboard::new(self.store.as_ref()).top_players(season)
    }
}
