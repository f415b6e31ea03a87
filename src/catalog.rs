use crate::error::QueryResult;
use crate::model::{LeagueEntry, SeasonEntry};
use crate::season::season_label;
use crate::store::StatsStore;

pub fn list_leagues(store: &dyn StatsStore) -> QueryResult<Vec<LeagueEntry>> {
    let leagues = store.leagues()?;
    Ok(leagues.into_iter().map(LeagueEntry::from).collect())
}

/// Every known season, newest first, with its display label.
pub fn list_seasons(store: &dyn StatsStore) -> QueryResult<Vec<SeasonEntry>> {
    let seasons = store.seasons()?;
    Ok(seasons
        .into_iter()
        .map(|value| SeasonEntry {
            label: season_label(&value),
            value,
        })
        .collect())
}
