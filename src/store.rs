use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use tracing::{debug, info};

use crate::config::StatsConfig;
use crate::model::{Appearance, League, MatchResult, MatchRow, Team};

/// Read-only access to the results database.
///
/// Implementations must be safe to share between concurrent requests; nothing
/// here ever writes.
pub trait StatsStore: Send + Sync {
    fn leagues(&self) -> Result<Vec<League>>;

    fn league(&self, league_id: i64) -> Result<Option<League>>;

    /// Distinct season identifiers, newest first.
    fn seasons(&self) -> Result<Vec<String>>;

    /// One page of a league's matches for a season, newest kickoff first.
    fn league_matches(
        &self,
        league_id: i64,
        season: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MatchRow>>;

    fn teams(&self) -> Result<Vec<Team>>;

    fn season_results(&self, season: &str) -> Result<Vec<MatchResult>>;

    fn season_appearances(&self, season: &str) -> Result<Vec<Appearance>>;
}

/// SQLite-backed store with a small pool of read-only connections.
pub struct SqliteStore {
    path: PathBuf,
    busy_timeout: Duration,
    pool_size: usize,
    idle: Mutex<Vec<Connection>>,
}

impl SqliteStore {
    pub fn open(config: &StatsConfig) -> Result<Self> {
        let store = Self {
            path: config.db_path.clone(),
            busy_timeout: config.busy_timeout,
            pool_size: config.pool_size.max(1),
            idle: Mutex::new(Vec::new()),
        };
        store
            .with_conn(|conn| {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                    .context("ping sqlite db")
            })
            .with_context(|| format!("open sqlite db {}", store.path.display()))?;
        info!(path = %store.path.display(), "connected to stats db");
        Ok(store)
    }

    fn connect(&self) -> Result<Connection> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_NO_MUTEX
            | OpenFlags::SQLITE_OPEN_URI;
        let conn = Connection::open_with_flags(&self.path, flags)
            .with_context(|| format!("open sqlite db {}", self.path.display()))?;
        conn.busy_timeout(self.busy_timeout)
            .context("set sqlite busy timeout")?;
        Ok(conn)
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let pooled = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        let conn = match pooled {
            Some(conn) => conn,
            None => self.connect()?,
        };

        let out = f(&conn);
        // A connection that just failed a query is dropped rather than reused.
        if out.is_ok() {
            let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
            if idle.len() < self.pool_size {
                idle.push(conn);
            }
        }
        out
    }
}

impl StatsStore for SqliteStore {
    fn leagues(&self) -> Result<Vec<League>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, fullname, country FROM leagues ORDER BY id ASC")
                .context("prepare leagues query")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(League {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        country: row.get(2)?,
                    })
                })
                .context("query leagues")?;
            collect_rows(rows, "decode league row")
        })
    }

    fn league(&self, league_id: i64) -> Result<Option<League>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, fullname, country FROM leagues WHERE id = ?1",
                params![league_id],
                |row| {
                    Ok(League {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        country: row.get(2)?,
                    })
                },
            )
            .optional()
            .context("query league by id")
        })
    }

    fn seasons(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    r#"
                    SELECT season
                    FROM league_seasons
                    GROUP BY season
                    ORDER BY CAST(season AS INTEGER) DESC, season DESC
                    "#,
                )
                .context("prepare seasons query")?;
            let rows = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .context("query seasons")?;
            collect_rows(rows, "decode season row")
        })
    }

    fn league_matches(
        &self,
        league_id: i64,
        season: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MatchRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    r#"
                    SELECT
                        m.id, m.date,
                        home_team.id, home_team.fullname,
                        away_team.id, away_team.fullname,
                        m.home_score, m.away_score
                    FROM matches m
                    JOIN teams home_team ON m.home_team_id = home_team.id
                    JOIN teams away_team ON m.away_team_id = away_team.id
                    WHERE m.league_id = ?1 AND m.season = ?2
                    ORDER BY julianday(m.date) DESC, m.id DESC
                    LIMIT ?3 OFFSET ?4
                    "#,
                )
                .context("prepare league matches query")?;
            let rows = stmt
                .query_map(params![league_id, season, limit, offset], |row| {
                    Ok(MatchRow {
                        id: row.get(0)?,
                        kickoff: row.get(1)?,
                        home_team_id: row.get(2)?,
                        home_team: row.get(3)?,
                        away_team_id: row.get(4)?,
                        away_team: row.get(5)?,
                        home_score: row.get::<_, u32>(6)?,
                        away_score: row.get::<_, u32>(7)?,
                    })
                })
                .context("query league matches")?;
            collect_rows(rows, "decode match row")
        })
    }

    fn teams(&self) -> Result<Vec<Team>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, fullname FROM teams ORDER BY id ASC")
                .context("prepare teams query")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(Team {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                })
                .context("query teams")?;
            collect_rows(rows, "decode team row")
        })
    }

    fn season_results(&self, season: &str) -> Result<Vec<MatchResult>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    r#"
                    SELECT home_team_id, away_team_id, home_score, away_score
                    FROM matches
                    WHERE season = ?1
                    ORDER BY id ASC
                    "#,
                )
                .context("prepare season results query")?;
            let rows = stmt
                .query_map(params![season], |row| {
                    Ok(MatchResult {
                        home_team_id: row.get(0)?,
                        away_team_id: row.get(1)?,
                        home_score: row.get::<_, u32>(2)?,
                        away_score: row.get::<_, u32>(3)?,
                    })
                })
                .context("query season results")?;
            let out = collect_rows(rows, "decode result row")?;
            debug!(season, matches = out.len(), "loaded season results");
            Ok(out)
        })
    }

    fn season_appearances(&self, season: &str) -> Result<Vec<Appearance>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    r#"
                    SELECT
                        p.id, p.fullname,
                        t.id, t.fullname,
                        l.goals, l.assists, l.minutes
                    FROM lineups l
                    JOIN players p ON p.id = l.player_id
                    JOIN matches m ON m.id = l.match_id
                    JOIN teams t ON t.id = l.team_id
                    WHERE m.season = ?1
                    ORDER BY l.match_id ASC, p.id ASC
                    "#,
                )
                .context("prepare season appearances query")?;
            let rows = stmt
                .query_map(params![season], |row| {
                    Ok(Appearance {
                        player_id: row.get(0)?,
                        player_name: row.get(1)?,
                        team_id: row.get(2)?,
                        team_name: row.get(3)?,
                        goals: row.get::<_, u32>(4)?,
                        assists: row.get::<_, u32>(5)?,
                        minutes: row.get::<_, u32>(6)?,
                    })
                })
                .context("query season appearances")?;
            let out = collect_rows(rows, "decode appearance row")?;
            debug!(season, appearances = out.len(), "loaded season appearances");
            Ok(out)
        })
    }
}

fn collect_rows<T>(
    rows: impl Iterator<Item = rusqlite::Result<T>>,
    what: &'static str,
) -> Result<Vec<T>> {
    let mut out = Vec::new();
    for row in rows {
        out.push(row.context(what)?);
    }
    Ok(out)
}

/// Creates the results schema on a writable connection.
///
/// Used to provision local databases and test fixtures; the query service
/// itself only opens read-only connections.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS leagues (
            id INTEGER PRIMARY KEY,
            fullname TEXT NOT NULL,
            country TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS teams (
            id INTEGER PRIMARY KEY,
            fullname TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS players (
            id INTEGER PRIMARY KEY,
            fullname TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS league_seasons (
            league_id INTEGER NOT NULL REFERENCES leagues(id),
            season TEXT NOT NULL,
            PRIMARY KEY (league_id, season)
        );

        CREATE TABLE IF NOT EXISTS matches (
            id INTEGER PRIMARY KEY,
            date TEXT NOT NULL,
            league_id INTEGER NOT NULL REFERENCES leagues(id),
            season TEXT NOT NULL,
            home_team_id INTEGER NOT NULL REFERENCES teams(id),
            away_team_id INTEGER NOT NULL REFERENCES teams(id),
            home_score INTEGER NOT NULL CHECK (home_score >= 0),
            away_score INTEGER NOT NULL CHECK (away_score >= 0)
        );
        CREATE INDEX IF NOT EXISTS idx_matches_league_season ON matches(league_id, season);
        CREATE INDEX IF NOT EXISTS idx_matches_season ON matches(season);
        CREATE INDEX IF NOT EXISTS idx_matches_date ON matches(date);

        CREATE TABLE IF NOT EXISTS lineups (
            player_id INTEGER NOT NULL REFERENCES players(id),
            team_id INTEGER NOT NULL REFERENCES teams(id),
            match_id INTEGER NOT NULL REFERENCES matches(id),
            goals INTEGER NOT NULL DEFAULT 0 CHECK (goals >= 0),
            assists INTEGER NOT NULL DEFAULT 0 CHECK (assists >= 0),
            minutes INTEGER NOT NULL DEFAULT 0 CHECK (minutes >= 0),
            PRIMARY KEY (player_id, match_id)
        );
        CREATE INDEX IF NOT EXISTS idx_lineups_match ON lineups(match_id);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}
