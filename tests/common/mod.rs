#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use rusqlite::Connection;
use tempfile::TempDir;

use football_stats::config::StatsConfig;
use football_stats::service::StatsService;
use football_stats::store::{SqliteStore, init_schema};

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

/// A seeded database in a temp dir. The store is declared first so its
/// connections close before the directory is removed.
pub struct TestDb {
    pub store: Arc<SqliteStore>,
    _dir: TempDir,
}

impl TestDb {
    pub fn service(&self) -> StatsService {
        StatsService::new(self.store.clone())
    }
}

pub fn seeded_db() -> TestDb {
    seeded_db_with("")
}

pub fn seeded_db_with(extra_sql: &str) -> TestDb {
    build_db(|conn| {
        init_schema(conn).expect("schema should be created");
        conn.execute_batch(&read_fixture("seed.sql"))
            .expect("seed should load");
        conn.execute_batch(extra_sql).expect("extra sql should load");
    })
}

/// A database file with no tables at all, so every query fails.
pub fn empty_db() -> TestDb {
    build_db(|conn| {
        conn.execute_batch("PRAGMA user_version = 1;")
            .expect("pragma should run");
    })
}

fn build_db(setup: impl FnOnce(&Connection)) -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir should be created");
    let path = dir.path().join("football.sqlite");
    {
        let conn = Connection::open(&path).expect("db should open");
        setup(&conn);
    }
    let config = StatsConfig::default().with_db_path(path);
    let store = SqliteStore::open(&config).expect("store should open");
    TestDb {
        store: Arc::new(store),
        _dir: dir,
    }
}
