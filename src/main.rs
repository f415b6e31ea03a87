use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use tracing_subscriber::EnvFilter;

use football_stats::config::StatsConfig;
use football_stats::error::QueryError;
use football_stats::service::StatsService;
use football_stats::store::SqliteStore;

const USAGE: &str = "usage: football_stats [--db PATH] <command>
commands:
  leagues
  seasons
  matches --league-id ID --season SEASON [--page N] [--limit N]
  top-teams --season SEASON
  top-players --season SEASON";

/// A malformed command line. Reported with the usage text.
#[derive(Debug, Error)]
#[error("{0}")]
struct UsageError(String);

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Leagues,
    Seasons,
    Matches {
        league_id: String,
        season: String,
        page: Option<String>,
        limit: Option<String>,
    },
    TopTeams {
        season: String,
    },
    TopPlayers {
        season: String,
    },
}

fn main() -> ExitCode {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut config = StatsConfig::from_env();
    init_tracing(&config.log_filter);

    if let Some(path) = arg_value(&args, "--db") {
        config = config.with_db_path(PathBuf::from(path));
    }

    match run(&args, &config) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => report(&err),
    }
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &[String], config: &StatsConfig) -> Result<String> {
    let command = parse_command(args)?;
    let store = SqliteStore::open(config).map_err(QueryError::Internal)?;
    let service = StatsService::new(Arc::new(store));

    match command {
        Command::Leagues => to_json(&service.list_leagues()?),
        Command::Seasons => to_json(&service.list_seasons()?),
        Command::Matches {
            league_id,
            season,
            page,
            limit,
        } => {
            let Ok(league_id) = league_id.trim().parse::<i64>() else {
                return Err(QueryError::not_found(format!("league {league_id}")).into());
            };
            let listing =
                service.list_matches(league_id, &season, page.as_deref(), limit.as_deref())?;
            to_json(&listing)
        }
        Command::TopTeams { season } => to_json(&service.top_teams(&season)?),
        Command::TopPlayers { season } => to_json(&service.top_players(&season)?),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("serialize response")
}

/// Prints a JSON error body to stderr. Internal details go to the log only.
fn report(err: &anyhow::Error) -> ExitCode {
    let (message, code) = classify(err);
    let body = serde_json::json!({ "error": message });
    eprintln!("{body}");
    ExitCode::from(code)
}

/// Client-facing message and exit code: 2 not found, 64 bad usage, 1 anything
/// else.
fn classify(err: &anyhow::Error) -> (String, u8) {
    if let Some(usage) = err.downcast_ref::<UsageError>() {
        return (format!("{usage}\n{USAGE}"), 64);
    }
    match err.downcast_ref::<QueryError>() {
        Some(query_err) if query_err.is_not_found() => (query_err.to_string(), 2),
        Some(query_err) => {
            error!(error = ?query_err, "query failed");
            (query_err.to_string(), 1)
        }
        None => {
            error!(error = ?err, "request failed");
            ("internal error".to_string(), 1)
        }
    }
}

fn parse_command(args: &[String]) -> Result<Command, UsageError> {
    let usage = |msg: &str| UsageError(msg.to_string());
    let name = positional_args(args)
        .next()
        .ok_or_else(|| usage("missing command"))?;
    let season = || arg_value(args, "--season").unwrap_or_default();

    let command = match name {
        "leagues" => Command::Leagues,
        "seasons" => Command::Seasons,
        "matches" => Command::Matches {
            league_id: arg_value(args, "--league-id")
                .ok_or_else(|| usage("matches requires --league-id"))?,
            season: season(),
            page: arg_value(args, "--page"),
            limit: arg_value(args, "--limit"),
        },
        "top-teams" => Command::TopTeams { season: season() },
        "top-players" => Command::TopPlayers { season: season() },
        other => return Err(UsageError(format!("unknown command {other:?}"))),
    };
    Ok(command)
}

/// Arguments that are neither flags nor flag values.
fn positional_args(args: &[String]) -> impl Iterator<Item = &str> {
    let mut skip_next = false;
    args.iter().filter_map(move |arg| {
        if skip_next {
            skip_next = false;
            return None;
        }
        if arg.starts_with("--") {
            skip_next = !arg.contains('=');
            return None;
        }
        Some(arg.as_str())
    })
}

/// Reads `--name value` or `--name=value`.
fn arg_value(args: &[String], name: &str) -> Option<String> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg
            .strip_prefix(name)
            .and_then(|rest| rest.strip_prefix('='))
        {
            return Some(value.to_string());
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
        {
            return Some(next.clone());
        }
    }
    None
}
