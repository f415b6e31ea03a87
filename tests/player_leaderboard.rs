mod common;

use football_stats::model::Appearance;
use football_stats::player_leaderboard::{compute_player_standings, rank_player_standings};

use common::{seeded_db, seeded_db_with};

fn appearance(player: i64, goals: u32, assists: u32, minutes: u32) -> Appearance {
    Appearance {
        player_id: player,
        player_name: format!("Player {player}"),
        team_id: 1,
        team_name: "Test FC".to_string(),
        goals,
        assists,
        minutes,
    }
}

#[test]
fn season_ranking_uses_all_five_keys() {
    let db = seeded_db();
    let players = db.service().top_players("2023").expect("top players should load");
    let names = players.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            "Erling Haaland",
            "Robert Lewandowski",
            "Bukayo Saka",
            "Martin Odegaard",
            "Bruno Fernandes",
            "Mohamed Salah",
            "Christian Eriksen",
        ]
    );

    let lewa = &players[1];
    assert_eq!(lewa.team_id, 529);
    assert_eq!(lewa.total_points, 3);
    assert_eq!(lewa.total_goals, 2);
    assert_eq!(lewa.total_assists, 1);
    assert_eq!(lewa.avg_minutes_per_point, Some(28.33));
    assert_eq!(lewa.avg_minutes_per_goal, Some(42.5));
}

#[test]
fn zero_contribution_players_are_excluded() {
    let db = seeded_db();
    let players = db.service().top_players("2023").expect("top players should load");
    // Onana played 180 minutes without a goal or an assist.
    assert!(players.iter().all(|p| p.player_id != 6));
    assert!(players.iter().all(|p| p.total_points > 0));
}

#[test]
fn pure_assist_player_has_null_minutes_per_goal() {
    let db = seeded_db();
    let players = db.service().top_players("2023").expect("top players should load");
    let eriksen = players
        .iter()
        .find(|p| p.player_id == 8)
        .expect("eriksen should be listed");
    assert_eq!(eriksen.total_goals, 0);
    assert_eq!(eriksen.avg_minutes_per_point, Some(60.0));
    assert_eq!(eriksen.avg_minutes_per_goal, None);

    let json = serde_json::to_value(eriksen).expect("serializable");
    assert!(json["avg_goal"].is_null());
    assert_eq!(json["avg_points"], 60.0);
    assert_eq!(json["team_id"], 33);
}

#[test]
fn other_seasons_do_not_leak() {
    let db = seeded_db();
    let players = db.service().top_players("2022").expect("top players should load");
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].player_id, 5);
    assert_eq!(players[0].total_points, 4);
    assert_eq!(players[0].avg_minutes_per_point, Some(22.5));
    assert_eq!(players[0].avg_minutes_per_goal, Some(45.0));
}

#[test]
fn efficiency_breaks_ties_after_counts() {
    let mut rows = compute_player_standings(&[
        appearance(1, 1, 1, 200),
        appearance(2, 1, 1, 150),
        appearance(3, 1, 1, 150),
    ]);
    rank_player_standings(&mut rows);
    let ids = rows.iter().map(|p| p.player_id).collect::<Vec<_>>();
    assert_eq!(ids, vec![2, 3, 1]);
}

#[test]
fn never_more_than_ten_players() {
    let mut sql = String::new();
    for id in 100..115 {
        sql.push_str(&format!(
            "INSERT INTO players (id, fullname) VALUES ({id}, 'Striker {id}');\n\
             INSERT INTO lineups (player_id, team_id, match_id, goals, assists, minutes) \
             VALUES ({id}, 33, 5, 1, 0, 90);\n"
        ));
    }
    let db = seeded_db_with(&sql);
    let players = db.service().top_players("2023").expect("top players should load");
    assert_eq!(players.len(), 10);
}

#[test]
fn unknown_season_is_empty() {
    let db = seeded_db();
    let players = db.service().top_players("1999").expect("top players should load");
    assert!(players.is_empty());
}
