use std::fs;
use std::path::PathBuf;

use league_ledger::api::{parse_managers_json, parse_playoffs_json};
use league_ledger::scoring::{ScoringMode, WinLossTie};
use league_ledger::season::{bracket_rounds, champion, season_list, season_standings};
use league_ledger::types::{ManagerSummary, PlayoffResponse, PlayoffRound, Season, SeasonRecord};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn playoffs() -> PlayoffResponse {
    parse_playoffs_json(&read_fixture("playoffs.json")).expect("fixture should parse")
}

fn manager(name: &str, rows: Vec<SeasonRecord>) -> ManagerSummary {
    ManagerSummary {
        guid: name.to_lowercase(),
        name: name.to_string(),
        season_records: rows,
        ..ManagerSummary::default()
    }
}

fn row(season: i32, team: &str, wins: u32, losses: u32, seed: Option<u32>) -> SeasonRecord {
    SeasonRecord {
        season,
        team_name: team.to_string(),
        wins,
        losses,
        cat_wins: losses * 10,
        cat_losses: wins * 10,
        playoff_seed: seed,
        ..SeasonRecord::default()
    }
}

#[test]
fn rounds_follow_week_order_with_labels() {
    let rounds = bracket_rounds(&playoffs());
    let labels: Vec<&str> = rounds.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["Quarterfinals", "Semifinals", "Finals"]);
    let weeks: Vec<u32> = rounds.iter().map(|r| r.week).collect();
    assert_eq!(weeks, vec![21, 22, 23]);

    assert!(rounds[0].consolation.is_empty());
    assert_eq!(rounds[1].consolation.len(), 1);

    let upset = &rounds[0].games[1];
    assert_eq!(upset.top.seed, Some(4));
    assert!(!upset.top.won);
    assert!(upset.bottom.won);
    assert_eq!(upset.bottom.score, 6);
}

#[test]
fn champion_is_the_final_winner() {
    let rounds = bracket_rounds(&playoffs());
    let winner = champion(&rounds).expect("final was decided");
    assert_eq!(winner.team_name, "Quinn Machine");
    assert_eq!(winner.manager, "Avery Quinn");
}

#[test]
fn tied_game_has_no_winner() {
    let rounds = bracket_rounds(&playoffs());
    let third_place = &rounds[2].consolation[0];
    assert!(third_place.tied);
    assert!(third_place.winner().is_none());
    assert_eq!((third_place.top.score, third_place.bottom.score), (5, 5));
}

#[test]
fn short_brackets_count_back_from_the_final() {
    let two = PlayoffResponse {
        league_key: String::new(),
        rounds: vec![
            PlayoffRound {
                week: 22,
                ..PlayoffRound::default()
            },
            PlayoffRound {
                week: 23,
                ..PlayoffRound::default()
            },
        ],
    };
    let labels: Vec<String> = bracket_rounds(&two).into_iter().map(|r| r.label).collect();
    assert_eq!(labels, vec!["Semifinals", "Finals"]);

    let empty = bracket_rounds(&PlayoffResponse::default());
    assert!(empty.is_empty());
    assert!(champion(&empty).is_none());
    // A final without games has no champion either.
    assert!(champion(&bracket_rounds(&two)).is_none());
}

#[test]
fn standings_put_seeds_first() {
    let managers = vec![
        manager("Avery", vec![row(2021, "Quinn Machine", 9, 4, Some(2))]),
        manager("Blake", vec![row(2021, "Moreno Magic", 11, 2, None)]),
        manager("Casey", vec![row(2021, "Lind Lions", 10, 3, Some(1))]),
        manager("Devon", vec![row(2021, "Park Place", 3, 10, None), row(2020, "Park Place", 12, 1, Some(1))]),
    ];
    let table = season_standings(&managers, 2021, ScoringMode::Matchup);
    let teams: Vec<&str> = table.iter().map(|r| r.team_name.as_str()).collect();
    assert_eq!(teams, vec!["Lind Lions", "Quinn Machine", "Moreno Magic", "Park Place"]);
    let ranks: Vec<u32> = table.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
    assert_eq!(table[0].manager, "Casey");
    assert_eq!(table[0].record, WinLossTie::new(10, 3, 0));
}

#[test]
fn standings_follow_scoring_mode() {
    let managers = vec![
        manager("Avery", vec![row(2021, "Quinn Machine", 9, 4, None)]),
        manager("Blake", vec![row(2021, "Moreno Magic", 4, 9, None)]),
    ];
    let table = season_standings(&managers, 2021, ScoringMode::Category);
    assert_eq!(table[0].team_name, "Moreno Magic");
    assert_eq!(table[0].record, WinLossTie::new(90, 40, 0));
    assert!(season_standings(&managers, 2019, ScoringMode::Category).is_empty());
}

#[test]
fn season_list_prefers_the_api_list() {
    let league = parse_managers_json(&read_fixture("managers.json")).expect("fixture should parse");
    assert_eq!(season_list(&[], &league.managers), vec![2021, 2020]);

    let seasons: Vec<Season> = [2019, 2021, 2021]
        .into_iter()
        .map(|season| Season {
            league_key: format!("431.l.{season}"),
            season,
            ..Season::default()
        })
        .collect();
    assert_eq!(season_list(&seasons, &league.managers), vec![2021, 2019]);
}
