use std::fs;
use std::path::PathBuf;

use league_ledger::aggregate::{
    SeasonTotals, aggregate, aggregate_activity, build_eras, season_leaderboards, summarize,
    total_seasons, trade_legs,
};
use league_ledger::api::parse_franchise_detail_json;
use league_ledger::scope::{Cutoff, Scope, filter_by_scope, scope_cutoff};
use league_ledger::scoring::{ScoringMode, WinLossTie, WinPctBasis, pick, win_pct};
use league_ledger::types::{FranchiseDetailResponse, ManagerSummary, OwnershipEntry, SeasonRecord};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn detail() -> FranchiseDetailResponse {
    parse_franchise_detail_json(&read_fixture("franchise_detail.json")).expect("fixture should parse")
}

fn record(season: i32, wins: u32, losses: u32, finish: Option<u32>) -> SeasonRecord {
    SeasonRecord {
        season,
        wins,
        losses,
        finish,
        ..SeasonRecord::default()
    }
}

fn owner(name: &str, from: i32, to: Option<i32>) -> OwnershipEntry {
    OwnershipEntry {
        manager: name.to_string(),
        guid: name.to_lowercase(),
        from,
        to,
    }
}

#[test]
fn cutoff_example_keeps_only_later_seasons() {
    let records = vec![record(2020, 10, 3, Some(1)), record(2021, 8, 5, Some(2))];
    let scoped = aggregate(&records, Cutoff::From(2021));
    assert_eq!(scoped.filtered, vec![records[1].clone()]);
    let t = scoped.totals;
    assert_eq!((t.wins, t.losses, t.ties), (8, 5, 0));
    assert_eq!(t.championships, 0);
    assert_eq!(t.best_finish, Some(2));
    assert_eq!(t.worst_finish, Some(2));
    assert_eq!(t.seasons_played, 1);
}

#[test]
fn all_time_scope_is_a_no_op_filter() {
    let d = detail();
    let cutoff = scope_cutoff(&d.overview.ownership, Scope::AllTime);
    assert_eq!(cutoff, Cutoff::Unbounded);
    let scoped = aggregate(&d.season_records, cutoff);
    assert_eq!(scoped.filtered, d.season_records);
    assert_eq!(scoped.totals, total_seasons(&d.season_records));
    let summed: u32 = scoped.filtered.iter().map(|r| r.wins).sum();
    assert_eq!(summed, scoped.totals.wins);
}

#[test]
fn filtering_is_idempotent() {
    let d = detail();
    for cutoff in [
        Cutoff::Unbounded,
        Cutoff::From(2017),
        Cutoff::From(2020),
        Cutoff::From(2022),
        Cutoff::From(2030),
    ] {
        let once = filter_by_scope(&d.season_records, cutoff);
        let twice = filter_by_scope(&once, cutoff);
        assert_eq!(once, twice);
    }
}

#[test]
fn current_owner_scope_starts_at_last_takeover() {
    let d = detail();
    let cutoff = scope_cutoff(&d.overview.ownership, Scope::CurrentOwner);
    assert_eq!(cutoff, Cutoff::From(2020));

    let scoped = aggregate(&d.season_records, cutoff);
    let seasons: Vec<i32> = scoped.filtered.iter().map(|r| r.season).collect();
    assert_eq!(seasons, vec![2020, 2021, 2022]);
    let t = scoped.totals;
    assert_eq!((t.wins, t.losses, t.ties), (29, 17, 0));
    assert_eq!(t.championships, 1);
    assert_eq!(t.best_finish, Some(1));
    assert_eq!(t.worst_finish, Some(2));
    assert_eq!(t.seasons_played, 3);
}

#[test]
fn single_owner_scopes_agree() {
    let ownership = vec![owner("Solo", 2015, None)];
    let records = vec![record(2015, 9, 4, Some(2)), record(2016, 7, 6, None)];
    let all_time = aggregate(&records, scope_cutoff(&ownership, Scope::AllTime));
    let current = aggregate(&records, scope_cutoff(&ownership, Scope::CurrentOwner));
    assert_eq!(all_time, current);
}

#[test]
fn empty_timeline_is_unbounded() {
    assert_eq!(scope_cutoff(&[], Scope::CurrentOwner), Cutoff::Unbounded);
    assert_eq!(Cutoff::Unbounded.season(), None);
    assert!(Cutoff::Unbounded.admits(1900));
}

#[test]
fn empty_records_aggregate_to_zero() {
    let scoped = aggregate(&[], Cutoff::From(2020));
    assert!(scoped.filtered.is_empty());
    assert_eq!(scoped.totals, SeasonTotals::default());
    assert_eq!(win_pct(WinLossTie::default(), WinPctBasis::AllGames), 0.0);
}

#[test]
fn null_finishes_do_not_count() {
    let records = vec![record(2020, 1, 1, None), record(2021, 1, 1, Some(0))];
    let t = total_seasons(&records);
    assert_eq!(t.best_finish, None);
    assert_eq!(t.worst_finish, None);
    assert_eq!(t.championships, 0);
    assert_eq!(t.seasons_played, 2);
}

#[test]
fn merge_matches_single_fold() {
    let d = detail();
    let (early, late) = d.season_records.split_at(2);
    let merged = total_seasons(early).merge(total_seasons(late));
    assert_eq!(merged, total_seasons(&d.season_records));
    assert_eq!(
        total_seasons(late).merge(total_seasons(early)),
        merged
    );
}

#[test]
fn fold_ignores_season_order() {
    let d = detail();
    let chronological = total_seasons(&d.season_records);

    let mut reversed = d.season_records.clone();
    reversed.reverse();
    assert_eq!(total_seasons(&reversed), chronological);

    let mut shuffled = d.season_records.clone();
    shuffled.rotate_left(2);
    shuffled.swap(0, 3);
    assert_ne!(shuffled, d.season_records);
    assert_eq!(total_seasons(&shuffled), chronological);

    let cutoff = scope_cutoff(&d.overview.ownership, Scope::CurrentOwner);
    assert_eq!(
        aggregate(&reversed, cutoff).totals,
        aggregate(&d.season_records, cutoff).totals
    );
}

#[test]
fn huge_tallies_saturate() {
    let records = vec![
        SeasonRecord {
            cat_wins: u32::MAX,
            ..record(2020, u32::MAX, 0, Some(1))
        },
        SeasonRecord {
            cat_wins: 1,
            ..record(2021, 1, 0, Some(1))
        },
    ];
    let scoped = aggregate(&records, Cutoff::Unbounded);
    assert_eq!(scoped.totals.wins, u32::MAX);
    assert_eq!(scoped.totals.cat_wins, u32::MAX);
    assert_eq!(scoped.totals.seasons_played, 2);
    assert_eq!(scoped.totals.championships, 2);

    let merged = total_seasons(&records[..1]).merge(total_seasons(&records[1..]));
    assert_eq!(merged, scoped.totals);
    let line = scoped.totals.line(ScoringMode::Matchup, WinPctBasis::Decided);
    assert_eq!(line.record.games(), u32::MAX);
    assert_eq!(line.win_pct, 1.0);
}

#[test]
fn scoring_modes_read_independent_tallies() {
    let d = detail();
    let category = summarize(&d.season_records, Cutoff::Unbounded, ScoringMode::Category, WinPctBasis::AllGames);
    let matchup = summarize(&d.season_records, Cutoff::Unbounded, ScoringMode::Matchup, WinPctBasis::AllGames);

    assert_eq!(category.totals, matchup.totals);
    assert_eq!(category.line.record, WinLossTie::new(441, 380, 39));
    assert_eq!(matchup.line.record, WinLossTie::new(50, 35, 1));
    assert_eq!(pick(&category.totals, ScoringMode::Category), category.line.record);
    assert_eq!(pick(&matchup.totals, ScoringMode::Matchup), matchup.line.record);
}

#[test]
fn win_pct_basis_changes_only_the_denominator() {
    let rec = WinLossTie::new(6, 3, 1);
    assert!((win_pct(rec, WinPctBasis::AllGames) - 0.6).abs() < 1e-9);
    assert!((win_pct(rec, WinPctBasis::Decided) - 6.0 / 9.0).abs() < 1e-9);
    assert_eq!(win_pct(WinLossTie::new(0, 0, 3), WinPctBasis::Decided), 0.0);
}

#[test]
fn eras_split_on_ownership_changes() {
    let d = detail();
    let eras = build_eras(&d.overview.ownership, &d.season_records);
    assert_eq!(eras.len(), 2);
    assert_eq!(eras[0].manager, "Indy Cole");
    assert_eq!(eras[0].seasons, vec![2018, 2019]);
    assert_eq!((eras[0].totals.wins, eras[0].totals.losses, eras[0].totals.ties), (21, 18, 1));
    assert_eq!(eras[0].totals.championships, 1);
    assert_eq!(eras[1].seasons, vec![2020, 2021, 2022]);
    assert_eq!(eras[1].to, None);
    assert_eq!(
        eras[1].totals,
        aggregate(&d.season_records, Cutoff::From(2020)).totals
    );
}

#[test]
fn activity_follows_the_same_cutoff() {
    let d = detail();
    let all = aggregate_activity(
        &d.transactions.counts,
        &d.transactions.trades,
        &d.keepers,
        Cutoff::Unbounded,
    );
    assert_eq!((all.adds, all.drops), (85, 81));
    assert_eq!(all.trades, 2);
    assert_eq!(all.players_traded, 5);
    assert_eq!(all.keepers, 5);

    let current = aggregate_activity(
        &d.transactions.counts,
        &d.transactions.trades,
        &d.keepers,
        Cutoff::From(2020),
    );
    assert_eq!(current.moves(), 104);
    assert_eq!(current.trades, 1);
    assert_eq!(current.players_traded, 3);
    assert_eq!(current.keepers, 3);
    assert_eq!(current.counts.len(), 3);

    let before_history = aggregate_activity(
        &d.transactions.counts,
        &d.transactions.trades,
        &d.keepers,
        Cutoff::From(2000),
    );
    assert_eq!(before_history, all);
    assert_eq!(current.keeper_log.as_slice(), &d.keepers[1..]);
}

#[test]
fn trade_legs_group_players_by_direction() {
    let d = detail();
    let legs = trade_legs(&d.transactions.trades[1]);
    assert_eq!(legs.len(), 2);
    assert_eq!(legs[0].direction, "Lind Lightning \u{2192} Walk-Off Union");
    assert_eq!(legs[0].players, vec!["D. Hayes", "P. Ibarra"]);
    assert_eq!(legs[1].players, vec!["N. Jensen"]);
}

#[test]
fn leaderboards_are_newest_first_and_sorted_by_margin() {
    let manager = |guid: &str, records: Vec<SeasonRecord>| ManagerSummary {
        guid: guid.to_string(),
        name: guid.to_uppercase(),
        season_records: records,
        ..ManagerSummary::default()
    };
    let managers = vec![
        manager("a", vec![record(2020, 5, 8, None), record(2021, 9, 4, None)]),
        manager("b", vec![record(2020, 10, 3, None)]),
        manager("c", vec![SeasonRecord {
            cat_wins: 90,
            cat_losses: 10,
            ..record(2021, 2, 11, None)
        }]),
    ];

    let boards = season_leaderboards(&managers, ScoringMode::Matchup);
    assert_eq!(boards.iter().map(|b| b.season).collect::<Vec<_>>(), vec![2021, 2020]);
    assert_eq!(boards[0].rows[0].guid, "a");
    assert_eq!(boards[1].rows[0].guid, "b");

    let by_category = season_leaderboards(&managers, ScoringMode::Category);
    assert_eq!(by_category[0].rows[0].guid, "c");
}
