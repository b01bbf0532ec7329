use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use league_ledger::aggregate::total_seasons;
use league_ledger::demo::DemoLeague;
use league_ledger::feed::{LeagueSource, build_fetch_pool, handle_command, spawn_provider};
use league_ledger::scope::{Cutoff, Scope, scope_cutoff};
use league_ledger::season::{bracket_rounds, champion};
use league_ledger::state::{AppState, Delta, ProviderCommand, apply_delta};

fn demo() -> DemoLeague {
    DemoLeague::generate(7, 2024)
}

#[test]
fn demo_league_is_seeded() {
    assert_eq!(demo().league, demo().league);
    assert_ne!(
        DemoLeague::generate(8, 2024).league.franchise_stats,
        demo().league.franchise_stats
    );
}

#[test]
fn demo_league_is_self_consistent() {
    let league = demo().league;
    assert_eq!(league.franchise_stats.len(), 8);
    assert_eq!(league.managers.len(), 10);
    assert_eq!(league.managers.iter().filter(|m| m.is_current).count(), 8);

    for f in &league.franchise_stats {
        let totals = total_seasons(&f.season_records);
        assert_eq!((f.wins, f.losses, f.ties), (totals.wins, totals.losses, totals.ties));
        assert!(f.ownership.windows(2).all(|w| w[0].from < w[1].from));
        assert_eq!(f.season_records.len(), 9);
    }

    let handed_over = league
        .franchise_stats
        .iter()
        .filter(|f| f.ownership.len() > 1)
        .count();
    assert_eq!(handed_over, 2);

    for m in &league.managers {
        let played: u32 = m.season_records.iter().map(|r| r.wins + r.losses + r.ties).sum();
        assert_eq!(played, m.wins + m.losses + m.ties);
    }
}

#[test]
fn demo_h2h_rows_are_mirrored() {
    let league = demo().league;
    for (row, cols) in &league.franchise_h2h {
        for (col, record) in cols {
            let back = league.franchise_h2h[col][row];
            assert_eq!((record.wins, record.losses), (back.losses, back.wins));
        }
    }
}

#[test]
fn handled_commands_emit_deltas() {
    let source = demo();
    let pool = build_fetch_pool(2);
    let (tx, rx) = mpsc::channel();

    handle_command(&source, &pool, &tx, ProviderCommand::FetchLeague);
    handle_command(&source, &pool, &tx, ProviderCommand::FetchRecords);
    handle_command(
        &source,
        &pool,
        &tx,
        ProviderCommand::FetchFranchiseDetail {
            franchise_id: "missing".to_string(),
        },
    );
    drop(tx);

    let deltas: Vec<Delta> = rx.iter().collect();
    assert_eq!(deltas.len(), 3);
    assert!(matches!(deltas[0], Delta::SetLeague(_)));
    assert!(matches!(deltas[1], Delta::SetRecords(_)));
    assert!(matches!(
        &deltas[2],
        Delta::FranchiseDetailFailed { franchise_id, .. } if franchise_id == "missing"
    ));
}

#[test]
fn prefetch_loads_every_franchise() {
    let source = demo();
    let ids: Vec<String> = source
        .league()
        .unwrap()
        .franchise_stats
        .iter()
        .map(|f| f.id.clone())
        .collect();
    let pool = build_fetch_pool(4);
    let (tx, rx) = mpsc::channel();
    handle_command(
        &source,
        &pool,
        &tx,
        ProviderCommand::PrefetchFranchises {
            franchise_ids: ids.clone(),
        },
    );
    drop(tx);

    let mut state = AppState::new();
    for id in &ids {
        assert!(state.request_franchise(id));
    }
    for delta in rx.iter() {
        apply_delta(&mut state, delta);
    }
    assert!(state.pending_franchises.is_empty());
    assert_eq!(state.franchise_details.len(), ids.len());
    assert_eq!(
        state.logs.back().map(String::as_str),
        Some("[INFO] Prefetched 8 franchises")
    );

    let handed_over = state
        .franchise_details
        .values()
        .find(|d| d.overview.ownership.len() > 1)
        .expect("demo league has a handover");
    let cutoff = scope_cutoff(&handed_over.overview.ownership, Scope::CurrentOwner);
    assert!(matches!(cutoff, Cutoff::From(_)));
    let view = state
        .franchise_view(&handed_over.overview.id)
        .expect("detail loaded");
    assert_eq!(view.eras.len(), 2);
}

#[test]
fn spawned_provider_serves_until_channel_closes() {
    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let handle = spawn_provider(Arc::new(demo()), tx, cmd_rx, 2);

    cmd_tx.send(ProviderCommand::FetchLeague).unwrap();
    let delta = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(matches!(delta, Delta::SetLeague(ref league) if league.managers.len() == 10));

    drop(cmd_tx);
    handle.join().unwrap();
}

#[test]
fn demo_brackets_match_final_placings() {
    let source = demo();
    let seasons = source.seasons().unwrap();
    assert_eq!(seasons.len(), 9);
    assert!(seasons.iter().all(|s| s.is_finished));

    let league = source.league().unwrap();
    for season in seasons.iter().map(|s| s.season) {
        let rounds = bracket_rounds(&source.playoffs(season).unwrap());
        let labels: Vec<&str> = rounds.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Quarterfinals", "Semifinals", "Finals"]);
        assert!(rounds
            .iter()
            .flat_map(|r| r.games.iter().chain(r.consolation.iter()))
            .all(|g| g.winner().is_some() && g.top.seed < g.bottom.seed));

        let winner = champion(&rounds).expect("demo finals are decided");
        let title_row = league
            .franchise_stats
            .iter()
            .flat_map(|f| f.season_records.iter())
            .find(|r| r.season == season && r.finish == Some(1))
            .expect("one champion per season");
        assert_eq!(winner.team_name, title_row.team_name);
    }
}

#[test]
fn season_commands_emit_deltas() {
    let source = demo();
    let pool = build_fetch_pool(1);
    let (tx, rx) = mpsc::channel();

    handle_command(&source, &pool, &tx, ProviderCommand::FetchSeasons);
    handle_command(&source, &pool, &tx, ProviderCommand::FetchPlayoffs { season: 2020 });
    handle_command(&source, &pool, &tx, ProviderCommand::FetchPlayoffs { season: 1999 });
    drop(tx);

    let deltas: Vec<Delta> = rx.iter().collect();
    assert_eq!(deltas.len(), 3);
    assert!(matches!(&deltas[0], Delta::SetSeasons(seasons) if seasons.len() == 9));
    assert!(matches!(
        &deltas[1],
        Delta::SetPlayoffs { season: 2020, playoffs } if playoffs.rounds.len() == 3
    ));
    assert!(matches!(deltas[2], Delta::PlayoffsFailed { season: 1999, .. }));
}
