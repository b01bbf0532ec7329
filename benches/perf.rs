use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use league_ledger::aggregate::{aggregate, build_eras, season_leaderboards, summarize};
use league_ledger::api::{parse_franchise_detail_json, parse_managers_json};
use league_ledger::classify::classify_finishes;
use league_ledger::demo::DemoLeague;
use league_ledger::h2h::build_h2h_matrix;
use league_ledger::scope::{Cutoff, Scope, scope_cutoff};
use league_ledger::scoring::{ScoringMode, WinPctBasis};
use league_ledger::state::{AppState, Delta, apply_delta};

fn demo() -> DemoLeague {
    DemoLeague::generate(7, 2024)
}

fn bench_aggregate(c: &mut Criterion) {
    let league = demo().league;
    c.bench_function("aggregate_franchises", |b| {
        b.iter(|| {
            for f in &league.franchise_stats {
                let cutoff = scope_cutoff(&f.ownership, Scope::CurrentOwner);
                let scoped = aggregate(black_box(&f.season_records), cutoff);
                black_box(scoped.totals.wins);
            }
        })
    });

    c.bench_function("summarize_all_modes", |b| {
        b.iter(|| {
            for f in &league.franchise_stats {
                for mode in [ScoringMode::Category, ScoringMode::Matchup] {
                    let s = summarize(&f.season_records, Cutoff::Unbounded, mode, WinPctBasis::AllGames);
                    black_box(s.line.win_pct);
                }
                black_box(build_eras(&f.ownership, &f.season_records).len());
            }
        })
    });

    c.bench_function("season_leaderboards", |b| {
        b.iter(|| {
            let boards = season_leaderboards(black_box(&league.managers), ScoringMode::Category);
            black_box(boards.len());
        })
    });
}

fn bench_classify(c: &mut Criterion) {
    let league = demo().league;
    c.bench_function("classify_finishes", |b| {
        b.iter(|| {
            for m in &league.managers {
                let finishes = classify_finishes(black_box(&m.season_records));
                black_box(finishes.finish_groups.len());
            }
        })
    });
}

fn bench_h2h(c: &mut Criterion) {
    let league = demo().league;
    c.bench_function("h2h_matrix_managers", |b| {
        b.iter(|| {
            let matrix = build_h2h_matrix(black_box(&league.managers), &league.h2h);
            black_box(matrix.headers.len());
        })
    });
    c.bench_function("h2h_matrix_franchises", |b| {
        b.iter(|| {
            let matrix = build_h2h_matrix(black_box(&league.franchise_stats), &league.franchise_h2h);
            black_box(matrix.headers.len());
        })
    });
}

fn bench_parse(c: &mut Criterion) {
    let source = demo();
    let managers_json = serde_json::to_string(&source.league).expect("serializable league");
    let detail = source.details.values().next().expect("demo detail");
    let detail_json = serde_json::to_string(detail).expect("serializable detail");

    c.bench_function("managers_parse", |b| {
        b.iter(|| {
            let league = parse_managers_json(black_box(&managers_json)).unwrap();
            black_box(league.managers.len());
        })
    });
    c.bench_function("franchise_detail_parse", |b| {
        b.iter(|| {
            let detail = parse_franchise_detail_json(black_box(&detail_json)).unwrap();
            black_box(detail.season_records.len());
        })
    });
}

fn bench_views(c: &mut Criterion) {
    let source = demo();
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::SetLeague(source.league.clone()));
    for (id, detail) in &source.details {
        apply_delta(
            &mut state,
            Delta::SetFranchiseDetail {
                franchise_id: id.clone(),
                detail: Box::new(detail.clone()),
            },
        );
    }
    for (season, playoffs) in &source.playoffs {
        apply_delta(
            &mut state,
            Delta::SetPlayoffs {
                season: *season,
                playoffs: Box::new(playoffs.clone()),
            },
        );
    }
    let id = state.league.franchise_stats[0].id.clone();

    c.bench_function("franchise_rows_and_view", |b| {
        b.iter(|| {
            black_box(state.franchise_rows().len());
            black_box(state.franchise_view(&id).map(|v| v.eras.len()));
        })
    });

    c.bench_function("season_view", |b| {
        b.iter(|| {
            let view = state.season_view();
            black_box(view.map(|v| v.standings.len()));
        })
    });
}

criterion_group!(
    benches,
    bench_aggregate,
    bench_classify,
    bench_h2h,
    bench_parse,
    bench_views
);
criterion_main!(benches);
