use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing::info;
use tracing_subscriber::EnvFilter;

use league_ledger::aggregate::{aggregate_activity, build_eras, summarize, trade_legs};
use league_ledger::api::parse_franchise_detail_json;
use league_ledger::classify::{classify_finishes, format_finish_groups, ordinal};
use league_ledger::config::AppConfig;
use league_ledger::scope::{Scope, scope_cutoff};
use league_ledger::scoring::{ScoringMode, format_pct, format_record};
use league_ledger::types::FranchiseDetailResponse;

const DEFAULT_PATH: &str = "tests/fixtures/franchise_detail.json";

struct Args {
    path: PathBuf,
    scopes: Vec<Scope>,
    modes: Vec<ScoringMode>,
}

fn parse_args() -> Result<Args> {
    let mut path = None;
    let mut scope = None;
    let mut mode = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scope" => {
                let raw = args.next().ok_or_else(|| anyhow!("--scope needs a value"))?;
                scope = Some(raw.parse::<Scope>()?);
            }
            "--mode" => {
                let raw = args.next().ok_or_else(|| anyhow!("--mode needs a value"))?;
                mode = Some(raw.parse::<ScoringMode>()?);
            }
            other if other.starts_with("--") => return Err(anyhow!("unknown flag {other}")),
            other => path = Some(PathBuf::from(other)),
        }
    }
    Ok(Args {
        path: path.unwrap_or_else(|| PathBuf::from(DEFAULT_PATH)),
        scopes: scope.map_or_else(|| vec![Scope::AllTime, Scope::CurrentOwner], |s| vec![s]),
        modes: mode.map_or_else(|| vec![ScoringMode::Category, ScoringMode::Matchup], |m| vec![m]),
    })
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = AppConfig::from_env();
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let raw = fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    let detail = parse_franchise_detail_json(&raw)?;
    info!(
        path = %args.path.display(),
        seasons = detail.season_records.len(),
        "franchise snapshot loaded"
    );

    println!(
        "{} ({}) managed by {}",
        detail.overview.name, detail.overview.id, detail.overview.current_manager
    );
    for scope in &args.scopes {
        for mode in &args.modes {
            print_report(&detail, *scope, *mode, &config);
        }
    }
    Ok(())
}

fn print_report(detail: &FranchiseDetailResponse, scope: Scope, mode: ScoringMode, config: &AppConfig) {
    let cutoff = scope_cutoff(&detail.overview.ownership, scope);
    let summary = summarize(&detail.season_records, cutoff, mode, config.win_pct_basis);
    let finishes = classify_finishes(&summary.filtered);
    let totals = &summary.totals;

    println!();
    match cutoff.season() {
        Some(season) => println!("== {} / {} (since {season}) ==", scope.label(), mode.label()),
        None => println!("== {} / {} ==", scope.label(), mode.label()),
    }
    println!(
        "record      {} ({}) over {} seasons",
        format_record(summary.line.record),
        format_pct(summary.line.win_pct),
        totals.seasons_played
    );
    println!(
        "titles      {} {}",
        totals.championships,
        finishes
            .medals
            .iter()
            .map(|m| m.symbol())
            .collect::<String>()
    );
    println!(
        "best/worst  {} / {}",
        totals.best_finish.map(ordinal).unwrap_or_else(|| "-".to_string()),
        totals.worst_finish.map(ordinal).unwrap_or_else(|| "-".to_string())
    );
    println!("finishes    {}", format_finish_groups(&finishes.finish_groups));
    println!("seeds       {}", format_finish_groups(&finishes.seed_groups));

    for era in build_eras(&detail.overview.ownership, &detail.season_records)
        .into_iter()
        .filter(|era| cutoff.admits(era.from))
    {
        let line = era.totals.line(mode, config.win_pct_basis);
        println!(
            "era         {} from {}: {} ({})",
            era.manager,
            era.from,
            format_record(line.record),
            format_pct(line.win_pct)
        );
    }

    let activity = aggregate_activity(
        &detail.transactions.counts,
        &detail.transactions.trades,
        &detail.keepers,
        cutoff,
    );
    println!(
        "activity    {} moves, {} trades ({} players), {} keepers",
        activity.moves(),
        activity.trades,
        activity.players_traded,
        activity.keepers
    );
    for trade in &activity.trade_log {
        for leg in trade_legs(trade) {
            println!("  {} {}: {}", trade.season, leg.direction, leg.players.join(", "));
        }
    }
}
