use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::scope::{Cutoff, filter_by_scope};
use crate::scoring::{ScoringMode, Tally, WinLossTie, WinPctBasis, pick, win_pct};
use crate::types::{
    ManagerSummary, OwnershipEntry, SeasonKeepers, SeasonRecord, Trade, TransactionCount,
};

/// Reduced season totals. Same wire shape as the `stats` block of a franchise detail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonTotals {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
    #[serde(default)]
    pub cat_wins: u32,
    #[serde(default)]
    pub cat_losses: u32,
    #[serde(default)]
    pub cat_ties: u32,
    #[serde(default)]
    pub championships: u32,
    #[serde(default)]
    pub best_finish: Option<u32>,
    #[serde(default)]
    pub worst_finish: Option<u32>,
    #[serde(default)]
    pub seasons_played: u32,
}

impl SeasonTotals {
    pub fn absorb(&mut self, record: &SeasonRecord) {
        self.wins = self.wins.saturating_add(record.wins);
        self.losses = self.losses.saturating_add(record.losses);
        self.ties = self.ties.saturating_add(record.ties);
        self.cat_wins = self.cat_wins.saturating_add(record.cat_wins);
        self.cat_losses = self.cat_losses.saturating_add(record.cat_losses);
        self.cat_ties = self.cat_ties.saturating_add(record.cat_ties);
        self.seasons_played = self.seasons_played.saturating_add(1);
        if record.finish == Some(1) {
            self.championships = self.championships.saturating_add(1);
        }
        // Zero means "unranked" in some exports.
        if let Some(finish) = record.finish.filter(|f| *f > 0) {
            self.best_finish = Some(self.best_finish.map_or(finish, |b| b.min(finish)));
            self.worst_finish = Some(self.worst_finish.map_or(finish, |w| w.max(finish)));
        }
    }

    /// Combines two partial folds. Commutative and associative.
    pub fn merge(self, other: SeasonTotals) -> SeasonTotals {
        SeasonTotals {
            wins: self.wins.saturating_add(other.wins),
            losses: self.losses.saturating_add(other.losses),
            ties: self.ties.saturating_add(other.ties),
            cat_wins: self.cat_wins.saturating_add(other.cat_wins),
            cat_losses: self.cat_losses.saturating_add(other.cat_losses),
            cat_ties: self.cat_ties.saturating_add(other.cat_ties),
            championships: self.championships.saturating_add(other.championships),
            best_finish: merge_opt(self.best_finish, other.best_finish, u32::min),
            worst_finish: merge_opt(self.worst_finish, other.worst_finish, u32::max),
            seasons_played: self.seasons_played.saturating_add(other.seasons_played),
        }
    }

    pub fn line(&self, mode: ScoringMode, basis: WinPctBasis) -> RecordLine {
        RecordLine::of(self, mode, basis)
    }
}

impl Tally for SeasonTotals {
    fn matchup(&self) -> WinLossTie {
        WinLossTie::new(self.wins, self.losses, self.ties)
    }

    fn category(&self) -> WinLossTie {
        WinLossTie::new(self.cat_wins, self.cat_losses, self.cat_ties)
    }
}

fn merge_opt(a: Option<u32>, b: Option<u32>, pick_one: fn(u32, u32) -> u32) -> Option<u32> {
    match (a, b) {
        (Some(x), Some(y)) => Some(pick_one(x, y)),
        (x, None) => x,
        (None, y) => y,
    }
}

/// The record and win percentage shown for one scoring mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordLine {
    pub record: WinLossTie,
    pub win_pct: f64,
}

impl RecordLine {
    pub fn of<T: Tally + ?Sized>(source: &T, mode: ScoringMode, basis: WinPctBasis) -> Self {
        let record = pick(source, mode);
        Self {
            record,
            win_pct: win_pct(record, basis),
        }
    }
}

pub fn total_seasons(records: &[SeasonRecord]) -> SeasonTotals {
    records.iter().fold(SeasonTotals::default(), |mut acc, r| {
        acc.absorb(r);
        acc
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScopedTotals {
    /// In-scope records, chronological order preserved for display.
    pub filtered: Vec<SeasonRecord>,
    pub totals: SeasonTotals,
}

pub fn aggregate(records: &[SeasonRecord], cutoff: Cutoff) -> ScopedTotals {
    let filtered = filter_by_scope(records, cutoff);
    let totals = total_seasons(&filtered);
    ScopedTotals { filtered, totals }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScopedSummary {
    pub filtered: Vec<SeasonRecord>,
    pub totals: SeasonTotals,
    pub line: RecordLine,
}

pub fn summarize(
    records: &[SeasonRecord],
    cutoff: Cutoff,
    mode: ScoringMode,
    basis: WinPctBasis,
) -> ScopedSummary {
    let ScopedTotals { filtered, totals } = aggregate(records, cutoff);
    let line = totals.line(mode, basis);
    ScopedSummary {
        filtered,
        totals,
        line,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityTotals {
    pub adds: u32,
    pub drops: u32,
    pub trades: u32,
    pub players_traded: u32,
    pub keepers: u32,
    pub counts: Vec<TransactionCount>,
    pub trade_log: Vec<Trade>,
    pub keeper_log: Vec<SeasonKeepers>,
}

impl ActivityTotals {
    pub fn moves(&self) -> u32 {
        self.adds.saturating_add(self.drops)
    }
}

/// Transactions, trades and keepers are filtered by the same cutoff as season
/// records but summed on their own.
pub fn aggregate_activity(
    counts: &[TransactionCount],
    trades: &[Trade],
    keepers: &[SeasonKeepers],
    cutoff: Cutoff,
) -> ActivityTotals {
    let counts = filter_by_scope(counts, cutoff);
    let trade_log = filter_by_scope(trades, cutoff);
    let keeper_log = filter_by_scope(keepers, cutoff);

    ActivityTotals {
        adds: counts.iter().fold(0u32, |acc, c| acc.saturating_add(c.adds)),
        drops: counts.iter().fold(0u32, |acc, c| acc.saturating_add(c.drops)),
        trades: trade_log.len() as u32,
        players_traded: trade_log.iter().map(|t| t.players.len() as u32).sum(),
        keepers: keeper_log.iter().map(|k| k.keepers.len() as u32).sum(),
        counts,
        trade_log,
        keeper_log,
    }
}

/// One owner's span of a franchise.
#[derive(Debug, Clone, PartialEq)]
pub struct Era {
    pub manager: String,
    pub guid: String,
    pub from: i32,
    pub to: Option<i32>,
    pub seasons: Vec<i32>,
    pub totals: SeasonTotals,
}

/// Splits season records into eras bounded by consecutive ownership `from` years.
pub fn build_eras(ownership: &[OwnershipEntry], records: &[SeasonRecord]) -> Vec<Era> {
    ownership
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let next_from = ownership.get(idx + 1).map(|next| next.from);
            let in_era: Vec<&SeasonRecord> = records
                .iter()
                .filter(|r| r.season >= entry.from)
                .filter(|r| next_from.is_none_or(|upper| r.season < upper))
                .collect();
            let totals = in_era.iter().fold(SeasonTotals::default(), |mut acc, r| {
                acc.absorb(r);
                acc
            });
            Era {
                manager: entry.manager.clone(),
                guid: entry.guid.clone(),
                from: entry.from,
                to: entry.to,
                seasons: in_era.iter().map(|r| r.season).collect(),
                totals,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeLeg {
    /// `"source → dest"`
    pub direction: String,
    pub players: Vec<String>,
}

pub fn trade_legs(trade: &Trade) -> Vec<TradeLeg> {
    let mut legs: Vec<TradeLeg> = Vec::new();
    for player in &trade.players {
        let direction = format!("{} \u{2192} {}", player.source_team, player.dest_team);
        match legs.iter_mut().find(|leg| leg.direction == direction) {
            Some(leg) => leg.players.push(player.name.clone()),
            None => legs.push(TradeLeg {
                direction,
                players: vec![player.name.clone()],
            }),
        }
    }
    legs
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardRow {
    pub manager: String,
    pub guid: String,
    pub record: SeasonRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonBoard {
    pub season: i32,
    pub rows: Vec<BoardRow>,
}

/// Every manager season, grouped by season (newest first) and ordered by
/// wins minus losses under the given mode.
pub fn season_leaderboards(managers: &[ManagerSummary], mode: ScoringMode) -> Vec<SeasonBoard> {
    let mut by_season: BTreeMap<i32, Vec<BoardRow>> = BTreeMap::new();
    for m in managers {
        for sr in &m.season_records {
            by_season.entry(sr.season).or_default().push(BoardRow {
                manager: m.name.clone(),
                guid: m.guid.clone(),
                record: sr.clone(),
            });
        }
    }

    by_season
        .into_iter()
        .rev()
        .map(|(season, mut rows)| {
            rows.sort_by_key(|row| {
                let wlt = pick(&row.record, mode);
                std::cmp::Reverse(i64::from(wlt.wins) - i64::from(wlt.losses))
            });
            SeasonBoard { season, rows }
        })
        .collect()
}
