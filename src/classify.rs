use std::collections::BTreeMap;
use std::fmt;

use crate::types::SeasonRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_finish(finish: u32) -> Option<Medal> {
        match finish {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Medal::Gold => "\u{1F947}",
            Medal::Silver => "\u{1F948}",
            Medal::Bronze => "\u{1F949}",
        }
    }
}

impl fmt::Display for Medal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// `1st`, `2nd`, `3rd`, `4th`, `11th`, `21st`, `112th`, ...
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 100, n % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Medal symbol for podium finishes, ordinal otherwise.
pub fn finish_badge(finish: u32) -> String {
    match Medal::for_finish(finish) {
        Some(medal) => medal.symbol().to_string(),
        None => ordinal(finish),
    }
}

/// One medal per podium season, in input (chronological) order.
pub fn medals(records: &[SeasonRecord]) -> Vec<Medal> {
    records
        .iter()
        .filter_map(|r| r.finish.and_then(Medal::for_finish))
        .collect()
}

pub fn championship_years(records: &[SeasonRecord]) -> Vec<i32> {
    records
        .iter()
        .filter(|r| r.finish == Some(1))
        .map(|r| r.season)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishField {
    Finish,
    PlayoffSeed,
}

impl FinishField {
    fn read(self, record: &SeasonRecord) -> Option<u32> {
        match self {
            FinishField::Finish => record.finish,
            FinishField::PlayoffSeed => record.playoff_seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishGroup {
    pub rank: u32,
    pub count: usize,
    pub years: Vec<i32>,
}

/// Partitions records by finish or seed, ascending by rank. Null values are skipped.
pub fn finish_groups(records: &[SeasonRecord], field: FinishField) -> Vec<FinishGroup> {
    let mut groups: BTreeMap<u32, Vec<i32>> = BTreeMap::new();
    for r in records {
        let Some(rank) = field.read(r) else { continue };
        groups.entry(rank).or_default().push(r.season);
    }
    groups
        .into_iter()
        .map(|(rank, years)| FinishGroup {
            rank,
            count: years.len(),
            years,
        })
        .collect()
}

/// `"1sts: 2 (2019, 2021), 3rds: 1 (2020)"`
pub fn format_finish_groups(groups: &[FinishGroup]) -> String {
    if groups.is_empty() {
        return "N/A".to_string();
    }
    groups
        .iter()
        .map(|g| {
            let years = g
                .years
                .iter()
                .map(|y| y.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}s: {} ({years})", ordinal(g.rank), g.count)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishClassification {
    pub medals: Vec<Medal>,
    pub championship_years: Vec<i32>,
    pub finish_groups: Vec<FinishGroup>,
    pub seed_groups: Vec<FinishGroup>,
}

pub fn classify_finishes(records: &[SeasonRecord]) -> FinishClassification {
    FinishClassification {
        medals: medals(records),
        championship_years: championship_years(records),
        finish_groups: finish_groups(records, FinishField::Finish),
        seed_groups: finish_groups(records, FinishField::PlayoffSeed),
    }
}

/// Bracket round heading counted back from the final.
pub fn round_label(round_index: usize, total_rounds: usize) -> String {
    match total_rounds.saturating_sub(round_index) {
        1 => "Finals".to_string(),
        2 => "Semifinals".to_string(),
        3 => "Quarterfinals".to_string(),
        _ => format!("Round {}", round_index + 1),
    }
}

/// Positive streaks are wins, negative are losses.
pub fn streak_badge(streak: i32) -> Option<String> {
    match streak {
        0 => None,
        s if s > 0 => Some(format!("W{s}")),
        s => Some(format!("L{}", s.unsigned_abs())),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankChange {
    Up(u32),
    Down(u32),
    Same,
}

pub fn rank_change(rank: u32, prev_rank: u32) -> RankChange {
    match prev_rank.cmp(&rank) {
        std::cmp::Ordering::Greater => RankChange::Up(prev_rank - rank),
        std::cmp::Ordering::Less => RankChange::Down(rank - prev_rank),
        std::cmp::Ordering::Equal => RankChange::Same,
    }
}
