use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Which pair of tallies a view reads: per-category results or whole-matchup results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    Category,
    #[default]
    Matchup,
}

impl ScoringMode {
    /// Category leagues (roto-style baseball) read category tallies first.
    pub fn default_for_sport(sport: &str) -> Self {
        if sport.trim().eq_ignore_ascii_case("baseball") {
            ScoringMode::Category
        } else {
            ScoringMode::Matchup
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ScoringMode::Category => ScoringMode::Matchup,
            ScoringMode::Matchup => ScoringMode::Category,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoringMode::Category => "CATEGORIES",
            ScoringMode::Matchup => "MATCHUPS",
        }
    }
}

impl FromStr for ScoringMode {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "category" | "categories" | "cat" => Ok(ScoringMode::Category),
            "matchup" | "matchups" => Ok(ScoringMode::Matchup),
            other => Err(anyhow!("unknown scoring mode: {other}")),
        }
    }
}

/// Denominator used for win percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WinPctBasis {
    /// wins / (wins + losses + ties)
    #[default]
    AllGames,
    /// wins / (wins + losses)
    Decided,
}

impl FromStr for WinPctBasis {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "all-games" | "all" | "games" => Ok(WinPctBasis::AllGames),
            "decided" | "wins-losses" => Ok(WinPctBasis::Decided),
            other => Err(anyhow!("unknown win% basis: {other}")),
        }
    }
}

/// One wins/losses/ties triple. Also the wire shape of a head-to-head record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WinLossTie {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
}

impl WinLossTie {
    pub fn new(wins: u32, losses: u32, ties: u32) -> Self {
        Self { wins, losses, ties }
    }

    /// Saturates at `u32::MAX` instead of overflowing.
    pub fn games(&self) -> u32 {
        self.wins.saturating_add(self.losses).saturating_add(self.ties)
    }

    pub fn add(self, other: WinLossTie) -> WinLossTie {
        WinLossTie {
            wins: self.wins.saturating_add(other.wins),
            losses: self.losses.saturating_add(other.losses),
            ties: self.ties.saturating_add(other.ties),
        }
    }
}

/// Anything carrying both tallies. Views never read the raw fields directly;
/// they go through [`pick`].
pub trait Tally {
    fn matchup(&self) -> WinLossTie;
    fn category(&self) -> WinLossTie;
}

pub fn pick<T: Tally + ?Sized>(record: &T, mode: ScoringMode) -> WinLossTie {
    match mode {
        ScoringMode::Category => record.category(),
        ScoringMode::Matchup => record.matchup(),
    }
}

/// Win percentage in `0.0..=1.0`. A record with no games in the denominator is 0.0.
pub fn win_pct(record: WinLossTie, basis: WinPctBasis) -> f64 {
    let denom = match basis {
        WinPctBasis::AllGames => record.games(),
        WinPctBasis::Decided => record.wins.saturating_add(record.losses),
    };
    record.wins as f64 / denom.max(1) as f64
}

pub fn format_record(record: WinLossTie) -> String {
    if record.ties > 0 {
        format!("{}-{}-{}", record.wins, record.losses, record.ties)
    } else {
        format!("{}-{}", record.wins, record.losses)
    }
}

pub fn format_pct(pct: f64) -> String {
    format!("{:.0}%", pct * 100.0)
}
