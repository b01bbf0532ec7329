use std::str::FromStr;

use anyhow::anyhow;

use crate::types::{OwnershipEntry, SeasonKeepers, SeasonRecord, Trade, TransactionCount};

/// Temporal window for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    #[default]
    AllTime,
    /// Only seasons since the current owner took over.
    CurrentOwner,
}

impl Scope {
    pub fn toggle(self) -> Self {
        match self {
            Scope::AllTime => Scope::CurrentOwner,
            Scope::CurrentOwner => Scope::AllTime,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Scope::AllTime => "ALL-TIME",
            Scope::CurrentOwner => "CURRENT OWNER",
        }
    }
}

impl FromStr for Scope {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "all-time" | "alltime" | "all" => Ok(Scope::AllTime),
            "current" | "current-owner" | "current_owner" => Ok(Scope::CurrentOwner),
            other => Err(anyhow!("unknown scope: {other}")),
        }
    }
}

/// Lower bound on seasons admitted into an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cutoff {
    /// No lower bound.
    #[default]
    Unbounded,
    /// Seasons `>=` this year.
    From(i32),
}

impl Cutoff {
    pub fn admits(self, season: i32) -> bool {
        match self {
            Cutoff::Unbounded => true,
            Cutoff::From(first) => season >= first,
        }
    }

    pub fn season(self) -> Option<i32> {
        match self {
            Cutoff::Unbounded => None,
            Cutoff::From(first) => Some(first),
        }
    }
}

/// Records tagged with the season they belong to.
pub trait Seasonal {
    fn season(&self) -> i32;
}

impl Seasonal for SeasonRecord {
    fn season(&self) -> i32 {
        self.season
    }
}

impl Seasonal for TransactionCount {
    fn season(&self) -> i32 {
        self.season
    }
}

impl Seasonal for Trade {
    fn season(&self) -> i32 {
        self.season
    }
}

impl Seasonal for SeasonKeepers {
    fn season(&self) -> i32 {
        self.season
    }
}

/// The start year of the last (active) ownership entry bounds current-owner
/// queries. An empty timeline falls back to no bound.
pub fn scope_cutoff(ownership: &[OwnershipEntry], scope: Scope) -> Cutoff {
    match scope {
        Scope::AllTime => Cutoff::Unbounded,
        Scope::CurrentOwner => ownership
            .last()
            .map(|entry| Cutoff::From(entry.from))
            .unwrap_or(Cutoff::Unbounded),
    }
}

/// Keeps records inside the cutoff, in their original order.
pub fn filter_by_scope<T: Seasonal + Clone>(records: &[T], cutoff: Cutoff) -> Vec<T> {
    records
        .iter()
        .filter(|r| cutoff.admits(r.season()))
        .cloned()
        .collect()
}
